//! Filename conventions shared by every stage.
//!
//! A diagram's identity is its filename stem: `01-complete-system.drawio`
//! has id `01-complete-system`, and everything else (permalink, asset names,
//! page filename) is derived from that id. No other identity exists.
//!
//! ## Display Titles
//!
//! Diagrams without a curated catalog entry get a title built from the stem:
//! dashes become spaces and each word is title-cased.
//! - `07-network-topology` → "07 Network Topology"
//! - `api_v2-overview` → "Api_V2 Overview"

/// Extract the diagram id from a filename with the given extension.
///
/// Returns `None` when the filename does not end in `.{extension}` or the
/// stem would be empty. The extension match is case-sensitive.
pub fn diagram_id(file_name: &str, extension: &str) -> Option<String> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Build a display title from a diagram id.
pub fn humanize_title(id: &str) -> String {
    title_case(&id.replace('-', " "))
}

/// Title-case a string word by word.
///
/// A cased letter is upper-cased when the preceding character is not a cased
/// letter and lower-cased otherwise, so digits and punctuation start a new
/// word: `"2nd-api"` → `"2Nd-Api"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && prev_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}

/// Site-relative permalink for a diagram page.
pub fn permalink(id: &str) -> String {
    format!("/diagrams/{id}/")
}
