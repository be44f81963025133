//! Renderer backed by the draw.io desktop command-line export.
//!
//! ```text
//! drawio --export --format png --output <png> <source>
//! drawio --export --format svg --output <svg> <source>
//! ```
//!
//! The binary is probed once with `--version` by [`DrawioCli::detect`]. A
//! missing binary is [`RenderError::ToolUnavailable`], which the convert
//! stage treats as "use placeholders", never as a failure of the run.
//!
//! SVG export is best-effort: a diagram whose PNG exported but whose SVG did
//! not is still a successful render, just without the SVG asset.

use super::backend::{RenderError, RenderJob, RenderOutput, Renderer};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

pub struct DrawioCli {
    command: String,
}

impl DrawioCli {
    /// Probe `command --version` and return a renderer if it runs.
    pub fn detect(command: &str) -> Result<Self, RenderError> {
        if command.trim().is_empty() {
            return Err(RenderError::ToolUnavailable(
                "no draw.io command configured".into(),
            ));
        }
        let output = run(Command::new(command).arg("--version"), command)?;
        if !output.status.success() {
            return Err(RenderError::ToolUnavailable(format!(
                "`{command} --version` exited with {}",
                output.status
            )));
        }
        Ok(Self {
            command: command.to_string(),
        })
    }

    fn export(&self, format: &str, source: &Path, output: &Path) -> Result<(), RenderError> {
        let result = run(
            Command::new(&self.command)
                .args(["--export", "--format", format, "--output"])
                .arg(output)
                .arg(source),
            &self.command,
        )?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::Failed(format!(
                "{format} export of {} exited with {}: {}",
                source.display(),
                result.status,
                stderr.trim()
            )));
        }
        if !output.is_file() {
            return Err(RenderError::Failed(format!(
                "{format} export of {} produced no file",
                source.display()
            )));
        }
        Ok(())
    }
}

/// Run a command, mapping a missing executable to `ToolUnavailable`.
fn run(command: &mut Command, program: &str) -> Result<Output, RenderError> {
    command.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => {
            RenderError::ToolUnavailable(format!("`{program}` could not be started: {e}"))
        }
        _ => RenderError::Io(e),
    })
}

impl Renderer for DrawioCli {
    fn name(&self) -> &'static str {
        "drawio"
    }

    fn render(&self, job: &RenderJob) -> Result<RenderOutput, RenderError> {
        self.export("png", &job.source, &job.png)?;
        let svg = self.export("svg", &job.source, &job.svg).is_ok();
        Ok(RenderOutput { svg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let result = DrawioCli::detect("definitely-not-a-drawio-binary-4f1c");
        assert!(matches!(result, Err(RenderError::ToolUnavailable(_))));
    }

    #[test]
    fn empty_command_is_unavailable() {
        assert!(matches!(
            DrawioCli::detect("  "),
            Err(RenderError::ToolUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_version_probe_is_unavailable() {
        // `false` ignores its arguments and exits 1
        assert!(matches!(
            DrawioCli::detect("false"),
            Err(RenderError::ToolUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn export_without_output_file_fails() {
        // `true` accepts anything and writes nothing
        let tmp = tempfile::TempDir::new().unwrap();
        let renderer = DrawioCli::detect("true").unwrap();
        let job = RenderJob {
            id: "a".into(),
            source: tmp.path().join("a.drawio"),
            png: tmp.path().join("a.png"),
            svg: tmp.path().join("a.svg"),
        };
        assert!(matches!(renderer.render(&job), Err(RenderError::Failed(_))));
    }
}
