//! Rendering of diagram documents through the external `d2` executable.
//!
//! Layout and rasterization are owned by D2; this module only hands the
//! document over and collects the SVG. The [`Renderer`] trait is the seam
//! between the generation pipeline and that external collaborator, so the
//! pipeline can be exercised without a `d2` installation.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use log::debug;
use thiserror::Error;

use crate::config::RenderConfig;

/// Errors from the layout and render collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to run `{binary}`: {source}")]
    Spawn { binary: String, source: io::Error },

    #[error("I/O error while rendering: {0}")]
    Io(#[from] io::Error),

    /// The renderer rejected the document or failed to produce an image.
    /// D2 reports compile, layout, and render failures uniformly through
    /// its exit status, so they share one variant.
    #[error("d2 failed to render the diagram: {stderr}")]
    Failed { stderr: String },

    #[error("renderer produced invalid UTF-8 output")]
    InvalidOutput,
}

/// Compile, lay out, and render a diagram document to SVG.
pub trait Renderer {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<String, RenderError>;
}

/// Renderer backed by the `d2` command-line tool.
///
/// The document is written to the child's stdin and the SVG is read back
/// from its stdout; theme, padding, and layout engine are forwarded as
/// flags.
#[derive(Debug, Clone)]
pub struct D2Cli {
    binary: String,
}

impl D2Cli {
    /// Use a specific executable instead of `d2` from `PATH`.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for D2Cli {
    fn default() -> Self {
        Self::new("d2")
    }
}

impl Renderer for D2Cli {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<String, RenderError> {
        debug!(
            binary = self.binary.as_str(),
            layout = config.layout(),
            theme = config.theme(),
            pad = config.pad();
            "Invoking renderer"
        );

        let mut child = Command::new(&self.binary)
            .arg(format!("--layout={}", config.layout()))
            .arg(format!("--theme={}", config.theme()))
            .arg(format!("--pad={}", config.pad()))
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        {
            let mut stdin = child.stdin.take().expect("stdin is piped");
            stdin.write_all(source.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| RenderError::InvalidOutput)
    }
}
