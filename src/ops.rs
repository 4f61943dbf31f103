//! Results of generator actions, and writing them to disk.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SupervisorError;

/// Result of a generator action. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// Rendered supervisord configuration text.
    Rendered(String),
    /// Confirmation that rendered text was written to a file.
    Written { path: PathBuf },
    /// A manifest loaded and validated; the program names it declares.
    Checked { programs: Vec<String> },
    /// The commented settings template.
    Template(String),
    /// Confirmation that the settings template was written to a file.
    TemplateWritten { path: PathBuf },
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderResult::Rendered(text) | RenderResult::Template(text) => write!(f, "{text}"),
            RenderResult::Written { path } => {
                writeln!(f, "Supervisor config written to {}", path.display())
            }
            RenderResult::Checked { programs } => {
                writeln!(f, "OK: {} program(s): {}", programs.len(), programs.join(", "))
            }
            RenderResult::TemplateWritten { path } => {
                writeln!(f, "Settings template written to {}", path.display())
            }
        }
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), SupervisorError> {
    std::fs::write(path, content).map_err(|e| SupervisorError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
