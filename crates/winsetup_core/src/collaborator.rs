//! Collaborator interfaces.
//!
//! The pipeline never touches the filesystem itself. Rendering templates and
//! writing files go through these two traits, injected into the
//! orchestrator.

use std::path::{Path, PathBuf};

use crate::error::WinSetupResult;
use crate::variables::RenderedVariableSet;

/// Line ending convention for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`, required by the Windows guest.
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// What a [`FileWriter`] writes: exactly one of a source file or inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteSource {
    File(PathBuf),
    Content(String),
}

/// Renders a named template with a variable set and writes the result.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template_id: &str,
        dest: &Path,
        variables: &RenderedVariableSet,
        line_ending: LineEnding,
    ) -> WinSetupResult<()>;
}

/// Writes a file verbatim.
#[cfg_attr(test, mockall::automock)]
pub trait FileWriter: Send + Sync {
    fn write(&self, dest: &Path, source: &WriteSource) -> WinSetupResult<()>;
}
