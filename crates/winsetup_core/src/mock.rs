//! Recording collaborators for testing.
//!
//! [`RecordingRenderer`] and [`RecordingWriter`] capture every call and can be
//! told to fail, so a run can be checked without touching the filesystem.
//! Clones share captured state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::collaborator::{FileWriter, LineEnding, TemplateRenderer, WriteSource};
use crate::error::{WinSetupError, WinSetupResult};
use crate::variables::RenderedVariableSet;

/// A captured `render` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub template_id: String,
    pub dest: PathBuf,
    pub variables: RenderedVariableSet,
    pub line_ending: LineEnding,
}

/// A captured `write` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub dest: PathBuf,
    pub source: WriteSource,
}

/// Template renderer that records calls instead of rendering.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<RwLock<Vec<RenderCall>>>,
    /// Template id that fails, with the message to fail with.
    failure: Arc<RwLock<Option<(String, String)>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when asked to render `template_id`. The call is still recorded.
    pub fn fail_on(self, template_id: impl Into<String>, message: impl Into<String>) -> Self {
        *self.failure.write() = Some((template_id.into(), message.into()));
        self
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    /// Template ids in the order they were rendered.
    pub fn template_ids(&self) -> Vec<String> {
        self.calls
            .read()
            .iter()
            .map(|call| call.template_id.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.write().clear();
    }
}

impl TemplateRenderer for RecordingRenderer {
    fn render(
        &self,
        template_id: &str,
        dest: &Path,
        variables: &RenderedVariableSet,
        line_ending: LineEnding,
    ) -> WinSetupResult<()> {
        self.calls.write().push(RenderCall {
            template_id: template_id.to_string(),
            dest: dest.to_path_buf(),
            variables: variables.clone(),
            line_ending,
        });

        match self.failure.read().as_ref() {
            Some((failing, message)) if failing == template_id => {
                Err(WinSetupError::Template(message.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// File writer that records calls instead of writing.
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    calls: Arc<RwLock<Vec<WriteCall>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write with an IO error carrying `message`.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write() = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }
}

impl FileWriter for RecordingWriter {
    fn write(&self, dest: &Path, source: &WriteSource) -> WinSetupResult<()> {
        self.calls.write().push(WriteCall {
            dest: dest.to_path_buf(),
            source: source.clone(),
        });

        if let Some(message) = self.failure.read().clone() {
            return Err(WinSetupError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )));
        }
        Ok(())
    }
}
