//! Template rendering.
//!
//! Placeholders have the form `{{name}}`. `{{name|xml}}` escapes the value for
//! use inside XML text. Placeholders without a matching variable are left in
//! place.

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use winsetup_core::{xml, LineEnding, RenderedVariableSet, TemplateRenderer, WinSetupResult};

use crate::error::{TemplateError, TemplateResult};
use crate::store::TemplateStore;

/// Renders templates from a [`TemplateStore`] onto the filesystem.
pub struct FsTemplateRenderer {
    store: TemplateStore,
    variable_pattern: Regex,
}

impl Default for FsTemplateRenderer {
    fn default() -> Self {
        Self::new(TemplateStore::builtin())
    }
}

impl FsTemplateRenderer {
    pub fn new(store: TemplateStore) -> Self {
        Self {
            store,
            // {{variable_name}} or {{variable_name|filter}}
            variable_pattern: Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)(?:\|([a-z]+))?\}\}")
                .expect("placeholder pattern is valid"),
        }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Substitute placeholders in `content`.
    pub fn render_content(
        &self,
        content: &str,
        variables: &RenderedVariableSet,
    ) -> TemplateResult<String> {
        let mut unknown_filter = None;
        let rendered = self
            .variable_pattern
            .replace_all(content, |caps: &Captures| {
                let name = &caps[1];
                let Some(value) = variables.get(name) else {
                    warn!("No value for template variable {}", name);
                    return caps[0].to_string();
                };
                match caps.get(2).map(|m| m.as_str()) {
                    None => value.to_string(),
                    Some("xml") => xml::escape(value),
                    Some(filter) => {
                        unknown_filter.get_or_insert_with(|| filter.to_string());
                        caps[0].to_string()
                    }
                }
            })
            .into_owned();

        match unknown_filter {
            Some(filter) => Err(TemplateError::RenderingFailed(format!(
                "unknown filter: {}",
                filter
            ))),
            None => Ok(rendered),
        }
    }

    /// Render a template by id into a string with the given line endings.
    pub fn render_to_string(
        &self,
        template_id: &str,
        variables: &RenderedVariableSet,
        line_ending: LineEnding,
    ) -> TemplateResult<String> {
        let template = self.store.get(template_id)?;
        let rendered = self.render_content(&template, variables)?;
        Ok(normalize_line_endings(&rendered, line_ending))
    }

    fn render_file(
        &self,
        template_id: &str,
        dest: &Path,
        variables: &RenderedVariableSet,
        line_ending: LineEnding,
    ) -> TemplateResult<()> {
        let rendered = self.render_to_string(template_id, variables, line_ending)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, rendered)?;
        debug!("Rendered: {} -> {:?}", template_id, dest);
        Ok(())
    }
}

impl TemplateRenderer for FsTemplateRenderer {
    fn render(
        &self,
        template_id: &str,
        dest: &Path,
        variables: &RenderedVariableSet,
        line_ending: LineEnding,
    ) -> WinSetupResult<()> {
        Ok(self.render_file(template_id, dest, variables, line_ending)?)
    }
}

/// Rewrite every line break in `text` as `line_ending`.
pub fn normalize_line_endings(text: &str, line_ending: LineEnding) -> String {
    let unix = text.replace("\r\n", "\n");
    match line_ending {
        LineEnding::Lf => unix,
        LineEnding::Crlf => unix.replace('\n', "\r\n"),
    }
}
