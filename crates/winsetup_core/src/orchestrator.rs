//! Run orchestration.
//!
//! A run validates the parameters, derives the answer-file fragments,
//! assembles the variable set, renders the three templates and writes the
//! install manifest, in that order. The first failure stops the run. Files
//! already written stay in place.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::artifact::OutputArtifact;
use crate::collaborator::{FileWriter, LineEnding, TemplateRenderer, WriteSource};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{WinSetupError, WinSetupResult};
use crate::image::ImageSelectorBuilder;
use crate::network::StaticNetworkConfigBuilder;
use crate::params::BuildParameters;
use crate::validator::ParameterValidator;
use crate::variables::{Fragments, RenderedVariableSet, VariableAssembler};

pub const SUCCESS_MESSAGE: &str = "Windows setup configuration completed successfully";

/// Result of a run, in the shape the host pipeline expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub changed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    pub msg: String,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            changed: true,
            failed: false,
            msg: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: msg.into(),
        }
    }

    fn from_error(err: &WinSetupError) -> Self {
        if err.is_domain() {
            Self::failure(err.to_string())
        } else {
            Self::failure(format!("Unexpected error: {}", err))
        }
    }

    pub fn is_success(&self) -> bool {
        !self.failed
    }
}

/// Drives one run against the injected collaborators.
pub struct RenderOrchestrator {
    renderer: Arc<dyn TemplateRenderer>,
    writer: Arc<dyn FileWriter>,
    diagnostics: Arc<dyn DiagnosticSink>,
    line_ending: LineEnding,
}

impl RenderOrchestrator {
    pub fn new(renderer: Arc<dyn TemplateRenderer>, writer: Arc<dyn FileWriter>) -> Self {
        Self {
            renderer,
            writer,
            diagnostics: Arc::new(TracingSink),
            line_ending: LineEnding::Crlf,
        }
    }

    /// Replace the default `tracing` diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Run the pipeline. Never returns an error; failures are reported in
    /// the outcome.
    pub fn run(&self, params: &BuildParameters) -> Outcome {
        match self.execute(params) {
            Ok(()) => {
                self.diagnostics.info(SUCCESS_MESSAGE);
                Outcome::success()
            }
            Err(err) => self.report(&err),
        }
    }

    /// Run the pipeline from a raw parameter mapping, as received from the
    /// host. Unrecognized keys fail the run.
    pub fn run_raw(&self, raw: &Map<String, Value>) -> Outcome {
        match BuildParameters::from_map(raw) {
            Ok(params) => self.run(&params),
            Err(err) => self.report(&err),
        }
    }

    /// Validate and derive fragments without rendering anything.
    pub fn prepare(params: &BuildParameters) -> WinSetupResult<RenderedVariableSet> {
        ParameterValidator::validate_required(params)?;

        let network = StaticNetworkConfigBuilder::build_network_fragment(params)?;
        let image_index = ImageSelectorBuilder::build_image_index_fragment(params.image_index);
        let fragments = Fragments {
            image_index,
            network,
        };

        Ok(VariableAssembler::assemble(params, &fragments))
    }

    fn execute(&self, params: &BuildParameters) -> WinSetupResult<()> {
        let variables = Self::prepare(params)?;

        // Validated above.
        let dest_dir = params
            .config_output_dir
            .as_deref()
            .ok_or_else(|| WinSetupError::Unexpected("output directory vanished".to_string()))?;
        self.diagnostics
            .info(&format!("Generating Windows setup files in {}", dest_dir.display()));

        for artifact in OutputArtifact::TEMPLATED {
            self.render_artifact(artifact, dest_dir, &variables)?;
        }
        self.write_install_manifest(params, dest_dir)
    }

    fn render_artifact(
        &self,
        artifact: OutputArtifact,
        dest_dir: &Path,
        variables: &RenderedVariableSet,
    ) -> WinSetupResult<()> {
        let template_id = artifact.template_id().ok_or_else(|| {
            WinSetupError::Unexpected(format!("{} is not rendered from a template", artifact))
        })?;
        let dest = artifact.path_in(dest_dir);
        self.diagnostics
            .debug(&format!("Rendering {} to {}", template_id, dest.display()));
        self.renderer
            .render(template_id, &dest, variables, self.line_ending)
    }

    fn write_install_manifest(&self, params: &BuildParameters, dest_dir: &Path) -> WinSetupResult<()> {
        let content = params.installation_steps.clone().unwrap_or_default();
        let dest = OutputArtifact::InstallManifest.path_in(dest_dir);
        self.diagnostics
            .debug(&format!("Writing install manifest to {}", dest.display()));
        self.writer.write(&dest, &WriteSource::Content(content))
    }

    fn report(&self, err: &WinSetupError) -> Outcome {
        if err.is_domain() {
            self.diagnostics
                .error(&format!("Windows setup error: {}", err));
        } else {
            self.diagnostics
                .error(&format!("Unexpected error during Windows setup: {}", err));
        }
        Outcome::from_error(err)
    }
}
