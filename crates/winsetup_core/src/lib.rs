//! # winsetup_core
//!
//! Parameter validation and rendering pipeline for unattended Windows image
//! builds.
//!
//! A run turns one set of build parameters into four files in the output
//! directory: the `autounattend.xml` answer file, the `start.ps1` bootstrap
//! script, the `main.cs` automation code, and the `install.json` manifest.
//!
//! # Architecture
//!
//! - **ParameterValidator**: presence checks on the required parameters
//! - **StaticNetworkConfigBuilder**: all-or-nothing static IP group, rendered
//!   as TCPIP and DNS-Client components for `x86` and `amd64`
//! - **ImageSelectorBuilder**: the `InstallFrom` image index selector
//! - **VariableAssembler**: constants, parameters and fragments merged into
//!   one variable set
//! - **RenderOrchestrator**: renders the templates and writes the manifest
//!   through the injected [`TemplateRenderer`] and [`FileWriter`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use winsetup_core::mock::{RecordingRenderer, RecordingWriter};
//! use winsetup_core::{BuildParameters, RenderOrchestrator};
//!
//! let renderer = RecordingRenderer::new();
//! let writer = RecordingWriter::new();
//! let orchestrator = RenderOrchestrator::new(
//!     Arc::new(renderer.clone()),
//!     Arc::new(writer.clone()),
//! );
//!
//! let params = BuildParameters::new()
//!     .config_output_dir("/out")
//!     .image_index(3)
//!     .installation_steps("{}");
//!
//! let outcome = orchestrator.run(&params);
//! assert!(outcome.changed);
//! assert_eq!(renderer.call_count(), 3);
//! assert_eq!(writer.call_count(), 1);
//! ```

pub mod artifact;
pub mod collaborator;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod mock;
pub mod network;
pub mod orchestrator;
pub mod params;
pub mod validator;
pub mod variables;
pub mod xml;

pub use artifact::{default_first_logon_cmd, FileNames, OutputArtifact, DEFAULT_ADMIN_USER_NAME};
pub use collaborator::{FileWriter, LineEnding, TemplateRenderer, WriteSource};
pub use diagnostics::{DiagnosticSink, LogEntry, LogLevel, MemorySink, TracingSink};
pub use error::{WinSetupError, WinSetupResult};
pub use image::ImageSelectorBuilder;
pub use network::{Architecture, StaticIpConfig, StaticNetworkConfigBuilder};
pub use orchestrator::{Outcome, RenderOrchestrator, SUCCESS_MESSAGE};
pub use params::{BuildParameters, ParamKey};
pub use validator::ParameterValidator;
pub use variables::{Fragments, RenderedVariableSet, VariableAssembler};
