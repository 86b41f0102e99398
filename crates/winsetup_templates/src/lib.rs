//! # winsetup_templates
//!
//! Filesystem collaborators for the winsetup pipeline.
//!
//! - [`FsTemplateRenderer`] renders `{{variable}}` templates with forced line
//!   endings and writes them to disk
//! - [`FsFileWriter`] writes inline content or copies a source file
//! - [`TemplateStore`] serves the built-in `autounattend.xml`, `start.ps1` and
//!   `main.cs` templates, optionally overridden from a directory
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use winsetup_core::{BuildParameters, RenderOrchestrator};
//! use winsetup_templates::{FsFileWriter, FsTemplateRenderer, TemplateStore};
//!
//! let renderer = FsTemplateRenderer::new(TemplateStore::builtin());
//! let orchestrator = RenderOrchestrator::new(Arc::new(renderer), Arc::new(FsFileWriter::new()));
//!
//! let params = BuildParameters::new()
//!     .config_output_dir("./setup")
//!     .image_index(1)
//!     .installation_steps("[]");
//! let outcome = orchestrator.run(&params);
//! println!("{}", outcome.msg);
//! ```

pub mod error;
pub mod renderer;
pub mod store;
pub mod writer;

pub use error::{TemplateError, TemplateResult};
pub use renderer::{normalize_line_endings, FsTemplateRenderer};
pub use store::TemplateStore;
pub use writer::FsFileWriter;
