//! Verbatim file output.

use std::fs;
use std::path::Path;

use tracing::debug;

use winsetup_core::{FileWriter, WinSetupResult, WriteSource};

/// Writes files to the local filesystem, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileWriter;

impl FsFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl FileWriter for FsFileWriter {
    fn write(&self, dest: &Path, source: &WriteSource) -> WinSetupResult<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match source {
            WriteSource::Content(content) => {
                fs::write(dest, content)?;
                debug!("Wrote {} bytes to {:?}", content.len(), dest);
            }
            WriteSource::File(src) => {
                fs::copy(src, dest)?;
                debug!("Copied {:?} to {:?}", src, dest);
            }
        }
        Ok(())
    }
}
