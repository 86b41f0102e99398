//! Presence checks on build parameters.

use crate::error::{WinSetupError, WinSetupResult};
use crate::params::{BuildParameters, ParamKey};

/// Gate run before any fragment is derived or any file is rendered.
pub struct ParameterValidator;

impl ParameterValidator {
    /// Require every key in `required` to be present and non-null.
    ///
    /// Reports all missing keys, not only the first.
    pub fn validate(params: &BuildParameters, required: &[ParamKey]) -> WinSetupResult<()> {
        let missing = params.missing(required);
        if missing.is_empty() {
            return Ok(());
        }
        Err(WinSetupError::MissingParameter(
            missing.iter().map(|key| key.as_str().to_string()).collect(),
        ))
    }

    /// Check the top-level required set and the value ranges that the
    /// builders rely on.
    pub fn validate_required(params: &BuildParameters) -> WinSetupResult<()> {
        Self::validate(params, &ParamKey::REQUIRED)?;

        if params.image_index == Some(0) {
            return Err(WinSetupError::InvalidParameter {
                key: ParamKey::ImageIndex.as_str().to_string(),
                message: "expected a positive integer".to_string(),
            });
        }
        Ok(())
    }
}
