//! Build parameters.
//!
//! A run is driven by a flat set of named parameters. The recognized
//! vocabulary is closed: [`ParamKey`] lists every key, and loading a mapping
//! that carries anything else fails with
//! [`WinSetupError::UnknownParameter`].

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{WinSetupError, WinSetupResult};

/// Recognized parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    ConfigOutputDir,
    ImageIndex,
    InstallationSteps,
    AdminPassword,
    AdminUserName,
    UserName,
    UserPassword,
    ComputerName,
    FirstLogonCmd,
    NetworkInterface,
    StaticIpAddressCidr,
    StaticRouteCidr,
    StaticGatewayIp,
    StaticDnsServer,
    StaticSecondaryDnsServer,
    DebugSerialPort,
}

impl ParamKey {
    /// Every recognized key.
    pub const ALL: [ParamKey; 16] = [
        ParamKey::ConfigOutputDir,
        ParamKey::ImageIndex,
        ParamKey::InstallationSteps,
        ParamKey::AdminPassword,
        ParamKey::AdminUserName,
        ParamKey::UserName,
        ParamKey::UserPassword,
        ParamKey::ComputerName,
        ParamKey::FirstLogonCmd,
        ParamKey::NetworkInterface,
        ParamKey::StaticIpAddressCidr,
        ParamKey::StaticRouteCidr,
        ParamKey::StaticGatewayIp,
        ParamKey::StaticDnsServer,
        ParamKey::StaticSecondaryDnsServer,
        ParamKey::DebugSerialPort,
    ];

    /// Keys that must be present before anything is derived or rendered.
    pub const REQUIRED: [ParamKey; 3] = [
        ParamKey::ConfigOutputDir,
        ParamKey::ImageIndex,
        ParamKey::InstallationSteps,
    ];

    /// The all-or-nothing static IP group, in fragment field order.
    pub const STATIC_IP: [ParamKey; 6] = [
        ParamKey::NetworkInterface,
        ParamKey::StaticIpAddressCidr,
        ParamKey::StaticRouteCidr,
        ParamKey::StaticGatewayIp,
        ParamKey::StaticDnsServer,
        ParamKey::StaticSecondaryDnsServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::ConfigOutputDir => "config_output_dir",
            ParamKey::ImageIndex => "image_index",
            ParamKey::InstallationSteps => "installation_steps",
            ParamKey::AdminPassword => "admin_password",
            ParamKey::AdminUserName => "admin_user_name",
            ParamKey::UserName => "user_name",
            ParamKey::UserPassword => "user_password",
            ParamKey::ComputerName => "computer_name",
            ParamKey::FirstLogonCmd => "first_logon_cmd",
            ParamKey::NetworkInterface => "network_interface",
            ParamKey::StaticIpAddressCidr => "static_ip_address_cidr",
            ParamKey::StaticRouteCidr => "static_route_cidr",
            ParamKey::StaticGatewayIp => "static_gateway_ip",
            ParamKey::StaticDnsServer => "static_dns_server",
            ParamKey::StaticSecondaryDnsServer => "static_secondary_dns_server",
            ParamKey::DebugSerialPort => "debug_serial_port",
        }
    }

    /// Look up a key by its parameter name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters for one image build. Read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildParameters {
    pub config_output_dir: Option<PathBuf>,
    pub image_index: Option<u32>,
    pub installation_steps: Option<String>,
    pub admin_password: Option<String>,
    pub admin_user_name: Option<String>,
    pub user_name: Option<String>,
    pub user_password: Option<String>,
    pub computer_name: Option<String>,
    pub first_logon_cmd: Option<String>,
    pub network_interface: Option<String>,
    pub static_ip_address_cidr: Option<String>,
    pub static_route_cidr: Option<String>,
    pub static_gateway_ip: Option<String>,
    pub static_dns_server: Option<String>,
    pub static_secondary_dns_server: Option<String>,
    pub debug_serial_port: Option<String>,
}

impl BuildParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_output_dir = Some(dir.into());
        self
    }

    pub fn image_index(mut self, index: u32) -> Self {
        self.image_index = Some(index);
        self
    }

    pub fn installation_steps(mut self, steps: impl Into<String>) -> Self {
        self.installation_steps = Some(steps.into());
        self
    }

    /// Set a parameter from its textual form.
    ///
    /// Goes through [`BuildParameters::set`], so an `image_index` that does
    /// not parse is an error and leaves the current value in place.
    pub fn with(mut self, key: ParamKey, value: impl Into<String>) -> WinSetupResult<Self> {
        self.set(key, &Value::String(value.into()))?;
        Ok(self)
    }

    /// Whether a parameter is present (non-null).
    pub fn is_set(&self, key: ParamKey) -> bool {
        match key {
            ParamKey::ConfigOutputDir => self.config_output_dir.is_some(),
            ParamKey::ImageIndex => self.image_index.is_some(),
            _ => self.text(key).is_some(),
        }
    }

    /// Keys from `keys` that are not set, in the order given.
    pub fn missing<'a>(&self, keys: impl IntoIterator<Item = &'a ParamKey>) -> Vec<ParamKey> {
        keys.into_iter()
            .copied()
            .filter(|key| !self.is_set(*key))
            .collect()
    }

    /// Value of a text-valued parameter.
    pub fn text(&self, key: ParamKey) -> Option<&str> {
        let value = match key {
            ParamKey::ConfigOutputDir | ParamKey::ImageIndex => return None,
            ParamKey::InstallationSteps => &self.installation_steps,
            ParamKey::AdminPassword => &self.admin_password,
            ParamKey::AdminUserName => &self.admin_user_name,
            ParamKey::UserName => &self.user_name,
            ParamKey::UserPassword => &self.user_password,
            ParamKey::ComputerName => &self.computer_name,
            ParamKey::FirstLogonCmd => &self.first_logon_cmd,
            ParamKey::NetworkInterface => &self.network_interface,
            ParamKey::StaticIpAddressCidr => &self.static_ip_address_cidr,
            ParamKey::StaticRouteCidr => &self.static_route_cidr,
            ParamKey::StaticGatewayIp => &self.static_gateway_ip,
            ParamKey::StaticDnsServer => &self.static_dns_server,
            ParamKey::StaticSecondaryDnsServer => &self.static_secondary_dns_server,
            ParamKey::DebugSerialPort => &self.debug_serial_port,
        };
        value.as_deref()
    }

    fn text_slot(&mut self, key: ParamKey) -> Option<&mut Option<String>> {
        let slot = match key {
            ParamKey::ConfigOutputDir | ParamKey::ImageIndex => return None,
            ParamKey::InstallationSteps => &mut self.installation_steps,
            ParamKey::AdminPassword => &mut self.admin_password,
            ParamKey::AdminUserName => &mut self.admin_user_name,
            ParamKey::UserName => &mut self.user_name,
            ParamKey::UserPassword => &mut self.user_password,
            ParamKey::ComputerName => &mut self.computer_name,
            ParamKey::FirstLogonCmd => &mut self.first_logon_cmd,
            ParamKey::NetworkInterface => &mut self.network_interface,
            ParamKey::StaticIpAddressCidr => &mut self.static_ip_address_cidr,
            ParamKey::StaticRouteCidr => &mut self.static_route_cidr,
            ParamKey::StaticGatewayIp => &mut self.static_gateway_ip,
            ParamKey::StaticDnsServer => &mut self.static_dns_server,
            ParamKey::StaticSecondaryDnsServer => &mut self.static_secondary_dns_server,
            ParamKey::DebugSerialPort => &mut self.debug_serial_port,
        };
        Some(slot)
    }

    /// Set one parameter from a loosely typed value. `null` clears it.
    pub fn set(&mut self, key: ParamKey, value: &Value) -> WinSetupResult<()> {
        if value.is_null() {
            match key {
                ParamKey::ConfigOutputDir => self.config_output_dir = None,
                ParamKey::ImageIndex => self.image_index = None,
                _ => {
                    if let Some(slot) = self.text_slot(key) {
                        *slot = None;
                    }
                }
            }
            return Ok(());
        }

        match key {
            ParamKey::ConfigOutputDir => {
                let dir = value.as_str().ok_or_else(|| invalid(key, "expected a path"))?;
                self.config_output_dir = Some(PathBuf::from(dir));
            }
            ParamKey::ImageIndex => {
                self.image_index = Some(parse_index(value)?);
            }
            ParamKey::InstallationSteps => {
                let steps = match value {
                    Value::String(s) => s.clone(),
                    other => serde_json::to_string(other)?,
                };
                self.installation_steps = Some(steps);
            }
            _ => {
                let text = scalar_text(value).ok_or_else(|| invalid(key, "expected a scalar value"))?;
                if let Some(slot) = self.text_slot(key) {
                    *slot = Some(text);
                }
            }
        }
        Ok(())
    }

    /// Build parameters from a flat mapping of names to values.
    ///
    /// Every unrecognized name is reported at once.
    pub fn from_map(map: &Map<String, Value>) -> WinSetupResult<Self> {
        let unknown: Vec<String> = map
            .keys()
            .filter(|name| ParamKey::from_name(name).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(WinSetupError::UnknownParameter(unknown));
        }

        let mut params = Self::default();
        for (name, value) in map {
            if let Some(key) = ParamKey::from_name(name) {
                params.set(key, value)?;
            }
        }
        Ok(params)
    }

    /// Build parameters from a parsed document whose root is a mapping.
    pub fn from_value(value: Value) -> WinSetupResult<Self> {
        match value {
            Value::Object(map) => Self::from_map(&map),
            Value::Null => Ok(Self::default()),
            _ => Err(WinSetupError::InvalidParameter {
                key: "parameters".to_string(),
                message: "expected a mapping of parameter names to values".to_string(),
            }),
        }
    }

    pub fn from_json_str(content: &str) -> WinSetupResult<Self> {
        Self::from_value(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> WinSetupResult<Self> {
        Self::from_value(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> WinSetupResult<Self> {
        Self::from_value(toml::from_str(content)?)
    }

    /// Load parameters from a file. The format follows the extension;
    /// anything other than `.json` or `.toml` is read as YAML.
    pub fn load(path: impl AsRef<Path>) -> WinSetupResult<Self> {
        let path = path.as_ref();
        debug!("Loading build parameters from {:?}", path);

        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

fn invalid(key: ParamKey, message: &str) -> WinSetupError {
    WinSetupError::InvalidParameter {
        key: key.as_str().to_string(),
        message: message.to_string(),
    }
}

fn parse_index(value: &Value) -> WinSetupResult<u32> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|index| u32::try_from(index).ok())
        .ok_or_else(|| invalid(ParamKey::ImageIndex, "expected a non-negative integer"))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_names_round_trip() {
        for key in ParamKey::ALL {
            assert_eq!(ParamKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(ParamKey::from_name("admin_pass"), None);
    }

    #[test]
    fn test_from_map_rejects_every_unknown_key() {
        let map = json!({
            "config_output_dir": "/out",
            "colour": "blue",
            "size": 3
        });
        let err = BuildParameters::from_value(map).unwrap_err();
        match err {
            WinSetupError::UnknownParameter(keys) => {
                assert_eq!(keys.len(), 2);
                assert!(keys.contains(&"colour".to_string()));
                assert!(keys.contains(&"size".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        let params = BuildParameters::from_value(json!({
            "config_output_dir": "/out",
            "image_index": null,
            "computer_name": null
        }))
        .unwrap();
        assert!(params.is_set(ParamKey::ConfigOutputDir));
        assert!(!params.is_set(ParamKey::ImageIndex));
        assert!(!params.is_set(ParamKey::ComputerName));
    }

    #[test]
    fn test_image_index_accepts_numeric_strings() {
        let params = BuildParameters::from_value(json!({ "image_index": "4" })).unwrap();
        assert_eq!(params.image_index, Some(4));

        // Zero loads; ParameterValidator rejects it after the presence check.
        let params = BuildParameters::from_value(json!({ "image_index": 0 })).unwrap();
        assert_eq!(params.image_index, Some(0));

        let err = BuildParameters::from_value(json!({ "image_index": -1 })).unwrap_err();
        assert!(err.is_domain());
        let err = BuildParameters::from_value(json!({ "image_index": "four" })).unwrap_err();
        assert!(err.to_string().contains("image_index"));
    }

    #[test]
    fn test_structured_installation_steps_become_json() {
        let params = BuildParameters::from_value(json!({
            "installation_steps": { "steps": ["a", "b"] }
        }))
        .unwrap();
        assert_eq!(
            params.installation_steps.as_deref(),
            Some(r#"{"steps":["a","b"]}"#)
        );
    }

    #[test]
    fn test_debug_serial_port_accepts_integer() {
        let params = BuildParameters::from_value(json!({ "debug_serial_port": 1 })).unwrap();
        assert_eq!(params.text(ParamKey::DebugSerialPort), Some("1"));
    }

    #[test]
    fn test_from_yaml_str() {
        let params = BuildParameters::from_yaml_str(
            r#"
config_output_dir: /out
image_index: 3
installation_steps: "{}"
computer_name: BUILD-01
"#,
        )
        .unwrap();
        assert_eq!(params.config_output_dir, Some(PathBuf::from("/out")));
        assert_eq!(params.image_index, Some(3));
        assert_eq!(params.computer_name.as_deref(), Some("BUILD-01"));
    }

    #[test]
    fn test_from_toml_str() {
        let params = BuildParameters::from_toml_str(
            r#"
config_output_dir = "/out"
image_index = 2
installation_steps = "[]"
"#,
        )
        .unwrap();
        assert_eq!(params.image_index, Some(2));
        assert_eq!(params.installation_steps.as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_preserves_order() {
        let params = BuildParameters::new().image_index(1);
        assert_eq!(
            params.missing(&ParamKey::REQUIRED),
            vec![ParamKey::ConfigOutputDir, ParamKey::InstallationSteps]
        );
    }

    #[test]
    fn test_with_sets_text_keys() {
        let params = BuildParameters::new()
            .with(ParamKey::ConfigOutputDir, "/out")
            .unwrap()
            .with(ParamKey::ImageIndex, "7")
            .unwrap()
            .with(ParamKey::StaticGatewayIp, "10.0.0.1")
            .unwrap();
        assert_eq!(params.config_output_dir, Some(PathBuf::from("/out")));
        assert_eq!(params.image_index, Some(7));
        assert_eq!(params.text(ParamKey::StaticGatewayIp), Some("10.0.0.1"));
    }

    #[test]
    fn test_with_rejects_unparsable_index_and_keeps_value() {
        let params = BuildParameters::new().image_index(3);
        let err = params.clone().with(ParamKey::ImageIndex, "three").unwrap_err();
        assert!(matches!(err, WinSetupError::InvalidParameter { .. }));

        let mut params = params;
        assert!(params
            .set(ParamKey::ImageIndex, &Value::String("three".to_string()))
            .is_err());
        assert_eq!(params.image_index, Some(3));
    }
}
