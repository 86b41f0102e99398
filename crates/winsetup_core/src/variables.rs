//! Template variable assembly.
//!
//! Every template sees the same flat set of variables: the fixed file names,
//! the account and system settings from the build parameters (with their
//! defaults), and the two computed XML fragments.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::artifact::{default_first_logon_cmd, FileNames, DEFAULT_ADMIN_USER_NAME};
use crate::params::{BuildParameters, ParamKey};

/// Variable names visible to templates.
pub mod keys {
    pub const FROM_IMAGE_XML_CODE: &str = "from_image_xml_code";
    pub const STATIC_IP_XML_CODE: &str = "static_ip_xml_code";

    pub const ADMIN_PASSWORD: &str = "admin_password";
    pub const ADMIN_USER_NAME: &str = "admin_user_name";
    pub const USER_NAME: &str = "user_name";
    pub const USER_PASSWORD: &str = "user_password";
    pub const COMPUTER_NAME: &str = "computer_name";
    pub const FIRST_LOGON_CMD: &str = "first_logon_cmd";
    pub const DEBUG_SERIAL_PORT: &str = "debug_serial_port";

    pub const INSTALL_JSON: &str = "install_json";
    pub const ENTRY_POINT: &str = "entry_point";
    pub const MAIN_CODE: &str = "main_code";
    pub const DEFAULT_PACKAGE_JSON_PATH: &str = "default_package_json_path";
    pub const LOCK_FILE: &str = "lock_file";
    pub const DONE_LIST_FILE: &str = "done_list_file";
}

/// Computed answer-file fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub image_index: String,
    pub network: String,
}

/// The flat variable mapping handed to the template renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderedVariableSet {
    values: BTreeMap<String, String>,
}

impl RenderedVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Merges constants, parameters and fragments into one variable set.
pub struct VariableAssembler;

impl VariableAssembler {
    pub fn assemble(params: &BuildParameters, fragments: &Fragments) -> RenderedVariableSet {
        let mut vars = RenderedVariableSet::new();

        vars.insert(keys::INSTALL_JSON, FileNames::INSTALL_JSON);
        vars.insert(keys::ENTRY_POINT, FileNames::ENTRY_POINT);
        vars.insert(keys::MAIN_CODE, FileNames::MAIN_CODE);
        vars.insert(keys::DEFAULT_PACKAGE_JSON_PATH, FileNames::INSTALL_JSON);
        vars.insert(keys::LOCK_FILE, FileNames::LOCK_FILE);
        vars.insert(keys::DONE_LIST_FILE, FileNames::DONE_LIST_FILE);

        let text_or = |key: ParamKey, default: &str| -> String {
            params.text(key).unwrap_or(default).to_string()
        };

        vars.insert(keys::ADMIN_PASSWORD, text_or(ParamKey::AdminPassword, ""));
        vars.insert(
            keys::ADMIN_USER_NAME,
            text_or(ParamKey::AdminUserName, DEFAULT_ADMIN_USER_NAME),
        );
        vars.insert(keys::USER_NAME, text_or(ParamKey::UserName, ""));
        vars.insert(keys::USER_PASSWORD, text_or(ParamKey::UserPassword, ""));
        vars.insert(keys::COMPUTER_NAME, text_or(ParamKey::ComputerName, ""));
        vars.insert(
            keys::FIRST_LOGON_CMD,
            match params.text(ParamKey::FirstLogonCmd) {
                Some(cmd) => cmd.to_string(),
                None => default_first_logon_cmd(),
            },
        );
        vars.insert(keys::DEBUG_SERIAL_PORT, text_or(ParamKey::DebugSerialPort, ""));

        vars.insert(keys::FROM_IMAGE_XML_CODE, fragments.image_index.as_str());
        vars.insert(keys::STATIC_IP_XML_CODE, fragments.network.as_str());

        vars
    }
}
