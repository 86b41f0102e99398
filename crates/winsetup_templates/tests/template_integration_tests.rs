//! Integration tests for the filesystem collaborators.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;
use winsetup_core::{BuildParameters, ParamKey, RenderOrchestrator};
use winsetup_templates::{FsFileWriter, FsTemplateRenderer, TemplateStore};

fn orchestrator(store: TemplateStore) -> RenderOrchestrator {
    RenderOrchestrator::new(
        Arc::new(FsTemplateRenderer::new(store)),
        Arc::new(FsFileWriter::new()),
    )
}

fn params(dir: &Path) -> BuildParameters {
    BuildParameters::new()
        .config_output_dir(dir)
        .image_index(3)
        .installation_steps("{\n  \"steps\": []\n}")
}

fn has_bare_lf(text: &str) -> bool {
    text.as_bytes()
        .iter()
        .enumerate()
        .any(|(i, b)| *b == b'\n' && (i == 0 || text.as_bytes()[i - 1] != b'\r'))
}

#[test]
fn test_generates_all_artifacts() {
    let dir = tempdir().unwrap();
    let outcome = orchestrator(TemplateStore::builtin()).run(&params(dir.path()));
    assert!(outcome.changed, "{}", outcome.msg);

    for name in ["autounattend.xml", "start.ps1", "main.cs", "install.json"] {
        assert!(dir.path().join(name).exists(), "{name} was not written");
    }
}

#[test]
fn test_templates_use_crlf_and_have_no_leftover_placeholders() {
    let dir = tempdir().unwrap();
    orchestrator(TemplateStore::builtin()).run(&params(dir.path()));

    for name in ["autounattend.xml", "start.ps1", "main.cs"] {
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(!has_bare_lf(&content), "{name} has bare LF line endings");
        assert!(content.contains("\r\n"));
        assert!(!content.contains("{{"), "{name} has unrendered placeholders");
    }
}

#[test]
fn test_install_manifest_is_verbatim() {
    let dir = tempdir().unwrap();
    orchestrator(TemplateStore::builtin()).run(&params(dir.path()));

    let manifest = fs::read_to_string(dir.path().join("install.json")).unwrap();
    assert_eq!(manifest, "{\n  \"steps\": []\n}");
}

#[test]
fn test_answer_file_content() {
    let dir = tempdir().unwrap();
    let params = params(dir.path())
        .with(ParamKey::ComputerName, "BUILD-01")
        .unwrap()
        .with(ParamKey::NetworkInterface, "Ethernet")
        .unwrap()
        .with(ParamKey::StaticIpAddressCidr, "10.0.0.5/24")
        .unwrap()
        .with(ParamKey::StaticRouteCidr, "0.0.0.0/0")
        .unwrap()
        .with(ParamKey::StaticGatewayIp, "10.0.0.1")
        .unwrap()
        .with(ParamKey::StaticDnsServer, "10.0.0.2")
        .unwrap()
        .with(ParamKey::StaticSecondaryDnsServer, "10.0.0.3")
        .unwrap();
    let outcome = orchestrator(TemplateStore::builtin()).run(&params);
    assert!(outcome.changed, "{}", outcome.msg);

    let xml = fs::read_to_string(dir.path().join("autounattend.xml")).unwrap();
    assert!(xml.contains("<Value>3</Value>"));
    assert!(xml.contains("<ComputerName>BUILD-01</ComputerName>"));
    assert!(xml.contains("<Username>Administrator</Username>"));
    assert_eq!(xml.matches("Microsoft-Windows-TCPIP").count(), 2);
    assert!(xml.contains(">10.0.0.5/24</IpAddress>"));
    // The default first logon command chains with '&', which must be escaped.
    assert!(xml.contains("goto :break) else (echo Not found)) &amp; :break"));
}

#[test]
fn test_bootstrap_script_references_constants() {
    let dir = tempdir().unwrap();
    let params = params(dir.path()).with(ParamKey::DebugSerialPort, "1").unwrap();
    orchestrator(TemplateStore::builtin()).run(&params);

    let script = fs::read_to_string(dir.path().join("start.ps1")).unwrap();
    assert!(script.contains("\"main.cs\""));
    assert!(script.contains("\"install.json\""));
    assert!(script.contains("ansiblewinbuilder.lock"));
    assert!(script.contains("ansible-win-setup-done-list.log"));
    assert!(script.contains("$DebugSerialPort = \"1\""));
}

#[test]
fn test_template_override_directory() {
    let templates = tempdir().unwrap();
    fs::write(
        templates.path().join("main.cs"),
        "// custom {{computer_name}}\n",
    )
    .unwrap();
    let out = tempdir().unwrap();

    let store = TemplateStore::with_overrides(templates.path()).unwrap();
    let params = params(out.path()).with(ParamKey::ComputerName, "HOST").unwrap();
    let outcome = orchestrator(store).run(&params);
    assert!(outcome.changed, "{}", outcome.msg);

    let code = fs::read_to_string(out.path().join("main.cs")).unwrap();
    assert_eq!(code, "// custom HOST\r\n");
}

#[test]
fn test_broken_override_fails_run_as_unexpected() {
    let templates = tempdir().unwrap();
    fs::write(templates.path().join("start.ps1"), "{{entry_point|shout}}").unwrap();
    let out = tempdir().unwrap();

    let store = TemplateStore::with_overrides(templates.path()).unwrap();
    let outcome = orchestrator(store).run(&params(out.path()));

    assert!(outcome.failed);
    assert!(outcome.msg.starts_with("Unexpected error: "));
    // autounattend.xml was rendered before the failure and is kept.
    assert!(out.path().join("autounattend.xml").exists());
    assert!(!out.path().join("install.json").exists());
}
