//! Output artifacts and the fixed file names shared with the guest.

use std::path::{Path, PathBuf};

/// File names known to the generated scripts. They do not vary per run.
pub struct FileNames;

impl FileNames {
    pub const ANSWER_FILE: &'static str = "autounattend.xml";
    pub const ENTRY_POINT: &'static str = "start.ps1";
    pub const MAIN_CODE: &'static str = "main.cs";
    pub const INSTALL_JSON: &'static str = "install.json";
    /// Held by the bootstrap script while setup steps run.
    pub const LOCK_FILE: &'static str = "ansiblewinbuilder.lock";
    /// Completed steps, one per line, so a rerun can skip them.
    pub const DONE_LIST_FILE: &'static str = "ansible-win-setup-done-list.log";
}

pub const DEFAULT_ADMIN_USER_NAME: &str = "Administrator";

const LAUNCH_ENTRY_POINT: &str = "start powershell.exe -NoExit -ExecutionPolicy Bypass -File";

/// First-logon command used when none is supplied: probe every drive letter
/// for the entry-point script and launch the first match.
pub fn default_first_logon_cmd() -> String {
    let drives = ('A'..='Z').map(String::from).collect::<Vec<_>>().join(" ");
    let script = FileNames::ENTRY_POINT;
    format!(
        "cmd.exe /C for %D in ({drives}) do @(if exist %D:\\{script} ( {LAUNCH_ENTRY_POINT} %D:\\{script} & goto :break) else (echo Not found)) & :break"
    )
}

/// One of the files a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputArtifact {
    AnswerFile,
    BootstrapScript,
    AutomationCode,
    InstallManifest,
}

impl OutputArtifact {
    /// Artifacts produced from templates, in render order.
    pub const TEMPLATED: [OutputArtifact; 3] = [
        OutputArtifact::AnswerFile,
        OutputArtifact::BootstrapScript,
        OutputArtifact::AutomationCode,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputArtifact::AnswerFile => FileNames::ANSWER_FILE,
            OutputArtifact::BootstrapScript => FileNames::ENTRY_POINT,
            OutputArtifact::AutomationCode => FileNames::MAIN_CODE,
            OutputArtifact::InstallManifest => FileNames::INSTALL_JSON,
        }
    }

    /// Template identifier for templated artifacts. Templates are named
    /// after the file they produce.
    pub fn template_id(&self) -> Option<&'static str> {
        match self {
            OutputArtifact::InstallManifest => None,
            other => Some(other.file_name()),
        }
    }

    /// Destination of the artifact inside the output directory.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl std::fmt::Display for OutputArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_first_logon_cmd_scans_every_drive() {
        let cmd = default_first_logon_cmd();
        let open = cmd.find('(').unwrap();
        let close = cmd.find(')').unwrap();
        let drives: Vec<&str> = cmd[open + 1..close].split(' ').collect();
        for letter in 'A'..='Z' {
            assert!(drives.contains(&letter.to_string().as_str()), "drive {letter} missing");
        }
        assert!(cmd.contains("start.ps1"));
        assert!(cmd.contains("-ExecutionPolicy Bypass"));
        assert_eq!(
            cmd,
            "cmd.exe /C for %D in (A B C D E F G H I J K L M N O P Q R S T U V W X Y Z) do @(if exist %D:\\start.ps1 ( start powershell.exe -NoExit -ExecutionPolicy Bypass -File %D:\\start.ps1 & goto :break) else (echo Not found)) & :break"
        );
    }

    #[test]
    fn test_artifact_paths() {
        let dir = Path::new("/out");
        assert_eq!(
            OutputArtifact::InstallManifest.path_in(dir),
            PathBuf::from("/out/install.json")
        );
        assert_eq!(OutputArtifact::InstallManifest.template_id(), None);
        assert_eq!(
            OutputArtifact::AnswerFile.template_id(),
            Some("autounattend.xml")
        );
    }
}
