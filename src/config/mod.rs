use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub input_format: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    #[serde(alias = "only_sections")]
    pub sections: Option<Vec<String>>,
    pub no_color: Option<bool>,
    pub classify: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".faultview").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<Option<ConfigFile>>(&contents)
            .map(Option::unwrap_or_default)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Faultview config
#
# Location (default):
#   ~/.faultview/config.yml

# Input: auto | text | record | records
input_format: auto

# Output (optional)
# output: ./analysis.html
# output_format: html

# Only emit these sections (names or Chinese labels); omit for all.
# sections:
#   - solution
#   - severity

# Attach keyword classification (category, solution, priority, confidence)
classify: false

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());

        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.input_format.as_deref(), Some("auto"));
        assert_eq!(cfg.classify, Some(false));
        assert_eq!(cfg.no_color, Some(false));
        assert_eq!(cfg.output, None);
        assert_eq!(cfg.sections, None);
    }

    #[test]
    fn missing_config_respects_allow_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false)
            .unwrap_err()
            .contains("config file not found"));
    }

    #[test]
    fn empty_and_invalid_configs() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.yml");
        std::fs::write(&empty, "# nothing set\n").unwrap();
        assert_eq!(load_config(&empty, false).unwrap(), ConfigFile::default());

        let bad = dir.path().join("bad.yml");
        std::fs::write(&bad, "classify: [not, a, bool]\n").unwrap();
        assert!(load_config(&bad, false)
            .unwrap_err()
            .contains("failed to parse config"));
    }

    #[test]
    fn sections_accept_alias() {
        let cfg: ConfigFile =
            serde_yaml::from_str("only_sections: [solution, 问题严重程度]\n").unwrap();
        assert_eq!(
            cfg.sections,
            Some(vec!["solution".to_string(), "问题严重程度".to_string()])
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
        assert_eq!(expand_tilde("/etc/x.yml"), PathBuf::from("/etc/x.yml"));
    }
}
