//! Configuration file parsing for hostjson.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file names to search for
const CONFIG_NAMES: &[&str] = &["hostjson.toml", ".hostjsonrc.toml"];

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Output formatting defaults
    #[serde(default)]
    pub format: FormatConfig,

    /// Parsing defaults
    #[serde(default)]
    pub parse: ParseConfig,
}

/// Output formatting configuration.
#[derive(Debug, Default, Deserialize)]
pub struct FormatConfig {
    /// Indent with this many spaces (clamped to 10)
    pub indent: Option<u32>,

    /// Indent with this string (first 10 characters); wins over `indent`
    pub indent_str: Option<String>,

    /// Only serialize these object keys, in this order
    pub keys: Option<Vec<String>>,
}

/// Parsing configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ParseConfig {
    /// Remove null object members while parsing
    #[serde(default)]
    pub drop_nulls: bool,
}

/// Load configuration from a file or search for default config files.
///
/// An explicit path must exist; a missing discovered file means defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(path) if !path.exists() => {
            anyhow::bail!("Config file {} does not exist", path.display())
        }
        Some(path) => Some(path.to_path_buf()),
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| find_config_file(&cwd)),
    };

    match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Search `start` and its parent directories for a configuration file.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.exists() {
                return Some(path);
            }
        }
        dir = current.parent();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.format.indent.is_none());
        assert!(config.format.keys.is_none());
        assert!(!config.parse.drop_nulls);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[format]
indent = 2
keys = ["id", "name"]

[parse]
drop_nulls = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.format.indent, Some(2));
        assert!(config.format.indent_str.is_none());
        assert_eq!(
            config.format.keys,
            Some(vec!["id".to_string(), "name".to_string()])
        );
        assert!(config.parse.drop_nulls);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("[format]\nindent_str = \"\\t\"\n").unwrap();
        assert_eq!(config.format.indent_str.as_deref(), Some("\t"));
        assert!(!config.parse.drop_nulls);
    }

    #[test]
    fn test_find_config_in_parent() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".hostjsonrc.toml"), "[format]\nindent = 4\n").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, root.path().join(".hostjsonrc.toml"));

        let config = load_config(Some(&found)).unwrap();
        assert_eq!(config.format.indent, Some(4));
    }

    #[test]
    fn test_primary_name_wins_in_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hostjson.toml"), "").unwrap();
        std::fs::write(dir.path().join(".hostjsonrc.toml"), "").unwrap();
        assert_eq!(
            find_config_file(dir.path()),
            Some(dir.path().join("hostjson.toml"))
        );
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostjson.toml");
        std::fs::write(&path, "[format]\nindent = \"wide\"\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("hostjson.toml"));
    }
}
