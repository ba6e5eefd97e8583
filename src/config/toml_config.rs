use crate::core::ConfigProvider;
use crate::domain::ports::StoreLocation;
use crate::utils::error::{RecordError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NAME: &str = "Robin";
pub const DEFAULT_AGE: i64 = 30;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub output: OutputConfig,
    pub store: StoreConfig,
    pub person: PersonConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `memory` or `file`
    pub kind: String,
    pub path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: "memory".to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonConfig {
    pub name: Option<String>,
    pub age: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RecordError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RecordError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RecordError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn pretty_output(&self) -> bool {
        self.output.pretty
    }

    fn store_location(&self) -> StoreLocation {
        match (self.store.kind.as_str(), &self.store.path) {
            ("file", Some(path)) => StoreLocation::File(path.into()),
            _ => StoreLocation::Memory,
        }
    }

    fn person_name(&self) -> &str {
        self.person.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    fn person_age(&self) -> i64 {
        self.person.age.unwrap_or(DEFAULT_AGE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_one_of("store.kind", &self.store.kind, &["memory", "file"])?;

        if self.store.kind == "file" {
            let path = validation::validate_required_field("store.path", &self.store.path)?;
            validation::validate_path("store.path", path)?;
        }

        if let Some(name) = &self.person.name {
            validation::validate_non_empty_string("person.name", name)?;
        }

        if let Some(level) = &self.logging.level {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[output]
pretty = false

[store]
kind = "file"
path = "./data/people.json"

[person]
name = "Sam"
age = 41

[logging]
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(!config.pretty_output());
        assert_eq!(
            config.store_location(),
            StoreLocation::File("./data/people.json".into())
        );
        assert_eq!(config.person_name(), "Sam");
        assert_eq!(config.person_age(), 41);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert!(config.pretty_output());
        assert_eq!(config.store_location(), StoreLocation::Memory);
        assert_eq!(config.person_name(), DEFAULT_NAME);
        assert_eq!(config.person_age(), DEFAULT_AGE);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RECORD_CODEC_TEST_DIR", "/tmp/record-codec");

        let toml_content = r#"
[store]
kind = "file"
path = "${RECORD_CODEC_TEST_DIR}/people.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.store.path.as_deref(),
            Some("/tmp/record-codec/people.json")
        );

        std::env::remove_var("RECORD_CODEC_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let missing_path = TomlConfig::from_toml_str("[store]\nkind = \"file\"\n").unwrap();
        assert!(matches!(
            missing_path.validate(),
            Err(RecordError::MissingConfigError { .. })
        ));

        let bad_kind = TomlConfig::from_toml_str("[store]\nkind = \"sqlite\"\n").unwrap();
        assert!(bad_kind.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[person]\nname = \"File Person\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.person_name(), "File Person");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[store\nkind = 1").unwrap_err();
        assert!(matches!(err, RecordError::ConfigError { .. }));
    }
}
