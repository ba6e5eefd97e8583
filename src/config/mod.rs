#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::ports::StoreLocation;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

/// Effective settings: config file values with command line flags layered on top.
#[derive(Debug, Clone)]
pub struct Settings {
    pub pretty: bool,
    pub store: StoreLocation,
    pub name: String,
    pub age: i64,
    pub log_level: Option<String>,
}

impl Settings {
    pub fn from_file(file: &TomlConfig) -> Self {
        Self {
            pretty: file.pretty_output(),
            store: file.store_location(),
            name: file.person_name().to_string(),
            age: file.person_age(),
            log_level: file.log_level().map(str::to_string),
        }
    }

    #[cfg(feature = "cli")]
    pub fn resolve(cli: &cli::CliConfig, file: Option<&TomlConfig>) -> Self {
        let mut settings = Self::from_file(file.unwrap_or(&TomlConfig::default()));

        if cli.compact {
            settings.pretty = false;
        }
        if let Some(store) = &cli.store {
            settings.store = StoreLocation::parse(store);
        }
        if let Some(name) = &cli.name {
            settings.name = name.clone();
        }
        if let Some(age) = cli.age {
            settings.age = age;
        }
        settings
    }
}

impl ConfigProvider for Settings {
    fn pretty_output(&self) -> bool {
        self.pretty
    }

    fn store_location(&self) -> StoreLocation {
        self.store.clone()
    }

    fn person_name(&self) -> &str {
        &self.name
    }

    fn person_age(&self) -> i64 {
        self.age
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if let StoreLocation::File(path) = &self.store {
            validation::validate_path("store", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_flags_override_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[output]
pretty = true

[person]
name = "Sam"
age = 41
"#,
        )
        .unwrap();
        let cli =
            cli::CliConfig::try_parse_from(["record-codec", "--age", "50", "--compact"]).unwrap();

        let settings = Settings::resolve(&cli, Some(&file));

        assert_eq!(settings.person_name(), "Sam");
        assert_eq!(settings.person_age(), 50);
        assert!(!settings.pretty_output());
        assert_eq!(settings.store_location(), StoreLocation::Memory);
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = cli::CliConfig::try_parse_from(["record-codec", "--store", "memory"]).unwrap();
        let settings = Settings::resolve(&cli, None);

        assert_eq!(settings.person_name(), "Robin");
        assert_eq!(settings.person_age(), 30);
        assert!(settings.validate().is_ok());
    }
}
