use anyhow::Result;
use record_codec::core::ConfigProvider;
use record_codec::domain::entity::{ManagedObjectModel, PERSON_ENTITY};
use record_codec::domain::ports::StoreLocation;
use record_codec::utils::validation::Validate;
use record_codec::{decode_managed, open_store, PersistenceContext, RecordError, Settings, TomlConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_config_drives_the_store() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store_path = temp_dir.path().join("people.json");
    let config_path = temp_dir.path().join("record-codec.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[output]
pretty = false

[store]
kind = "file"
path = '{}'

[person]
name = "Sam"
age = 41

[logging]
level = "debug"
"#,
            store_path.display()
        ),
    )?;

    let file = TomlConfig::from_file(&config_path)?;
    file.validate()?;
    let settings = Settings::from_file(&file);
    settings.validate()?;

    assert!(!settings.pretty_output());
    assert_eq!(settings.person_name(), "Sam");
    assert_eq!(settings.person_age(), 41);
    assert_eq!(settings.log_level.as_deref(), Some("debug"));
    assert_eq!(settings.store_location(), StoreLocation::File(store_path.clone()));

    let mut ctx = PersistenceContext::new(
        ManagedObjectModel::person(),
        open_store(&settings.store_location()),
    );
    decode_managed(r#"{"name":"Sam","age":41}"#, &mut ctx)?;
    assert_eq!(ctx.save()?, 1);

    assert!(store_path.exists());
    assert_eq!(ctx.fetch(PERSON_ENTITY)?.len(), 1);
    Ok(())
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = TomlConfig::from_file(temp_dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, RecordError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_unknown_store_kind_fails_validation() -> Result<()> {
    let file = TomlConfig::from_toml_str("[store]\nkind = \"s3\"\n")?;

    let err = file.validate().unwrap_err();
    assert!(matches!(err, RecordError::InvalidConfigValueError { ref field, .. } if field == "store.kind"));
    Ok(())
}

#[cfg(feature = "cli")]
#[test]
fn test_command_line_overrides_config_file() -> Result<()> {
    use clap::Parser;
    use record_codec::CliConfig;

    let file = TomlConfig::from_toml_str("[person]\nname = \"Sam\"\nage = 41\n")?;
    let cli = CliConfig::try_parse_from(["record-codec", "--name", "Robin", "--store", "memory"])?;

    let settings = Settings::resolve(&cli, Some(&file));

    assert_eq!(settings.person_name(), "Robin");
    assert_eq!(settings.person_age(), 41);
    assert!(settings.pretty_output());
    assert_eq!(settings.store_location(), StoreLocation::Memory);
    Ok(())
}
