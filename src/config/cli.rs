use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "record-codec")]
#[command(about = "Encode and decode Person records as JSON")]
pub struct CliConfig {
    /// Name of the sample record
    #[arg(long)]
    pub name: Option<String>,

    /// Age of the sample record
    #[arg(long, allow_negative_numbers = true)]
    pub age: Option<i64>,

    /// Decode this JSON text instead of running the showcase
    #[arg(long)]
    pub decode: Option<String>,

    /// With --decode, construct a managed record and save it
    #[arg(long, requires = "decode")]
    pub managed: bool,

    /// Backing store: "memory" or a JSON file path
    #[arg(long)]
    pub store: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Print single-line JSON")]
    pub compact: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decode_flags() {
        let config = CliConfig::try_parse_from([
            "record-codec",
            "--decode",
            r#"{"name":"Robin","age":30}"#,
            "--managed",
            "--store",
            "./people.json",
        ])
        .unwrap();

        assert!(config.managed);
        assert_eq!(config.store.as_deref(), Some("./people.json"));
        assert!(config.name.is_none());
    }

    #[test]
    fn test_managed_requires_decode() {
        assert!(CliConfig::try_parse_from(["record-codec", "--managed"]).is_err());
    }
}
