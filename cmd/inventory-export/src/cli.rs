use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "inventory-export")]
#[command(about = "Export an asset inventory workbook as a ServiceRadar ingestion document")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Inventory workbook to read (overrides [input].workbook)
    #[arg(short = 'i', long = "input", value_name = "WORKBOOK")]
    pub input: Option<String>,

    /// Where to write the JSON document (overrides [output].path)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Tenant id stamped on the document (overrides [transform].customer_id)
    #[arg(long = "customer-id", value_name = "ID")]
    pub customer_id: Option<i64>,

    /// Do not POST the document even if [publish] is configured
    #[arg(long = "no-publish")]
    pub no_publish: bool,

    /// Do not commit the document even if [snapshot] is configured
    #[arg(long = "no-snapshot")]
    pub no_snapshot: bool,

    /// Generate example configuration file
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable verbose logging (same as debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns true if debug logging should be enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.debug || self.verbose
    }

    /// Overlay command-line flags on a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref input) = self.input {
            config.input.workbook = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output.path = output.clone();
        }
        if let Some(customer_id) = self.customer_id {
            config.transform.customer_id = customer_id;
        }
        if self.no_publish {
            if let Some(ref mut publish) = config.publish {
                publish.enabled = false;
            }
        }
        if self.no_snapshot {
            if let Some(ref mut snapshot) = config.snapshot {
                snapshot.enabled = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PublishConfig, SnapshotConfig};

    #[test]
    fn test_debug_flags() {
        let cli = Cli::try_parse_from(["inventory-export", "-v"]).unwrap();
        assert!(cli.is_debug_enabled());

        let cli = Cli::try_parse_from(["inventory-export"]).unwrap();
        assert!(!cli.is_debug_enabled());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "inventory-export",
            "--input",
            "/data/assets.xlsx",
            "-o",
            "/data/out.json",
            "--customer-id",
            "202",
            "--no-publish",
            "--no-snapshot",
        ])
        .unwrap();

        let mut config = Config {
            publish: Some(PublishConfig {
                enabled: true,
                url: "http://core:8090/api/assets/import".to_string(),
                customer_param: "customer_id".to_string(),
                customer_id: None,
                timeout_secs: 30,
            }),
            snapshot: Some(SnapshotConfig::default()),
            ..Config::default()
        };
        cli.apply_to(&mut config);

        assert_eq!(config.input.workbook, "/data/assets.xlsx");
        assert_eq!(config.output.path, "/data/out.json");
        assert_eq!(config.transform.customer_id, 202);
        assert!(!config.publish.unwrap().enabled);
        assert!(!config.snapshot.unwrap().enabled);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["inventory-export", "-c", "inventory.toml"]).unwrap();
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(cli.config.as_deref(), Some("inventory.toml"));
        assert_eq!(config.input.workbook, "assets_limpio.xlsx");
        assert_eq!(config.output.path, "resultado.json");
    }
}
