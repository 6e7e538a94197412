use anyhow::{Context, Result};
use asset_inventory::{PublishTarget, SnapshotTarget, TransformSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub transform: TransformSettings,
    pub publish: Option<PublishConfig>,
    pub snapshot: Option<SnapshotConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_workbook")]
    pub workbook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: String,
    #[serde(default = "default_customer_param")]
    pub customer_param: String,
    /// Tenant sent to the API; falls back to `[transform].customer_id`.
    pub customer_id: Option<i64>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_repo_dir")]
    pub repo_dir: String,
    #[serde(default = "default_true")]
    pub push: bool,
    pub remote: Option<String>,
    pub branch: Option<String>,
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: default_repo_dir(),
            push: true,
            remote: None,
            branch: None,
            message_prefix: default_message_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the specified path, or search default locations if None
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!(path = %path, "Loading config from specified path");
            return Self::from_file(path);
        }

        Self::load_from_defaults()
    }

    /// Load configuration from the default locations
    /// Tries: ./inventory-export.toml, /etc/serviceradar/inventory-export.toml,
    /// ~/.config/serviceradar/inventory-export.toml
    pub fn load_from_defaults() -> Result<Self> {
        let mut all_paths = vec![
            "./inventory-export.toml".to_string(),
            "/etc/serviceradar/inventory-export.toml".to_string(),
        ];

        if let Ok(home) = std::env::var("HOME") {
            all_paths.push(format!("{}/.config/serviceradar/inventory-export.toml", home));
        }

        for path in &all_paths {
            if Path::new(path).exists() {
                tracing::info!(path = %path, "Loading config");
                return Self::from_file(path);
            }
        }

        tracing::info!(searched = ?all_paths, "No config file found, using defaults");
        Ok(Self::default())
    }

    /// Publishing target, if publishing is configured and enabled
    pub fn publish_target(&self) -> Option<PublishTarget> {
        self.publish
            .as_ref()
            .filter(|publish| publish.enabled)
            .map(|publish| PublishTarget {
                url: publish.url.clone(),
                customer_param: publish.customer_param.clone(),
                customer_id: publish.customer_id.unwrap_or(self.transform.customer_id),
                timeout: Duration::from_secs(publish.timeout_secs),
            })
    }

    /// Snapshot target for `document`, if snapshots are configured and enabled
    pub fn snapshot_target(
        &self,
        document: &Path,
        run_instant: DateTime<Utc>,
    ) -> Option<SnapshotTarget> {
        self.snapshot
            .as_ref()
            .filter(|snapshot| snapshot.enabled)
            .map(|snapshot| SnapshotTarget {
                repo_dir: PathBuf::from(&snapshot.repo_dir),
                file: fs::canonicalize(document).unwrap_or_else(|_| document.to_path_buf()),
                message: format!(
                    "{} {}",
                    snapshot.message_prefix,
                    run_instant.format("%Y-%m-%d %H:%M:%S")
                ),
                push: snapshot.push,
                remote: snapshot.remote.clone(),
                branch: snapshot.branch.clone(),
            })
    }

    /// Generate an example configuration file content
    pub fn example_toml() -> String {
        let example = Config {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            transform: TransformSettings::default(),
            publish: Some(PublishConfig {
                enabled: true,
                url: "http://localhost:8090/api/assets/import".to_string(),
                customer_param: default_customer_param(),
                customer_id: None,
                timeout_secs: default_timeout_secs(),
            }),
            snapshot: Some(SnapshotConfig {
                remote: Some("origin".to_string()),
                branch: Some("main".to_string()),
                ..SnapshotConfig::default()
            }),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Failed to generate example".to_string())
    }
}

// Default value functions
fn default_workbook() -> String {
    "assets_limpio.xlsx".to_string()
}

fn default_output_path() -> String {
    "resultado.json".to_string()
}

fn default_customer_param() -> String {
    "customer_id".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_repo_dir() -> String {
    ".".to_string()
}

fn default_message_prefix() -> String {
    "Auto-update: inventory JSON generated at".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.workbook, "assets_limpio.xlsx");
        assert_eq!(config.output.path, "resultado.json");
        assert_eq!(config.transform.customer_id, 101);
        assert!(config.publish.is_none());
        assert!(config.snapshot.is_none());
        assert!(config.publish_target().is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
[input]
workbook = "/data/inventario.xlsx"

[output]
path = "/data/resultado.json"

[transform]
customer_id = 202
day_first = false

[transform.seeds]
assets = 50001

[transform.defaults]
socia_risk = "ALTO"

[publish]
url = "https://core:8090/api/assets/import"
customer_param = "tenant"
timeout_secs = 5

[snapshot]
repo_dir = "/data"
push = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.workbook, "/data/inventario.xlsx");
        assert_eq!(config.output.path, "/data/resultado.json");
        assert_eq!(config.transform.customer_id, 202);
        assert!(!config.transform.day_first);
        assert_eq!(config.transform.seeds.assets, 50001);
        assert_eq!(config.transform.seeds.users, 1); // default
        assert_eq!(config.transform.defaults.socia_risk, "ALTO");
        assert_eq!(config.transform.defaults.risk_score_sum, 65); // default

        let target = config.publish_target().unwrap();
        assert_eq!(target.url, "https://core:8090/api/assets/import");
        assert_eq!(target.customer_param, "tenant");
        assert_eq!(target.customer_id, 202); // inherited from [transform]
        assert_eq!(target.timeout, Duration::from_secs(5));

        let snapshot = config.snapshot.unwrap();
        assert!(snapshot.enabled);
        assert!(!snapshot.push);
        assert_eq!(snapshot.repo_dir, "/data");
        assert_eq!(
            snapshot.message_prefix,
            "Auto-update: inventory JSON generated at"
        );
    }

    #[test]
    fn test_config_from_file() {
        let toml_content = r#"
[publish]
url = "localhost:8090/api/assets/import"
customer_id = 7
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input.workbook, "assets_limpio.xlsx"); // default

        let target = config.publish_target().unwrap();
        assert_eq!(target.customer_id, 7);
        assert_eq!(target.customer_param, "customer_id"); // default
        assert_eq!(target.timeout, Duration::from_secs(30)); // default
    }

    #[test]
    fn test_config_load_with_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"out/inventory.json\"\n")
            .unwrap();

        let config = Config::load(Some(temp_file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.output.path, "out/inventory.json");
    }

    #[test]
    fn test_config_from_file_reports_parse_errors() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[input\nworkbook = 3").unwrap();

        let err = Config::from_file(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_disabled_publish_has_no_target() {
        let config: Config = toml::from_str(
            r#"
[publish]
enabled = false
url = "http://core/api"
"#,
        )
        .unwrap();
        assert!(config.publish_target().is_none());
    }

    #[test]
    fn test_snapshot_target_message() {
        let config = Config {
            snapshot: Some(SnapshotConfig {
                repo_dir: "/srv/inventory".to_string(),
                remote: Some("origin".to_string()),
                branch: Some("main".to_string()),
                ..SnapshotConfig::default()
            }),
            ..Config::default()
        };
        let instant = Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap();

        let target = config
            .snapshot_target(Path::new("/nonexistent/resultado.json"), instant)
            .unwrap();
        assert_eq!(target.repo_dir, PathBuf::from("/srv/inventory"));
        assert_eq!(target.file, PathBuf::from("/nonexistent/resultado.json"));
        assert_eq!(
            target.message,
            "Auto-update: inventory JSON generated at 2025-01-15 08:30:00"
        );
        assert!(target.push);
        assert_eq!(target.remote.as_deref(), Some("origin"));
    }

    #[test]
    fn test_example_toml_parses() {
        let example = Config::example_toml();
        assert!(example.contains("[publish]"));

        let config: Config = toml::from_str(&example).unwrap();
        assert_eq!(config.transform.customer_id, 101);
        assert!(config.publish_target().is_some());
        assert!(config.snapshot.is_some());
    }
}
