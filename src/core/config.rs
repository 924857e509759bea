//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cloudnav/config.toml` and is only ever read. A missing
//! file means defaults; a malformed one is reported as a startup warning and
//! the defaults are used instead.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapter::PageLimits;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CloudnavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub fanout: FanoutConfig,
    /// service → resource type opened when only the service is named
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// profile → account id
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,
    #[serde(default)]
    pub context: ContextConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub max_back_stack: Option<usize>,
    pub status_ttl_secs: Option<u64>,
    pub refresh_timeout_secs: Option<u64>,
    pub adapter_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SelectionConfig {
    pub profiles: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub page_size: Option<usize>,
    pub max_pages: Option<usize>,
    pub max_items: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FanoutConfig {
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ContextConfig {
    /// Regions the context resolver reports as available.
    pub regions: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MAX_BACK_STACK: usize = 50;
pub const DEFAULT_STATUS_TTL_SECS: u64 = 4;
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ADAPTER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub max_back_stack: usize,
    pub status_ttl: Duration,
    pub refresh_timeout: Duration,
    pub adapter_timeout: Duration,
    pub profiles: Vec<String>,
    pub regions: Vec<String>,
    pub page_limits: PageLimits,
    pub max_concurrency: usize,
    pub default_resources: BTreeMap<String, String>,
    pub accounts: BTreeMap<String, String>,
    pub context_regions: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&CloudnavConfig::default(), &CliOverrides::default())
    }
}

/// Selection flags from the command line (empty = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub profiles: Vec<String>,
    pub regions: Vec<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.cloudnav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cloudnav").join("config.toml"))
}

/// Load config from `~/.cloudnav/config.toml`, or defaults if there is none.
pub fn load_config() -> Result<CloudnavConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(CloudnavConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<CloudnavConfig, ConfigError> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(CloudnavConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: CloudnavConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

// ============================================================================
// Resolution
// ============================================================================

/// Split comma-separated values and drop blanks: `"a, b,,c"` → `[a, b, c]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_list(name: &str) -> Option<Vec<String>> {
    std::env::var(name)
        .ok()
        .map(|v| split_list(&v))
        .filter(|v| !v.is_empty())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CloudnavConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Profiles: CLI → env → config → default
    let profiles = Some(cli.profiles.clone())
        .filter(|p| !p.is_empty())
        .or_else(|| env_list("CLOUDNAV_PROFILE"))
        .or_else(|| config.selection.profiles.clone().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| vec![DEFAULT_PROFILE.to_string()]);

    // Regions: CLI → env → config → default
    let regions = Some(cli.regions.clone())
        .filter(|r| !r.is_empty())
        .or_else(|| env_list("CLOUDNAV_REGION"))
        .or_else(|| config.selection.regions.clone().filter(|r| !r.is_empty()))
        .unwrap_or_else(|| vec![DEFAULT_REGION.to_string()]);

    let defaults = PageLimits::default();
    let page_limits = PageLimits {
        page_size: config
            .pagination
            .page_size
            .unwrap_or(defaults.page_size)
            .max(1),
        max_pages: config
            .pagination
            .max_pages
            .unwrap_or(defaults.max_pages)
            .max(1),
        max_items: config
            .pagination
            .max_items
            .unwrap_or(defaults.max_items)
            .max(1),
    };

    ResolvedConfig {
        max_back_stack: config
            .general
            .max_back_stack
            .unwrap_or(DEFAULT_MAX_BACK_STACK)
            .max(1),
        status_ttl: Duration::from_secs(
            config
                .general
                .status_ttl_secs
                .unwrap_or(DEFAULT_STATUS_TTL_SECS),
        ),
        refresh_timeout: Duration::from_secs(
            config
                .general
                .refresh_timeout_secs
                .unwrap_or(DEFAULT_REFRESH_TIMEOUT_SECS),
        ),
        adapter_timeout: Duration::from_secs(
            config
                .general
                .adapter_timeout_secs
                .unwrap_or(DEFAULT_ADAPTER_TIMEOUT_SECS),
        ),
        profiles,
        regions,
        page_limits,
        max_concurrency: config
            .fanout
            .max_concurrency
            .unwrap_or(DEFAULT_MAX_CONCURRENCY)
            .max(1),
        default_resources: config.defaults.clone(),
        accounts: config.accounts.clone(),
        context_regions: config.context.regions.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&CloudnavConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.max_back_stack, DEFAULT_MAX_BACK_STACK);
        assert_eq!(resolved.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(resolved.page_limits, PageLimits::default());
        assert!(resolved.default_resources.is_empty());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = CloudnavConfig {
            general: GeneralConfig {
                max_back_stack: Some(5),
                status_ttl_secs: Some(9),
                refresh_timeout_secs: Some(2),
                adapter_timeout_secs: Some(7),
            },
            selection: SelectionConfig {
                profiles: Some(vec!["prod".into(), "dev".into()]),
                regions: Some(vec!["eu-west-1".into()]),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.max_back_stack, 5);
        assert_eq!(resolved.status_ttl, Duration::from_secs(9));
        assert_eq!(resolved.refresh_timeout, Duration::from_secs(2));
        assert_eq!(resolved.adapter_timeout, Duration::from_secs(7));
        assert_eq!(resolved.regions, vec!["eu-west-1"]);
    }

    #[test]
    fn test_resolve_cli_selection_wins() {
        let config = CloudnavConfig {
            selection: SelectionConfig {
                profiles: Some(vec!["prod".into()]),
                regions: Some(vec!["eu-west-1".into()]),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            profiles: vec!["ops".into()],
            regions: vec!["ap-south-1".into(), "us-west-2".into()],
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.profiles, vec!["ops"]);
        assert_eq!(resolved.regions, vec!["ap-south-1", "us-west-2"]);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = CloudnavConfig {
            general: GeneralConfig {
                max_back_stack: Some(0),
                ..Default::default()
            },
            pagination: PaginationConfig {
                page_size: Some(0),
                max_pages: Some(0),
                max_items: Some(0),
            },
            fanout: FanoutConfig {
                max_concurrency: Some(0),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.max_back_stack, 1);
        assert_eq!(resolved.page_limits.page_size, 1);
        assert_eq!(resolved.max_concurrency, 1);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
max_back_stack = 20
status_ttl_secs = 3

[selection]
profiles = ["prod"]
regions = ["us-east-1", "eu-west-1"]

[pagination]
page_size = 50
max_pages = 10

[fanout]
max_concurrency = 4

[defaults]
ec2 = "volumes"

[accounts]
prod = "111111111111"

[context]
regions = ["us-east-1", "eu-west-1", "ap-south-1"]
"#;
        let config: CloudnavConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.max_back_stack, Some(20));
        assert_eq!(config.selection.regions.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.pagination.max_items, None);
        assert_eq!(config.defaults.get("ec2").map(String::as_str), Some("volumes"));
        assert_eq!(config.accounts.get("prod").map(String::as_str), Some("111111111111"));
        assert_eq!(config.context.regions.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("cloudnav-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\nmax_back_stack = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("cloudnav-definitely-missing.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }
}
