use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::sync::Arc;

use cloudnav::core::config::{self, CliOverrides, ResolvedConfig, split_list};
use cloudnav::core::refresh::ConfiguredContext;
use cloudnav::core::state::{App, StartupPath};
use cloudnav::registry::Registry;
use cloudnav::registry::builtin::builtin_registry;
use cloudnav::tui;

#[derive(Parser)]
#[command(name = "cloudnav", about = "Terminal navigator for cloud resources")]
struct Args {
    /// Where to start: `service` or `service/resource-type`
    target: Option<String>,

    /// Open this resource's detail view directly (needs `target`)
    id: Option<String>,

    /// Profiles to use, comma-separated (overrides CLOUDNAV_PROFILE and config)
    #[arg(short, long, value_delimiter = ',')]
    profile: Vec<String>,

    /// Regions to use, comma-separated (overrides CLOUDNAV_REGION and config)
    #[arg(short, long, value_delimiter = ',')]
    region: Vec<String>,
}

/// Built-in catalog plus the user's `[defaults]`. Unknown defaults become
/// startup warnings.
fn build_registry(config: &ResolvedConfig) -> (Registry, Vec<String>) {
    let mut registry = builtin_registry();
    let mut warnings = Vec::new();
    for (service, resource_type) in &config.default_resources {
        if !registry.set_user_default(service, resource_type) {
            log::warn!("Ignoring default {service}/{resource_type}: not registered");
            warnings.push(format!(
                "Default resource {service}/{resource_type} is not registered; using the built-in default"
            ));
        }
    }
    (registry, warnings)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to cloudnav.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("cloudnav.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let mut warnings = Vec::new();
    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{e}");
        warnings.push(format!("{e}; using defaults"));
        config::CloudnavConfig::default()
    });
    let cli = CliOverrides {
        profiles: args.profile.iter().flat_map(|p| split_list(p)).collect(),
        regions: args.region.iter().flat_map(|r| split_list(r)).collect(),
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!(
        "cloudnav starting: profiles {:?}, regions {:?}",
        resolved.profiles,
        resolved.regions
    );

    let (registry, registry_warnings) = build_registry(&resolved);
    warnings.extend(registry_warnings);

    let resolver = ConfiguredContext {
        accounts: resolved.accounts.clone(),
        regions: resolved.context_regions.clone(),
    };
    let startup = args
        .target
        .as_deref()
        .map(|target| StartupPath::parse(target, args.id.clone()));
    if startup.is_none() && args.id.is_some() {
        warnings.push("A resource id needs a service/resource-type before it".to_string());
    }

    let app = App::new(Arc::new(registry), Arc::new(resolver), resolved)
        .with_warnings(warnings)
        .with_startup_path(startup);

    tui::run(app)
}
