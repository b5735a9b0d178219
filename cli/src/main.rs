//! linkwise CLI, the driving adapter for the resolution engine.
//!
//! Subcommands:
//! - `resolve <url>...`: unwind URLs and print the matched merchant
//! - `links --publisher <id> <url>`: build the attributed link set
//! - `module-config --publisher <id>`: print the publisher-scoped module projection
//! - `sdk-config --publisher <id>`: print the SDK projection
//! - `check`: validate the config loads without errors
//!
//! The config (a `ModuleConfig` in JSON or YAML) comes from `--config` or
//! `LINKWISE_CONFIG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkwise::{Config, ConfigBuilder, ModuleConfig, Platform};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Engine config file (.json, .yaml or .yml)
    #[arg(long, short, env = "LINKWISE_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unwind each URL and report its destination, merchant and redirect signal
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Build the attributed links a publisher gets for a URL
    Links {
        #[arg(long, env = "LINKWISE_PUBLISHER")]
        publisher: String,

        /// ios, android, web or browser
        #[arg(long, default_value = "browser")]
        platform: Platform,

        /// Attribution token; defaults to the publisher id
        #[arg(long)]
        token: Option<String>,

        url: String,
    },

    /// Print the subset of the config a publisher may see
    ModuleConfig {
        #[arg(long, env = "LINKWISE_PUBLISHER")]
        publisher: String,
    },

    /// Print the reduced SDK config for a publisher
    SdkConfig {
        #[arg(long, env = "LINKWISE_PUBLISHER")]
        publisher: String,
    },

    /// Validate that the config loads
    Check,
}

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: tracing subscriber not installed: {e}");
    }

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Resolve { urls } => {
            for url in &urls {
                print_json(&resolve(&config, url))?;
            }
        }
        Commands::Links {
            publisher,
            platform,
            token,
            url,
        } => {
            let links = config
                .links_for_url(&publisher, &url, platform, token.as_deref())
                .with_context(|| format!("building links for \"{url}\""))?;
            match links {
                Some(links) => print_json(&links)?,
                None => anyhow::bail!("\"{url}\" does not belong to a supported merchant"),
            }
        }
        Commands::ModuleConfig { publisher } => print_json(&config.to_module_config(&publisher))?,
        Commands::SdkConfig { publisher } => print_json(&config.to_sdk_config(&publisher))?,
        Commands::Check => {
            tracing::info!(
                merchants = config.supported_merchants().len(),
                affiliates = config.supported_affiliates().len(),
                approvals = config.approval_records().len(),
                registered = config.registry().len(),
                "config valid"
            );
            println!("Config valid");
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Resolution {
    url: String,
    destination_url: Option<String>,
    merchant_id: Option<String>,
    should_redirect: bool,
    cache_key: Option<String>,
}

fn resolve(config: &Config, url: &str) -> Resolution {
    let should_redirect = config.should_redirect_by_url(url);
    Resolution {
        url: url.to_owned(),
        destination_url: config.destination_url(url),
        merchant_id: config
            .supported_merchant_by_url(url)
            .map(|m| m.organization_id.clone()),
        should_redirect,
        cache_key: should_redirect.then(|| config.redirect_cache_key(url)),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;
    let data = parse_module_config(path, &content)?;
    ConfigBuilder::from_module_config(data)
        .warn_via_tracing()
        .build()
        .with_context(|| format!("config \"{}\" is invalid", path.display()))
}

fn parse_module_config(path: &Path, content: &str) -> Result<ModuleConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content).context("JSON parse error")
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).context("YAML parse error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "
supported_merchants:
  - hostname: shop.example
    organization_id: org-shop
web_to_app_mappings:
  - organization: org-shop
    subdomain_name: shop
    external_host: http://shop.example
approvals:
  - status: approved
    audience: org-pub
    organization: org-shop
";

    fn config() -> Config {
        let data = parse_module_config(Path::new("config.yaml"), YAML).unwrap();
        Config::from_module_config(data).unwrap()
    }

    #[test]
    fn format_follows_extension() {
        let json = r#"{"supported_merchants":[{"hostname":"shop.example","organization_id":"org-shop"}]}"#;
        let data = parse_module_config(Path::new("config.JSON"), json).unwrap();
        assert_eq!(data.supported_merchants.len(), 1);
        assert!(parse_module_config(Path::new("config.yml"), json).is_ok());
        assert!(parse_module_config(Path::new("config.json"), YAML).is_err());
    }

    #[test]
    fn resolve_reports_destination_and_merchant() {
        let resolution = resolve(&config(), "https://shop.bttn.io/p/1");
        assert_eq!(
            resolution,
            Resolution {
                url: "https://shop.bttn.io/p/1".into(),
                destination_url: Some("http://shop.example/p/1".into()),
                merchant_id: Some("org-shop".into()),
                should_redirect: false,
                cache_key: None,
            }
        );
    }

    #[test]
    fn cli_parses_links_command() {
        let cli = Cli::try_parse_from([
            "linkwise",
            "--config",
            "config.yaml",
            "links",
            "--publisher",
            "org-pub",
            "--platform",
            "iOS",
            "https://shop.example/p",
        ])
        .unwrap();
        match cli.command {
            Commands::Links {
                platform, token, ..
            } => {
                assert_eq!(platform, Platform::Ios);
                assert_eq!(token, None);
            }
            _ => panic!("expected links"),
        }
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let err = load_config(Path::new("/nonexistent/linkwise.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/linkwise.yaml"));
    }
}
