use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::http::Credentials;
use crate::ip::DEFAULT_IP_RESOLVERS;
use crate::provider::godaddy::{DEFAULT_TTL, GODADDY_API_BASE};

/// GoDaddy refuses A records with a shorter TTL
const MIN_TTL: u32 = 600;

#[derive(Parser, Debug, Default)]
#[command(name = "godaddy-ddns")]
#[command(
    about = "Checks the current public IP against a GoDaddy A record and, \
             if they don't match, updates the record"
)]
pub struct CliArgs {
    /// GoDaddy API key
    #[arg(long, env = "GODADDY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// GoDaddy secret key
    #[arg(long, env = "GODADDY_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Name to keep in sync, e.g. home.example.com or @.example.com
    #[arg(long, env = "GODADDY_DOMAIN")]
    pub domain: Option<String>,

    /// Same as --domain
    #[arg(long, env = "GODADDY_SUBDOMAIN")]
    pub subdomain: Option<String>,

    /// Optional TOML file with the same settings
    #[arg(short, long, env = "GODADDY_DDNS_CONFIG")]
    pub config: Option<PathBuf>,

    /// TTL in seconds written with the record
    #[arg(long, env = "GODADDY_TTL")]
    pub ttl: Option<u32>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Compare only, never write the record
    #[arg(long)]
    pub dry_run: bool,
}

/// Settings file layout; every key is optional and flags win over it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub domain: Option<String>,
    pub ttl: Option<u32>,
    pub log_level: Option<String>,
    pub api_base: Option<String>,
    pub ip_resolvers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub domain: String,
    pub ttl: u32,
    pub api_base: String,
    pub ip_resolvers: Vec<String>,
    pub timeout: Duration,
    pub log_level: String,
    pub dry_run: bool,
}

impl Settings {
    /// Read the optional config file named by `args` and merge it.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file)?)
    }

    /// Flags (and their env vars) override the file, which overrides defaults.
    pub fn merge(args: &CliArgs, file: FileConfig) -> crate::Result<Self> {
        let api_key = first_non_empty([args.api_key.clone(), file.api_key]).ok_or_else(|| {
            Error::config(
                "GoDaddy api key not provided. Please specify one using --api-key=<api key> \
                 or by setting the GODADDY_API_KEY env var",
            )
        })?;
        let secret_key =
            first_non_empty([args.secret_key.clone(), file.secret_key]).ok_or_else(|| {
                Error::config(
                    "GoDaddy secret key not provided. Please specify one using \
                     --secret-key=<secret key> or by setting the GODADDY_SECRET_KEY env var",
                )
            })?;
        let domain = first_non_empty([args.domain.clone(), args.subdomain.clone(), file.domain])
            .ok_or_else(|| {
                Error::config(
                    "GoDaddy domain not provided. Please specify one using --domain=<domain> \
                     or by setting the GODADDY_DOMAIN env var",
                )
            })?;

        let ttl = args.ttl.or(file.ttl).unwrap_or(DEFAULT_TTL);
        if ttl < MIN_TTL {
            return Err(Error::config(format!(
                "TTL must be at least {} seconds. Got: {}",
                MIN_TTL, ttl
            )));
        }

        let log_level = first_non_empty([args.log_level.clone(), file.log_level])
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase();
        match log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            _ => {
                return Err(Error::config(format!(
                    "Log level '{}' is not valid. \
                     Valid levels: trace, debug, info, warn, error, off",
                    log_level
                )))
            }
        }

        let timeout_secs = file.timeout_secs.unwrap_or(30);
        if timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be > 0"));
        }

        let ip_resolvers = match file.ip_resolvers {
            Some(list) if list.iter().all(|s| s.trim().is_empty()) => {
                return Err(Error::config("ip_resolvers cannot be empty"));
            }
            Some(list) => list,
            None => DEFAULT_IP_RESOLVERS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            credentials: Credentials::new(api_key, secret_key),
            domain,
            ttl,
            api_base: file.api_base.unwrap_or_else(|| GODADDY_API_BASE.to_string()),
            ip_resolvers,
            timeout: Duration::from_secs(timeout_secs),
            log_level,
            dry_run: args.dry_run,
        })
    }
}

fn first_non_empty<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
