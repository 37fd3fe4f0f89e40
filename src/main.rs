use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use godaddy_ddns::{
    CliArgs, DnsProvider, GoDaddyClient, PublicIpResolver, ReqwestTransport, Settings, SyncJob,
    SyncOutcome,
};

/// Exit codes for the different ways a run can end
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Record in sync (or updated)
    Success = 0,
    /// Bad flags, env vars or config file
    ConfigError = 1,
    /// Resolution, read or write failed
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration first (before logger init)
    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", config_failure(&e));
            eprintln!("Run 'godaddy-ddns --help' for usage.");
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Initialize logger with config log level (env var takes precedence)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    if let Some(path) = &args.config {
        info!("Loaded configuration from: {}", path.display());
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    match runtime.block_on(run(&settings)) {
        Ok(_) => DdnsExitCode::Success.into(),
        // Workflow failures were already logged by the step that hit them
        Err(e) => match e.downcast_ref::<godaddy_ddns::Error>() {
            Some(err) => ExitCode::from(err.exit_code()),
            None => {
                error!("{:#}. Exiting..", e);
                DdnsExitCode::RuntimeError.into()
            }
        },
    }
}

/// Validation errors carry their own prefix; file errors come from anyhow context.
fn config_failure(e: &anyhow::Error) -> String {
    match e.downcast_ref::<godaddy_ddns::Error>() {
        Some(err) => err.to_string(),
        None => format!("Configuration error: {:#}", e),
    }
}

async fn run(settings: &Settings) -> Result<SyncOutcome> {
    let transport = ReqwestTransport::new(settings.timeout)
        .inspect_err(|e| error!("{}. Exiting..", e))?;
    let resolver = PublicIpResolver::new(settings.ip_resolvers.iter().cloned())
        .inspect_err(|e| error!("{}. Exiting..", e))?;
    let provider = GoDaddyClient::new(settings.credentials.clone())
        .with_api_base(&settings.api_base)
        .with_ttl(settings.ttl);

    info!(
        "Syncing {} via {} (dry run: {})",
        settings.domain,
        provider.provider_name(),
        settings.dry_run
    );

    let job = SyncJob {
        domain: &settings.domain,
        resolver: &resolver,
        provider: &provider,
        dry_run: settings.dry_run,
    };

    let outcome = job.run(&transport).await?;
    match &outcome {
        SyncOutcome::Unchanged { ip } => info!("{} already up to date ({})", settings.domain, ip),
        SyncOutcome::Updated {
            previous,
            current,
            dry_run: false,
        } => info!("{}: {} -> {}", settings.domain, previous, current),
        SyncOutcome::Updated { dry_run: true, .. } => {
            info!("Dry run finished, record left untouched")
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_failure_is_prefixed_once() {
        let missing_key = Settings::load(&CliArgs::default()).unwrap_err();
        let msg = config_failure(&missing_key);
        assert!(msg.starts_with("Configuration error: GoDaddy api key not provided"), "{}", msg);
        assert_eq!(msg.matches("Configuration error").count(), 1, "{}", msg);

        let unreadable = CliArgs {
            config: Some("/nonexistent/godaddy-ddns.toml".into()),
            ..CliArgs::default()
        };
        let msg = config_failure(&Settings::load(&unreadable).unwrap_err());
        assert!(msg.starts_with("Configuration error: Failed to read config file"), "{}", msg);
        assert_eq!(msg.matches("Configuration error").count(), 1, "{}", msg);
    }
}
