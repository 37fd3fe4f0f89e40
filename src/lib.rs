//! Poor man's dynamic DNS for GoDaddy.
//!
//! Finds this host's public IP, compares it with the A record GoDaddy
//! publishes for a name, and rewrites the record when they differ.

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod ip;
pub mod provider;
pub mod sync;

pub use config::{CliArgs, Settings};
pub use domain::ParsedDomain;
pub use error::{Error, Result};
pub use http::{Credentials, HttpTransport, ReqwestTransport};
pub use ip::PublicIpResolver;
pub use provider::{DnsProvider, GoDaddyClient};
pub use sync::{SyncJob, SyncOutcome};
