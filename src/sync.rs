//! The resolve / compare / update pipeline.

use std::net::IpAddr;

use log::{error, info};

use crate::error::Result;
use crate::http::HttpTransport;
use crate::ip::PublicIpResolver;
use crate::provider::DnsProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Record already pointed at this host
    Unchanged { ip: IpAddr },
    /// Record was rewritten (or would be, on a dry run)
    Updated {
        previous: IpAddr,
        current: IpAddr,
        dry_run: bool,
    },
}

pub struct SyncJob<'a> {
    pub domain: &'a str,
    pub resolver: &'a PublicIpResolver,
    pub provider: &'a dyn DnsProvider,
    pub dry_run: bool,
}

impl SyncJob<'_> {
    /// Run the three steps in order, stopping at the first failure.
    pub async fn run(&self, transport: &dyn HttpTransport) -> Result<SyncOutcome> {
        let current = self
            .resolver
            .resolve(transport)
            .await
            .inspect_err(|e| error!("Failed to get my public IP address: {}. Exiting..", e))?;
        let published = self
            .provider
            .get_a_record_ip(transport, self.domain)
            .await
            .inspect_err(|e| error!("Failed to get the GoDaddy A record: {}. Exiting..", e))?;

        if current == published {
            info!(
                "{} is already pointing to {}. Won't update..",
                self.domain, published
            );
            return Ok(SyncOutcome::Unchanged { ip: published });
        }

        if self.dry_run {
            info!(
                "{} is pointing to {}. Would update it to {} (dry run)",
                self.domain, published, current
            );
        } else {
            info!(
                "{} is pointing to {}. Will update it to point to {}",
                self.domain, published, current
            );
            self.provider
                .update_a_record(transport, self.domain, Some(current))
                .await
                .inspect_err(|e| error!("Failed to update the GoDaddy A record: {}", e))?;
        }

        Ok(SyncOutcome::Updated {
            previous: published,
            current,
            dry_run: self.dry_run,
        })
    }
}
