pub mod godaddy;

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::HttpTransport;

pub use godaddy::GoDaddyClient;

/// Read and replace the A record of a single name.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Address currently published for `domain_name`
    async fn get_a_record_ip(
        &self,
        transport: &dyn HttpTransport,
        domain_name: &str,
    ) -> Result<IpAddr>;

    /// Replace the A record of `domain_name` with `ip`.
    ///
    /// `None` is rejected before anything is sent.
    async fn update_a_record(
        &self,
        transport: &dyn HttpTransport,
        domain_name: &str,
        ip: Option<IpAddr>,
    ) -> Result<()>;

    fn provider_name(&self) -> &'static str;
}
