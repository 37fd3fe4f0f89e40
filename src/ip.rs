//! Public IP discovery through plain-text "what is my IP" services.

use std::net::IpAddr;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::http::{self, HttpRequest, HttpTransport};

/// Tried in order, first parsable answer wins
pub const DEFAULT_IP_RESOLVERS: &[&str] = &[
    "http://ipinfo.io/ip",
    "https://api.ipify.org?format=text",
    "https://checkip.amazonaws.com",
];

#[derive(Debug, Clone)]
pub struct PublicIpResolver {
    endpoints: Vec<String>,
}

impl Default for PublicIpResolver {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_IP_RESOLVERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PublicIpResolver {
    pub fn new<I, S>(endpoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints: Vec<String> = endpoints
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.trim().is_empty())
            .collect();
        if endpoints.is_empty() {
            return Err(Error::config("at least one IP resolver endpoint is required"));
        }
        Ok(Self { endpoints })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Ask each endpoint in turn; any failure just moves on to the next.
    pub async fn resolve(&self, transport: &dyn HttpTransport) -> Result<IpAddr> {
        for url in &self.endpoints {
            info!("Getting my public IP address from {} ...", url);
            match fetch_from(transport, url).await {
                Ok(ip) => {
                    info!("My public IP is: {}", ip);
                    return Ok(ip);
                }
                Err(e) => warn!("{} didn't give me an IP: {}", url, e),
            }
        }

        Err(Error::Resolution {
            tried: self.endpoints.clone(),
        })
    }
}

async fn fetch_from(transport: &dyn HttpTransport, url: &str) -> Result<IpAddr> {
    let body = http::send(transport, HttpRequest::get(url)).await?;
    let text = body.trim();
    text.parse::<IpAddr>().map_err(|_| {
        Error::InvalidResponse(format!("couldn't parse '{}' to an IP address", text))
    })
}
