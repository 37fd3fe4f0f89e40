use std::net::IpAddr;

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::DnsProvider;
use crate::domain::{self, ParsedDomain};
use crate::error::{Error, Result};
use crate::http::{self, Credentials, HttpRequest, HttpTransport};

pub const GODADDY_API_BASE: &str = "https://api.godaddy.com/v1/domains";
pub const DEFAULT_TTL: u32 = 600;

pub struct GoDaddyClient {
    credentials: Credentials,
    api_base: String,
    ttl: u32,
}

impl GoDaddyClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: GODADDY_API_BASE.to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    fn records_url(&self, domain_name: &str) -> Result<(ParsedDomain, String)> {
        let parsed = domain::parse(domain_name).inspect_err(|e| {
            error!("Couldn't extract the domain from {}: {}", domain_name, e);
        })?;
        let url = parsed.records_path(&self.api_base);
        Ok((parsed, url))
    }
}

#[async_trait]
impl DnsProvider for GoDaddyClient {
    async fn get_a_record_ip(
        &self,
        transport: &dyn HttpTransport,
        domain_name: &str,
    ) -> Result<IpAddr> {
        let (parsed, url) = self.records_url(domain_name)?;

        let request = self.credentials.apply(HttpRequest::get(url))?;
        let body = http::send(transport, request).await?;

        let records: Vec<ARecord> = serde_json::from_str(&body)?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(parsed.to_string()))?;

        record.data.trim().parse::<IpAddr>().map_err(|_| {
            Error::InvalidResponse(format!(
                "couldn't parse '{}' to an IP address",
                record.data
            ))
        })
    }

    async fn update_a_record(
        &self,
        transport: &dyn HttpTransport,
        domain_name: &str,
        ip: Option<IpAddr>,
    ) -> Result<()> {
        let ip = ip.ok_or(Error::NilInput)?;
        let (parsed, url) = self.records_url(domain_name)?;

        let body = serde_json::to_string(&[RecordUpdate {
            data: ip.to_string(),
            ttl: self.ttl,
        }])?;

        let request = self.credentials.apply(HttpRequest::put(url, body))?;
        http::send(transport, request).await?;

        info!("Updated A record of {} to {}", parsed, ip);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}

// GoDaddy API types

#[derive(Debug, Deserialize)]
struct ARecord {
    data: String,
    #[allow(dead_code)]
    #[serde(default)]
    name: String,
    #[allow(dead_code)]
    #[serde(default)]
    ttl: u32,
    #[allow(dead_code)]
    #[serde(rename = "type", default)]
    record_type: String,
}

#[derive(Debug, Serialize)]
struct RecordUpdate {
    data: String,
    ttl: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use std::sync::Mutex;

    /// Answers every request with the same response and records it
    struct Fixed {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    fn fixed(status: u16, body: &str) -> Fixed {
        Fixed {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[async_trait]
    impl HttpTransport for Fixed {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                status_text: format!("{} status", self.status),
                body: self.body.clone(),
            })
        }
    }

    fn client() -> GoDaddyClient {
        GoDaddyClient::new(Credentials::new("apiKey", "secretKey"))
    }

    #[tokio::test]
    async fn reads_first_record() {
        let transport = fixed(
            200,
            r#"[{"data":"5.5.5.5","name":"some","ttl":600,"type":"A"},{"data":"6.6.6.6"}]"#,
        );
        let ip = client()
            .get_a_record_ip(&transport, "some.domain.com")
            .await
            .unwrap();
        assert_eq!(ip, IpAddr::from([5, 5, 5, 5]));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, reqwest::Method::GET);
        assert_eq!(
            seen[0].url,
            "https://api.godaddy.com/v1/domains/domain.com/records/A/some"
        );
        assert_eq!(
            seen[0].header_value("Authorization"),
            Some("sso-key apiKey:secretKey")
        );
    }

    #[tokio::test]
    async fn read_failures() {
        let empty = fixed(200, "[]");
        assert!(matches!(
            client().get_a_record_ip(&empty, "some.domain.com").await,
            Err(Error::NotFound(_))
        ));

        let not_json = fixed(200, "[foo]");
        assert!(matches!(
            client().get_a_record_ip(&not_json, "some.domain.com").await,
            Err(Error::Decode(_))
        ));

        let bad_ip = fixed(200, r#"[{"data":"invalid","name":"some","ttl":600,"type":"A"}]"#);
        assert!(matches!(
            client().get_a_record_ip(&bad_ip, "some.domain.com").await,
            Err(Error::InvalidResponse(_))
        ));

        let unauthorized = fixed(401, "");
        assert!(matches!(
            client().get_a_record_ip(&unauthorized, "some.domain.com").await,
            Err(Error::RemoteApi { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_domain_never_hits_the_network() {
        let transport = fixed(200, r#"[{"data":"1.1.1.1"}]"#);
        assert!(matches!(
            client().get_a_record_ip(&transport, "invalid").await,
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            client()
                .update_a_record(&transport, "invalid", Some(IpAddr::from([1, 1, 1, 1])))
                .await,
            Err(Error::Parse { .. })
        ));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_without_ip_fails_immediately() {
        let transport = fixed(200, "ignored");
        assert!(matches!(
            client().update_a_record(&transport, "some.domain.com", None).await,
            Err(Error::NilInput)
        ));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_puts_single_record_list() {
        let transport = fixed(200, "ignored");
        client()
            .with_ttl(1800)
            .update_a_record(&transport, "@.domain.co.uk", Some(IpAddr::from([1, 2, 3, 4])))
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, reqwest::Method::PUT);
        assert_eq!(
            seen[0].url,
            "https://api.godaddy.com/v1/domains/domain.co.uk/records/A/@"
        );
        let body: serde_json::Value =
            serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!([{ "data": "1.2.3.4", "ttl": 1800 }]));
    }

    #[tokio::test]
    async fn write_rejects_non_200() {
        let transport = fixed(404, "[]");
        assert!(matches!(
            client()
                .update_a_record(&transport, "some.domain.com", Some(IpAddr::from([1, 1, 1, 1])))
                .await,
            Err(Error::RemoteApi { .. })
        ));
    }

    #[tokio::test]
    async fn honours_custom_api_base() {
        let transport = fixed(200, r#"[{"data":"1.1.1.1"}]"#);
        client()
            .with_api_base("http://127.0.0.1:9999/v1/domains/")
            .get_a_record_ip(&transport, "www.example.com")
            .await
            .unwrap();
        assert_eq!(
            transport.seen.lock().unwrap()[0].url,
            "http://127.0.0.1:9999/v1/domains/example.com/records/A/www"
        );
    }
}
