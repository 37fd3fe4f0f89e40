//! Thin HTTP layer: a transport seam that tests can replace, the GoDaddy
//! auth headers, and status classification.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE,
};
use reqwest::Method;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::PUT,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }

    /// Set a header, replacing any existing value with the same name
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// e.g. `401 Unauthorized`
    pub status_text: String,
    pub body: String,
}

/// Executes a single request. Implementations report network-level
/// failures as [`Error::Transport`] and never look at the status code.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("godaddy-ddns/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(&request.url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(&request.url, e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.to_string(),
            body,
        })
    }
}

/// GoDaddy API key pair
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn authorization(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.secret_key)
    }

    /// Attach the headers every GoDaddy call carries.
    ///
    /// Fails when a key contains characters that can't go in a header.
    pub fn apply(&self, request: HttpRequest) -> Result<HttpRequest> {
        let mut authorization = HeaderValue::from_str(&self.authorization())
            .map_err(|_| Error::config("API key or secret contains invalid header characters"))?;
        authorization.set_sensitive(true);

        let json = HeaderValue::from_static("application/json");
        Ok(request
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, json.clone())
            .header(CONTENT_TYPE, json.clone())
            .header(CONTENT_ENCODING, json))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Execute `request` and return the body of a 200 response.
pub async fn send(transport: &dyn HttpTransport, request: HttpRequest) -> Result<String> {
    debug!("{} {}", request.method, request.url);

    let method = request.method.clone();
    let url = request.url.clone();
    let response = transport.execute(request).await?;

    if response.status != 200 {
        return Err(Error::RemoteApi {
            method: method.to_string(),
            url,
            status: response.status_text,
        });
    }

    Ok(response.body)
}
