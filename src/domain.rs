//! Splitting a target like `home.example.co.uk` into the pieces the
//! GoDaddy records API wants: the registrable domain and the record name.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// Record name GoDaddy uses for the bare domain
pub const ROOT_SUBDOMAIN: &str = "@";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDomain {
    /// Record name relative to the domain, `@` for the domain itself
    pub subdomain: String,
    /// Registrable domain including its suffix, e.g. `bar.co.uk`
    pub domain: String,
    /// Public suffix, e.g. `co.uk`
    pub suffix: String,
}

impl ParsedDomain {
    /// `{base}/{domain}/records/A/{subdomain}`
    pub fn records_path(&self, base: &str) -> String {
        format!(
            "{}/{}/records/A/{}",
            base.trim_end_matches('/'),
            self.domain,
            self.subdomain
        )
    }

    pub fn is_root(&self) -> bool {
        self.subdomain == ROOT_SUBDOMAIN
    }
}

impl fmt::Display for ParsedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "{}", self.domain)
        } else {
            write!(f, "{}.{}", self.subdomain, self.domain)
        }
    }
}

impl FromStr for ParsedDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse a target name.
///
/// Accepts bare hostnames, URLs with a scheme, and the `@.example.com`
/// form. A name without a subdomain label maps to the `@` record.
pub fn parse(input: &str) -> Result<ParsedDomain> {
    let trimmed = input.trim();
    let name = trimmed.strip_prefix("@.").unwrap_or(trimmed);
    if name.is_empty() {
        return Err(Error::parse(input, "empty name"));
    }

    let host = extract_host(name).map_err(|reason| Error::parse(input, reason))?;
    let host = host.strip_suffix('.').unwrap_or(&host);
    if host.split('.').any(str::is_empty) {
        return Err(Error::parse(input, "empty label in domain"));
    }

    let registrable = psl::domain(host.as_bytes())
        .ok_or_else(|| Error::parse(input, "no registrable domain under a public suffix"))?;
    let suffix = registrable.suffix();
    if !suffix.is_known() {
        return Err(Error::parse(input, "unknown public suffix"));
    }

    let domain = std::str::from_utf8(registrable.as_bytes())
        .map_err(|e| Error::parse(input, e.to_string()))?
        .to_string();
    let suffix = std::str::from_utf8(suffix.as_bytes())
        .map_err(|e| Error::parse(input, e.to_string()))?
        .to_string();

    let subdomain = host
        .strip_suffix(domain.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(ROOT_SUBDOMAIN)
        .to_string();

    Ok(ParsedDomain {
        subdomain,
        domain,
        suffix,
    })
}

/// Pull the hostname out of `name`, adding an `https://` scheme when the
/// input doesn't carry one.
fn extract_host(name: &str) -> std::result::Result<String, String> {
    let url = if name.contains("://") {
        Url::parse(name)
    } else {
        Url::parse(&format!("https://{}", name))
    }
    .map_err(|e| e.to_string())?;

    match url.domain() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err("no domain name in input".to_string()),
    }
}
