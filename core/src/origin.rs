//! Trusted-origin guard applied before any reference URL is fetched.
//!
//! URLs are normalised to `(scheme, host, port)` and compared as a tuple, so
//! prefix tricks such as `https://api.example.com.evil.net` or userinfo
//! tricks such as `https://api.example.com@evil.net` never match.

use url::Url;

use crate::error::ApiError;

/// The single upstream origin the catalog is allowed to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigin {
    scheme: String,
    host: String,
    port: u16,
}

impl TrustedOrigin {
    /// Derive the origin from an already-parsed base URL.
    pub fn from_url(url: &Url) -> Result<Self, ApiError> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must be http or https: {url}"
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::InvalidConfig(format!("base URL has no host: {url}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ApiError::InvalidConfig(format!("base URL has no port: {url}")))?;

        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
        })
    }

    /// Whether a parsed URL lives on this origin.
    pub fn matches(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str() == Some(self.host.as_str())
            && url.port_or_known_default() == Some(self.port)
    }

    /// Parse `raw` and accept it only if it is absolute and on this origin.
    pub fn check(&self, raw: &str) -> Result<Url, ApiError> {
        let invalid = || ApiError::InvalidOrigin {
            url: raw.to_string(),
        };
        let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if self.matches(&url) {
            Ok(url)
        } else {
            Err(invalid())
        }
    }

    pub fn is_trusted(&self, raw: &str) -> bool {
        self.check(raw).is_ok()
    }
}
