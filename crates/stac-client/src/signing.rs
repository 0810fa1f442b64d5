//! Planetary Computer SAS signing for asset hrefs.
//!
//! Blob-storage assets behind the Planetary Computer are only readable with
//! a short-lived SAS token. The `/sign` endpoint returns the href with the
//! token appended. Hrefs on any other host are public and pass through
//! untouched.

use serde::Deserialize;
use tracing::debug;

use crate::error::{StacError, StacResult};
use crate::PLANETARY_COMPUTER_SAS_URL;

/// Azure Blob Storage domain serving Planetary Computer assets.
pub const PLANETARY_COMPUTER_BLOB_HOST: &str = "blob.core.windows.net";

#[derive(Debug, Deserialize)]
struct SignedLink {
    href: String,
}

/// Signs asset hrefs via a Planetary Computer compatible SAS API.
#[derive(Clone)]
pub struct SasSigner {
    client: reqwest::Client,
    sas_url: String,
    hosts: Vec<String>,
}

impl SasSigner {
    pub fn new(client: reqwest::Client, sas_url: impl Into<String>) -> Self {
        Self {
            client,
            sas_url: sas_url.into(),
            hosts: vec![PLANETARY_COMPUTER_BLOB_HOST.to_string()],
        }
    }

    /// Also sign hrefs on `host` and its subdomains.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into());
        self
    }

    /// Signer for the public Planetary Computer SAS API.
    pub fn planetary_computer(client: reqwest::Client) -> Self {
        Self::new(client, PLANETARY_COMPUTER_SAS_URL)
    }

    pub fn sign_url(&self) -> String {
        format!("{}/sign", self.sas_url.trim_end_matches('/'))
    }

    /// True when `href` points at a host that requires a SAS token.
    pub fn needs_signing(&self, href: &str) -> bool {
        let Some(host) = reqwest::Url::parse(href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        else {
            return false;
        };

        self.hosts.iter().any(|suffix| {
            host == *suffix
                || host
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Return `href` with a SAS token appended, or unchanged when its host
    /// needs no token.
    pub async fn sign(&self, href: &str) -> StacResult<String> {
        if !self.needs_signing(href) {
            return Ok(href.to_string());
        }

        let url = self.sign_url();
        let resp = self
            .client
            .get(&url)
            .query(&[("href", href)])
            .send()
            .await
            .map_err(|e| StacError::Signing(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StacError::Signing(format!(
                "{} returned HTTP {}: {}",
                url,
                status.as_u16(),
                body.chars().take(300).collect::<String>()
            )));
        }

        let signed: SignedLink = resp
            .json()
            .await
            .map_err(|e| StacError::Signing(format!("parsing sign response: {e}")))?;

        debug!(href, "Signed asset href");
        Ok(signed.href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_url_for_planetary_computer() {
        let signer = SasSigner::planetary_computer(reqwest::Client::new());
        assert_eq!(
            signer.sign_url(),
            "https://planetarycomputer.microsoft.com/api/sas/v1/sign"
        );
    }

    #[test]
    fn sign_url_trims_slash() {
        let signer = SasSigner::new(reqwest::Client::new(), "http://localhost:9000/sas/");
        assert_eq!(signer.sign_url(), "http://localhost:9000/sas/sign");
    }

    #[test]
    fn only_blob_hosts_need_signing() {
        let signer = SasSigner::planetary_computer(reqwest::Client::new());

        assert!(signer.needs_signing(
            "https://sentinel2l2a01.blob.core.windows.net/sentinel2-l2/B04.tif"
        ));
        assert!(!signer.needs_signing("https://sentinel-cogs.s3.us-west-2.amazonaws.com/B04.tif"));
        assert!(!signer.needs_signing("https://evilblob.core.windows.net.example.com/B04.tif"));
        assert!(!signer.needs_signing("https://notblob.core.windows.net/B04.tif"));
        assert!(!signer.needs_signing("not a url"));
    }

    #[test]
    fn extra_host_is_signed() {
        let signer = SasSigner::new(reqwest::Client::new(), "http://localhost:9000/sas")
            .with_host("127.0.0.1");
        assert!(signer.needs_signing("http://127.0.0.1:8080/private/B04.tif"));
        assert!(signer.needs_signing("https://x.blob.core.windows.net/B04.tif"));
    }

    #[tokio::test]
    async fn public_href_passes_through() {
        // Unreachable signer: any request would fail.
        let signer = SasSigner::new(reqwest::Client::new(), "http://127.0.0.1:9/sas");
        let href = "https://sentinel-cogs.s3.us-west-2.amazonaws.com/B04.tif";
        assert_eq!(signer.sign(href).await.unwrap(), href);
    }
}
