//! HTTP implementation of [`CascadeBackend`] using reqwest.
//!
//! # Security note - logging
//!
//! The backend bearer token is held in a `secrecy::SecretString` and the
//! built `Authorization` header is marked sensitive, so it is not emitted by
//! reqwest's request logging. Avoid `RUST_LOG=reqwest=debug` in production
//! regardless; other request details are still logged at that level.

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use async_trait::async_trait;

use super::{CascadeBackend, CascadeParams};
use crate::config::BackendConfig;
use crate::error::{Result, SluiceError};
use crate::types::{BaseOptions, OptionSets};

const CASCADE_PATH: &str = "filters/cascading-options";
const BASE_OPTIONS_PATH: &str = "filters/options";

/// Build the `Authorization` header from a bearer token, keeping the token
/// inside `secrecy` until the last moment and marking the header sensitive so
/// it is redacted from logs.
fn auth_header(token: &str) -> Result<header::HeaderValue> {
    let bearer = SecretString::from(format!("Bearer {token}"));
    let mut value = header::HeaderValue::from_str(bearer.expose_secret()).map_err(|_| {
        SluiceError::Auth("token contains characters not valid in an HTTP header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// reqwest-backed cascade backend.
pub struct HttpCascadeBackend {
    client: Client,
    cascade_url: Url,
    base_options_url: Url,
}

impl HttpCascadeBackend {
    /// Build a backend from config: parses the base URL, joins the two
    /// endpoint paths, installs the auth header, and applies the request
    /// timeout.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        // Url::join replaces the last path segment unless the base ends in a
        // slash.
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| SluiceError::InvalidUrl(config.base_url.clone(), e.to_string()))?;
        let cascade_url = base
            .join(CASCADE_PATH)
            .map_err(|e| SluiceError::InvalidUrl(config.base_url.clone(), e.to_string()))?;
        let base_options_url = base
            .join(BASE_OPTIONS_PATH)
            .map_err(|e| SluiceError::InvalidUrl(config.base_url.clone(), e.to_string()))?;

        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.token {
            headers.insert(header::AUTHORIZATION, auth_header(token)?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            cascade_url,
            base_options_url,
        })
    }
}

#[async_trait]
impl CascadeBackend for HttpCascadeBackend {
    async fn cascade_options(&self, params: &CascadeParams) -> Result<OptionSets> {
        let response = self
            .client
            .get(self.cascade_url.clone())
            .query(&params.query_pairs())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SluiceError::Api(format!(
                "cascading-options returned {}",
                response.status()
            )));
        }

        Ok(response.json::<OptionSets>().await?)
    }

    async fn base_options(&self) -> Result<BaseOptions> {
        let response = self.client.get(self.base_options_url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(SluiceError::Api(format!(
                "base options returned {}",
                response.status()
            )));
        }

        Ok(response.json::<BaseOptions>().await?)
    }
}
