// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The upstream HTTP client.
//!
//! [`HttpFetcher`] performs one authenticated GET per task per pass against
//! the configured API server, with the server certificate verified against
//! the configured CA bundle. The [`ApiFetch`] trait is the seam the
//! collector depends on, so tests can substitute canned payloads.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ConfigError, DecodeError, FetchError, TaskError};

#[async_trait]
pub trait ApiFetch: Send + Sync {
    /// Fetch the JSON document at `api_path` below the configured base URL.
    async fn fetch_json(&self, api_path: &str) -> Result<Value, TaskError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    token_path: PathBuf,
}

impl HttpFetcher {
    /// Build the client from configuration. TLS material is loaded once,
    /// here, and bad paths or bad PEM fail at startup. The bearer token is
    /// not loaded here: it is re-read on every fetch, so rotated
    /// service-account tokens are picked up without a restart.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.fetch_timeout));

        let ca_path = config.ssl_ca_cert.display().to_string();
        let ca_pem = std::fs::read(&config.ssl_ca_cert).map_err(|source| ConfigError::Read {
            path: ca_path.clone(),
            source,
        })?;
        let certificates = reqwest::Certificate::from_pem_bundle(&ca_pem)
            .map_err(|source| ConfigError::Tls {
                path: ca_path,
                source,
            })?;
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }

        if let (Some(public_key), Some(private_key)) =
            (&config.ssl_public_key, &config.ssl_private_key)
        {
            let shown = public_key.display().to_string();
            let mut pem = std::fs::read(public_key).map_err(|source| ConfigError::Read {
                path: shown.clone(),
                source,
            })?;
            pem.extend(std::fs::read(private_key).map_err(|source| ConfigError::Read {
                path: private_key.display().to_string(),
                source,
            })?);
            let identity =
                reqwest::Identity::from_pem(&pem).map_err(|source| ConfigError::Tls {
                    path: shown,
                    source,
                })?;
            builder = builder.identity(identity);
        }

        Ok(Self {
            client: builder.build().map_err(ConfigError::HttpClient)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            token_path: config.token.clone(),
        })
    }
}

#[async_trait]
impl ApiFetch for HttpFetcher {
    async fn fetch_json(&self, api_path: &str) -> Result<Value, TaskError> {
        let token = tokio::fs::read_to_string(&self.token_path)
            .await
            .map_err(|source| FetchError::Credential {
                path: self.token_path.display().to_string(),
                source,
            })?;

        let url = format!("{}{}", self.base_url, api_path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.trim())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status }.into());
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| TaskError::Decode(DecodeError::Json(source)))
    }
}
