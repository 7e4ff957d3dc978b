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

//! Error types for the exporter.
//!
//! Startup errors ([`ConfigError`], [`StartupError`]) are fatal: the process
//! prints them and exits before the listener is bound. Per-pass errors
//! ([`FetchError`], [`DecodeError`], wrapped in [`TaskError`]) are scoped to
//! one task within one collection pass and only ever reach the health gauge
//! and error counter, never the scraper.

use thiserror::Error;

/// Errors raised while loading and validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option is present neither in the config file nor on the
    /// command line.
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),

    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected options.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yml::Error,
    },

    /// The configured data source address is not a valid URL.
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The configured task list names a task that is not registered.
    #[error("unknown task `{0}` in configuration")]
    UnknownTask(String),

    /// TLS material (CA bundle or client key pair) could not be loaded.
    #[error("invalid TLS material in {path}: {source}")]
    Tls {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Fatal errors during process startup, after configuration is loaded.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// A fetch failure: the upstream could not be reached or answered badly.
///
/// Timeouts surface here as [`FetchError::Request`] with a timeout source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The bearer-credential file could not be read.
    #[error("failed to read bearer token from {path}: {source}")]
    Credential {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The request failed at the transport level (connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// The upstream answered, but the body was not the expected document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[source] reqwest::Error),

    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

/// Everything that can go wrong for a single task within one pass.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl TaskError {
    /// Short error kind for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingOption("url");
        assert_eq!(err.to_string(), "missing required option `url`");

        let err = ConfigError::UnknownTask("nodes".to_string());
        assert_eq!(err.to_string(), "unknown task `nodes` in configuration");
    }

    #[test]
    fn test_task_error_kind() {
        let err: TaskError = DecodeError::Shape("missing `resources` key".to_string()).into();
        assert_eq!(err.kind(), "decode");
        assert_eq!(
            err.to_string(),
            "unexpected payload shape: missing `resources` key"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigError>();
        assert_send_sync::<TaskError>();
    }
}
