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

//! Configuration: a YAML file merged with command-line flags, flags winning.
//!
//! The result is one immutable [`Config`] constructed at startup and shared
//! by reference; nothing mutates configuration after `main` hands it out.

use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::tasks;

pub const DEFAULT_LISTEN_PORT: u16 = 9090;
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The raw shape of the YAML config file. Every key is optional here;
/// required-ness is enforced after the merge with command-line flags.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    url: Option<String>,
    tasks: Option<Vec<String>>,
    ssl_public_key: Option<PathBuf>,
    ssl_private_key: Option<PathBuf>,
    token: Option<PathBuf>,
    ssl_ca_cert: Option<PathBuf>,
    name: Option<String>,
    listen_port: Option<u16>,
    check_interval: Option<u64>,
    fetch_timeout: Option<u64>,
    log_level: Option<String>,
}

/// Validated, merged configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the Kubernetes API server.
    pub url: String,
    /// Ordered list of task names to run each pass.
    pub tasks: Vec<String>,
    /// Optional client TLS pair for the upstream connection.
    pub ssl_public_key: Option<PathBuf>,
    pub ssl_private_key: Option<PathBuf>,
    /// Path to the bearer-credential file, read on every fetch.
    pub token: PathBuf,
    /// Path to the CA bundle the server certificate is verified against.
    pub ssl_ca_cert: PathBuf,
    /// Metric name prefix.
    pub name: String,
    pub listen_port: u16,
    /// Seconds between heartbeat ticks of the serving loop.
    pub check_interval: u64,
    /// Seconds before an upstream request is abandoned.
    pub fetch_timeout: u64,
    pub log_level: String,
}

impl Config {
    /// Load the config file named by `--config` (or the `<executable>.yml`
    /// default), merge it with the command-line flags, and validate.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let file = serde_yml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: shown, source })?;
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let url = cli
            .url
            .clone()
            .or(file.url)
            .ok_or(ConfigError::MissingOption("url"))?;
        Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
            url: url.clone(),
            source,
        })?;

        let tasks_list = cli
            .tasks
            .clone()
            .or(file.tasks)
            .filter(|tasks| !tasks.is_empty())
            .ok_or(ConfigError::MissingOption("tasks"))?;
        // Unknown task names are a configuration error and must surface now,
        // not mid-pass.
        tasks::resolve(&tasks_list)?;

        Ok(Self {
            url,
            tasks: tasks_list,
            ssl_public_key: cli.ssl_public_key.clone().or(file.ssl_public_key),
            ssl_private_key: cli.ssl_private_key.clone().or(file.ssl_private_key),
            token: cli
                .token
                .clone()
                .or(file.token)
                .ok_or(ConfigError::MissingOption("token"))?,
            ssl_ca_cert: cli
                .ssl_ca_cert
                .clone()
                .or(file.ssl_ca_cert)
                .ok_or(ConfigError::MissingOption("ssl_ca_cert"))?,
            name: cli
                .name
                .clone()
                .or(file.name)
                .ok_or(ConfigError::MissingOption("name"))?,
            listen_port: cli
                .listen_port
                .or(file.listen_port)
                .unwrap_or(DEFAULT_LISTEN_PORT),
            check_interval: cli
                .check_interval
                .or(file.check_interval)
                .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
            fetch_timeout: cli
                .fetch_timeout
                .or(file.fetch_timeout)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            log_level: cli
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn default_config_path() -> PathBuf {
    let argv0 = std::env::args()
        .next()
        .unwrap_or_else(|| "kube-metrics-exporter".to_string());
    PathBuf::from(format!("{argv0}.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const FULL_CONFIG: &str = r#"
url: "https://kubernetes.default.svc:443"
tasks:
  - external_metrics
token: /var/run/secrets/kubernetes.io/serviceaccount/token
ssl_ca_cert: /var/run/secrets/kubernetes.io/serviceaccount/ca.crt
name: kubernetes_external_metrics_exporter
listen_port: 8080
check_interval: 30
log_level: debug
"#;

    fn cli_with_config(path: &std::path::Path) -> Cli {
        Cli {
            config: Some(path.to_path_buf()),
            ..Cli::default()
        }
    }

    #[test]
    fn test_file_only_config() {
        let file = write_config(FULL_CONFIG);
        let config = Config::load(&cli_with_config(file.path())).unwrap();
        assert_eq!(config.url, "https://kubernetes.default.svc:443");
        assert_eq!(config.tasks, vec!["external_metrics"]);
        assert_eq!(config.name, "kubernetes_external_metrics_exporter");
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.check_interval, 30);
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT_SECS);
        assert_eq!(config.log_level, "debug");
        assert!(config.ssl_public_key.is_none());
    }

    #[test]
    fn test_cli_flags_take_precedence() {
        let file = write_config(FULL_CONFIG);
        let cli = Cli {
            listen_port: Some(9999),
            name: Some("other_exporter".to_string()),
            ..cli_with_config(file.path())
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.listen_port, 9999);
        assert_eq!(config.name, "other_exporter");
        // Untouched options still come from the file.
        assert_eq!(config.check_interval, 30);
    }

    #[test]
    fn test_missing_required_option() {
        let file = write_config("url: \"https://example.com\"\n");
        let err = Config::load(&cli_with_config(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption("tasks")));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let file = write_config(
            "url: \"not a url\"\ntasks: [external_metrics]\ntoken: /t\nssl_ca_cert: /c\nname: x\n",
        );
        let err = Config::load(&cli_with_config(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_unknown_task_rejected_at_load() {
        let file = write_config(
            "url: \"https://example.com\"\ntasks: [nodes]\ntoken: /t\nssl_ca_cert: /c\nname: x\n",
        );
        let err = Config::load(&cli_with_config(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTask(name) if name == "nodes"));
    }

    #[test]
    fn test_empty_task_list_rejected() {
        let file = write_config(
            "url: \"https://example.com\"\ntasks: []\ntoken: /t\nssl_ca_cert: /c\nname: x\n",
        );
        let err = Config::load(&cli_with_config(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption("tasks")));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = cli_with_config(std::path::Path::new("/nonexistent/exporter.yml"));
        let err = Config::load(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
