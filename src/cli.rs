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

use std::path::PathBuf;

use clap::Parser;

/// Command-line options. Every option mirrors a config-file key; a flag set
/// here takes precedence over the file value.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file location. Defaults to `<executable>.yml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kubernetes API server base URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Tasks to execute each pass, in order.
    #[arg(long, num_args = 1..)]
    pub tasks: Option<Vec<String>>,

    /// Client TLS public key file for the upstream connection.
    #[arg(long)]
    pub ssl_public_key: Option<PathBuf>,

    /// Client TLS private key file for the upstream connection.
    #[arg(long)]
    pub ssl_private_key: Option<PathBuf>,

    /// File containing the bearer token presented to the API server.
    #[arg(long)]
    pub token: Option<PathBuf>,

    /// CA bundle used to verify the API server certificate.
    #[arg(long)]
    pub ssl_ca_cert: Option<PathBuf>,

    /// Metric name prefix.
    #[arg(long)]
    pub name: Option<String>,

    /// The port to listen on for the metrics server.
    #[arg(short = 'p', long)]
    pub listen_port: Option<u16>,

    /// Heartbeat interval in seconds between collection passes.
    #[arg(long)]
    pub check_interval: Option<u64>,

    /// Upstream request timeout in seconds.
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Logging level (e.g. `info`, `debug`, or a tracing filter directive).
    #[arg(long)]
    pub log_level: Option<String>,
}
