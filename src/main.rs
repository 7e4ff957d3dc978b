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

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kube_metrics_exporter::cli::Cli;
use kube_metrics_exporter::config::Config;
use kube_metrics_exporter::server;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration problems are fatal: never start serving half-configured.
    let config = match Config::load(&cli) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = server::run(config).await {
        tracing::error!("startup failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
