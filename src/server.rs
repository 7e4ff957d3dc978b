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

//! The metrics HTTP server and the serving loop that keeps the process
//! alive between scrapes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, trace};

use crate::collector::Collector;
use crate::config::Config;
use crate::error::StartupError;
use crate::fetch::HttpFetcher;
use crate::render::render_exposition;
use crate::tasks;

pub type SharedCollector = Arc<Collector>;

/// Serve one scrape. Infallible: whatever happened upstream, the scraper
/// gets a well-formed exposition plus the health gauge.
pub async fn metrics_handler(State(collector): State<SharedCollector>) -> String {
    let scrape = collector.collect().await;
    render_exposition(
        collector.prefix(),
        scrape.up,
        scrape.errors_total,
        &scrape.families,
    )
}

/// Bring up the exporter: build the fetcher and collector, bind the metrics
/// listener, then idle in the serving loop until a termination signal.
pub async fn run(config: Arc<Config>) -> Result<(), StartupError> {
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let resolved = tasks::resolve(&config.tasks)?;
    let collector: SharedCollector =
        Arc::new(Collector::new(config.name.clone(), resolved, fetcher));

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(collector)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&format!("0.0.0.0:{}", config.listen_port))
        .await
        .map_err(|source| StartupError::Bind {
            port: config.listen_port,
            source,
        })?;
    info!("metrics server listening on 0.0.0.0:{}", config.listen_port);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("metrics server error: {e}");
        }
    });

    serving_loop(config.check_interval).await;
    Ok(())
}

/// Keep the process alive between scrape-triggered collections. The loop
/// holds no data; each tick is a heartbeat, and only a termination signal
/// breaks it.
async fn serving_loop(check_interval: u64) {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(check_interval)) => {
                trace!("heartbeat");
            }
            _ = &mut shutdown => {
                info!("termination signal received; shutting down");
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
