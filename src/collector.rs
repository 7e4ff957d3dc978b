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

//! One collection pass: every configured task is fetched and parsed in
//! order, the records are grouped into families, and the health state is
//! updated. No error escapes this module; a failing task contributes zero
//! records and flips the health gauge, nothing more.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::TaskError;
use crate::family::{build_families, MetricFamily};
use crate::fetch::ApiFetch;
use crate::record::{Record, RecordAccumulator};
use crate::tasks::TaskSpec;

/// Everything one pass yields to the renderer.
#[derive(Debug)]
pub struct Scrape {
    /// 1 if every task of this pass succeeded, 0 otherwise.
    pub up: bool,
    /// Monotonic count of failed passes since process start.
    pub errors_total: u64,
    pub families: Vec<MetricFamily>,
}

pub struct Collector {
    prefix: String,
    tasks: Vec<TaskSpec>,
    fetcher: Arc<dyn ApiFetch>,
    /// Single-flight guard: at most one pass runs at a time, and the health
    /// state below is only written while it is held.
    pass_lock: Mutex<()>,
    up: AtomicBool,
    errors_total: AtomicU64,
}

impl Collector {
    pub fn new(
        prefix: impl Into<String>,
        tasks: Vec<TaskSpec>,
        fetcher: Arc<dyn ApiFetch>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            tasks,
            fetcher,
            pass_lock: Mutex::new(()),
            up: AtomicBool::new(false),
            errors_total: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run one full collection pass.
    ///
    /// Nothing survives from the previous pass; all families are rebuilt
    /// from this pass's records. A task whose fetch or parse fails is
    /// logged and skipped, its siblings still run, and whatever was
    /// accumulated is still returned alongside `up == false`.
    pub async fn collect(&self) -> Scrape {
        let _pass = self.pass_lock.lock().await;

        let mut accumulator = RecordAccumulator::new();
        let mut pass_failed = false;

        for task in &self.tasks {
            match self.run_task(task).await {
                Ok(records) => {
                    debug!(task = task.name, records = records.len(), "task completed");
                    accumulator.extend(records);
                }
                Err(err) => {
                    error!(
                        task = task.name,
                        kind = err.kind(),
                        error = %err,
                        "task failed; continuing with remaining tasks"
                    );
                    pass_failed = true;
                }
            }
        }

        let built = build_families(accumulator.into_records());
        if built.schema_mismatches > 0 {
            pass_failed = true;
        }

        // Written only under the pass lock, so a reader never sees the gauge
        // of one pass beside the counter of another.
        let errors_total = if pass_failed {
            self.up.store(false, Ordering::SeqCst);
            self.errors_total.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.up.store(true, Ordering::SeqCst);
            self.errors_total.load(Ordering::SeqCst)
        };

        Scrape {
            up: !pass_failed,
            errors_total,
            families: built.families,
        }
    }

    async fn run_task(&self, task: &TaskSpec) -> Result<Vec<Record>, TaskError> {
        let payload = self.fetcher.fetch_json(task.api_path).await?;
        let records = (task.parse)(&payload, &self.prefix)?;
        Ok(records)
    }
}
