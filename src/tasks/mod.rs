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

//! The task registry: the fixed, statically-known set of upstream endpoints
//! this exporter knows how to poll, and the parser for each.
//!
//! The configured task list is resolved against this table once at startup;
//! a name the table does not carry aborts the process before serving begins.

pub mod external_metrics;

use serde_json::Value;

use crate::error::{ConfigError, DecodeError};
use crate::record::Record;

/// A parser: upstream JSON document in, records out. Pure, no I/O.
pub type ParseFn = fn(&Value, &str) -> Result<Vec<Record>, DecodeError>;

/// One registered task: the configured name, the upstream API path fetched
/// each pass, and the parser applied to the response.
#[derive(Clone, Copy, Debug)]
pub struct TaskSpec {
    pub name: &'static str,
    pub api_path: &'static str,
    pub parse: ParseFn,
}

/// Every task this exporter supports.
pub const REGISTRY: &[TaskSpec] = &[TaskSpec {
    name: "external_metrics",
    api_path: "/apis/external.metrics.k8s.io/v1beta1",
    parse: external_metrics::parse,
}];

/// Resolve configured task names against the registry, preserving the
/// configured order. Fails on the first unknown name.
pub fn resolve(names: &[String]) -> Result<Vec<TaskSpec>, ConfigError> {
    names
        .iter()
        .map(|name| {
            REGISTRY
                .iter()
                .find(|task| task.name == name)
                .copied()
                .ok_or_else(|| ConfigError::UnknownTask(name.clone()))
        })
        .collect()
}
