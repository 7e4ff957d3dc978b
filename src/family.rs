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

//! Grouping of accumulated records into metric families.
//!
//! Families are keyed by metric name in an explicit map. The label schema of
//! a family is bound by the first record seen for that name within the pass;
//! every later record must carry exactly the same keys in the same order.
//! A record that disagrees taints its family: the record is rejected, all of
//! that family's further records this pass are rejected too, entries accepted
//! before the mismatch are kept, and the mismatch is reported to the caller
//! so the pass can be marked failed. Keys are never silently dropped.

use std::collections::HashMap;

use tracing::warn;

use crate::record::Record;

/// A named group of measurements sharing one label schema, as rendered to
/// scrapers. Built fresh every pass, discarded after rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub description: String,
    pub label_keys: Vec<String>,
    pub entries: Vec<(Vec<String>, f64)>,
}

/// The outcome of grouping one pass worth of records.
#[derive(Debug)]
pub struct BuiltFamilies {
    pub families: Vec<MetricFamily>,
    /// Number of records rejected for disagreeing with their family's schema.
    pub schema_mismatches: usize,
}

struct FamilyState {
    family: MetricFamily,
    tainted: bool,
}

/// Consume one pass worth of records and group them by metric name.
///
/// Output order is unspecified; consumers must not depend on it.
pub fn build_families(records: Vec<Record>) -> BuiltFamilies {
    let mut states: HashMap<String, FamilyState> = HashMap::new();
    let mut schema_mismatches = 0;

    for record in records {
        let keys = record.label_keys();
        let state = states
            .entry(record.metric_name.clone())
            .or_insert_with(|| FamilyState {
                family: MetricFamily {
                    name: record.metric_name.clone(),
                    description: record.description.clone(),
                    label_keys: keys.clone(),
                    entries: Vec::new(),
                },
                tainted: false,
            });

        if state.tainted {
            schema_mismatches += 1;
            continue;
        }
        if state.family.label_keys != keys {
            warn!(
                family = %state.family.name,
                expected = ?state.family.label_keys,
                got = ?keys,
                "label schema mismatch; rejecting this family's further entries for this pass"
            );
            state.tainted = true;
            schema_mismatches += 1;
            continue;
        }
        state.family.entries.push((record.label_values(), record.value));
    }

    let families = states
        .into_values()
        .map(|state| state.family)
        .filter(|family| !family.entries.is_empty())
        .collect();

    BuiltFamilies {
        families,
        schema_mismatches,
    }
}
