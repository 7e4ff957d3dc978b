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

//! The measurement unit produced by task parsers, and the pass-scoped buffer
//! that collects them.

use crate::labels::sanitize;

/// One measurement before grouping: a metric name, a description, ordered
/// label pairs, and a value.
///
/// Immutable once created. The constructor sanitizes the metric name and
/// every label key and value, so a `Record` never carries characters the
/// exposition format cannot represent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub metric_name: String,
    pub description: String,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Record {
    pub fn new(
        metric_name: impl AsRef<str>,
        description: impl Into<String>,
        labels: Vec<(String, String)>,
        value: f64,
    ) -> Self {
        let labels = labels
            .into_iter()
            .map(|(key, value)| (sanitize(&key), sanitize(&value)))
            .collect();
        Self {
            metric_name: sanitize(metric_name.as_ref()),
            description: description.into(),
            labels,
            value,
        }
    }

    /// Label keys in declaration order.
    pub fn label_keys(&self) -> Vec<String> {
        self.labels.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Label values aligned to [`Record::label_keys`].
    pub fn label_values(&self) -> Vec<String> {
        self.labels.iter().map(|(_, value)| value.clone()).collect()
    }
}

/// Ordered buffer of the records emitted during one collection pass.
///
/// Tasks append; nothing is removed until the pass ends, when the whole
/// sequence is consumed destructively by the family builder.
#[derive(Debug, Default)]
pub struct RecordAccumulator {
    records: Vec<Record>,
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the accumulator, yielding the records in insertion order.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sanitizes_all_parts() {
        let record = Record::new(
            "my exporter_things-count",
            "Things count",
            vec![("thing-type".to_string(), "ext\"ernal metrics".to_string())],
            3.0,
        );
        assert_eq!(record.metric_name, "my_exporter_things_count");
        assert_eq!(
            record.labels,
            vec![("thing_type".to_string(), "external_metrics".to_string())]
        );
    }

    #[test]
    fn test_label_keys_preserve_order() {
        let record = Record::new(
            "m",
            "",
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
            ],
            1.0,
        );
        assert_eq!(record.label_keys(), vec!["b", "a"]);
        assert_eq!(record.label_values(), vec!["2", "1"]);
    }

    #[test]
    fn test_accumulator_is_ordered_and_destructive() {
        let mut accumulator = RecordAccumulator::new();
        accumulator.push(Record::new("first", "", Vec::new(), 1.0));
        accumulator.extend(vec![Record::new("second", "", Vec::new(), 2.0)]);
        assert_eq!(accumulator.len(), 2);

        let records = accumulator.into_records();
        assert_eq!(records[0].metric_name, "first");
        assert_eq!(records[1].metric_name, "second");
    }
}
