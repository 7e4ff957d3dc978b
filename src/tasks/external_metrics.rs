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

//! Parser for the external metrics API discovery document.
//!
//! The upstream answers `GET /apis/external.metrics.k8s.io/v1beta1` with a
//! JSON object whose `resources` array lists the external metric resources
//! currently registered with the API server. Each resource becomes one info
//! gauge (presence, not magnitude, is the signal), and the array length
//! becomes one count gauge.

use serde_json::Value;

use crate::error::DecodeError;
use crate::record::Record;

pub fn parse(payload: &Value, prefix: &str) -> Result<Vec<Record>, DecodeError> {
    let resources = payload
        .get("resources")
        .ok_or_else(|| DecodeError::Shape("missing `resources` key".to_string()))?
        .as_array()
        .ok_or_else(|| DecodeError::Shape("`resources` is not an array".to_string()))?;

    let mut records = Vec::with_capacity(resources.len() + 1);
    for resource in resources {
        let name = resource
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::Shape("resource missing string `name`".to_string()))?;
        let kind = resource
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::Shape("resource missing string `kind`".to_string()))?;

        records.push(Record::new(
            format!("{prefix}_resource_info"),
            "Information about resource",
            vec![
                ("resource_name".to_string(), name.to_string()),
                ("resource_kind".to_string(), kind.to_string()),
            ],
            1.0,
        ));
    }

    records.push(Record::new(
        format!("{prefix}_resources_count"),
        "Resources count",
        vec![("resource_type".to_string(), "external metrics".to_string())],
        resources.len() as f64,
    ));

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_resources_emits_count_only() {
        let records = parse(&json!({ "resources": [] }), "x").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metric_name, "x_resources_count");
        assert_eq!(records[0].value, 0.0);
        assert_eq!(
            records[0].labels,
            vec![("resource_type".to_string(), "external_metrics".to_string())]
        );
    }

    #[test]
    fn test_two_resources() {
        let payload = json!({
            "resources": [
                { "name": "a", "kind": "K" },
                { "name": "b", "kind": "K" },
            ]
        });
        let records = parse(&payload, "x").unwrap();
        assert_eq!(records.len(), 3);

        let info: Vec<&Record> = records
            .iter()
            .filter(|record| record.metric_name == "x_resource_info")
            .collect();
        assert_eq!(info.len(), 2);
        for record in &info {
            assert_eq!(record.value, 1.0);
            assert_eq!(record.labels[1], ("resource_kind".to_string(), "K".to_string()));
        }
        let names: Vec<&str> = info.iter().map(|r| r.labels[0].1.as_str()).collect();
        assert!(names.contains(&"a") && names.contains(&"b"));

        let count = records.last().unwrap();
        assert_eq!(count.metric_name, "x_resources_count");
        assert_eq!(count.value, 2.0);
    }

    #[test]
    fn test_label_values_are_sanitized() {
        let payload = json!({
            "resources": [{ "name": "queue depth-total", "kind": "External Metric" }]
        });
        let records = parse(&payload, "x").unwrap();
        assert_eq!(
            records[0].labels,
            vec![
                ("resource_name".to_string(), "queue_depth_total".to_string()),
                ("resource_kind".to_string(), "External_Metric".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_resources_key() {
        let err = parse(&json!({}), "x").unwrap_err();
        assert!(matches!(err, DecodeError::Shape(msg) if msg.contains("resources")));
    }

    #[test]
    fn test_resources_not_an_array() {
        let err = parse(&json!({ "resources": 5 }), "x").unwrap_err();
        assert!(matches!(err, DecodeError::Shape(_)));
    }

    #[test]
    fn test_resource_missing_kind() {
        let payload = json!({ "resources": [{ "name": "a" }] });
        let err = parse(&payload, "x").unwrap_err();
        assert!(matches!(err, DecodeError::Shape(msg) if msg.contains("kind")));
    }
}
