//! Rendering of metric families into Prometheus text exposition format.

use crate::family::MetricFamily;

/// Helper struct to build Prometheus metrics
pub struct MetricBuilder {
    metrics: String,
}

impl MetricBuilder {
    pub fn new() -> Self {
        Self {
            metrics: String::new(),
        }
    }

    /// Add a HELP line
    pub fn help(&mut self, name: &str, description: &str) -> &mut Self {
        self.metrics
            .push_str(&format!("# HELP {name} {description}\n"));
        self
    }

    /// Add a TYPE line
    pub fn type_(&mut self, name: &str, metric_type: &str) -> &mut Self {
        self.metrics
            .push_str(&format!("# TYPE {name} {metric_type}\n"));
        self
    }

    /// Add a metric line with labels
    pub fn metric(
        &mut self,
        name: &str,
        labels: &[(&str, &str)],
        value: impl ToString,
    ) -> &mut Self {
        self.metrics.push_str(name);

        if !labels.is_empty() {
            self.metrics.push('{');
            for (i, (key, value)) in labels.iter().enumerate() {
                if i > 0 {
                    self.metrics.push(',');
                }
                // Escape quotes in values for Prometheus format
                let escaped_value = value.replace('"', "\\\"");
                self.metrics.push_str(&format!("{key}=\"{escaped_value}\""));
            }
            self.metrics.push('}');
        }

        self.metrics.push(' ');
        self.metrics.push_str(&value.to_string());
        self.metrics.push('\n');
        self
    }

    /// Build the final metric string
    pub fn build(self) -> String {
        self.metrics
    }
}

impl Default for MetricBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one pass worth of output: the health gauge, the error counter, and
/// every family the pass produced. Families are sorted by name so repeated
/// scrapes of identical data render identically; scrapers must not read
/// meaning into the order.
pub fn render_exposition(
    prefix: &str,
    up: bool,
    errors_total: u64,
    families: &[MetricFamily],
) -> String {
    let mut builder = MetricBuilder::new();

    let up_name = format!("{prefix}_up");
    builder
        .help(&up_name, "exporter scrape status")
        .type_(&up_name, "gauge")
        .metric(&up_name, &[], u64::from(up));

    let errors_name = format!("{prefix}_errors_total");
    builder
        .help(&errors_name, "exporter scrape errors total counter")
        .type_(&errors_name, "counter")
        .metric(&errors_name, &[], errors_total);

    let mut sorted: Vec<&MetricFamily> = families.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for family in sorted {
        builder
            .help(&family.name, &family.description)
            .type_(&family.name, "gauge");
        for (values, value) in &family.entries {
            let labels: Vec<(&str, &str)> = family
                .label_keys
                .iter()
                .zip(values.iter())
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            builder.metric(&family.name, &labels, value);
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_metrics_always_present() {
        let out = render_exposition("x", true, 0, &[]);
        assert!(out.contains("# HELP x_up exporter scrape status\n"));
        assert!(out.contains("# TYPE x_up gauge\n"));
        assert!(out.contains("x_up 1\n"));
        assert!(out.contains("# TYPE x_errors_total counter\n"));
        assert!(out.contains("x_errors_total 0\n"));
    }

    #[test]
    fn test_down_pass_renders_zero_gauge() {
        let out = render_exposition("x", false, 3, &[]);
        assert!(out.contains("x_up 0\n"));
        assert!(out.contains("x_errors_total 3\n"));
    }

    #[test]
    fn test_family_block_shape() {
        let family = MetricFamily {
            name: "x_resource_info".to_string(),
            description: "Information about resource".to_string(),
            label_keys: vec!["resource_name".to_string(), "resource_kind".to_string()],
            entries: vec![(vec!["a".to_string(), "K".to_string()], 1.0)],
        };
        let out = render_exposition("x", true, 0, &[family]);
        assert!(out.contains("# HELP x_resource_info Information about resource\n"));
        assert!(out.contains("# TYPE x_resource_info gauge\n"));
        assert!(out.contains("x_resource_info{resource_name=\"a\",resource_kind=\"K\"} 1\n"));
    }

    #[test]
    fn test_zero_label_family_renders_bare() {
        let family = MetricFamily {
            name: "x_total".to_string(),
            description: "d".to_string(),
            label_keys: Vec::new(),
            entries: vec![(Vec::new(), 0.0)],
        };
        let out = render_exposition("x", true, 0, &[family]);
        assert!(out.contains("x_total 0\n"));
    }

    #[test]
    fn test_families_sorted_by_name() {
        let make = |name: &str| MetricFamily {
            name: name.to_string(),
            description: "d".to_string(),
            label_keys: Vec::new(),
            entries: vec![(Vec::new(), 1.0)],
        };
        let out = render_exposition("x", true, 0, &[make("x_b"), make("x_a")]);
        let a = out.find("# HELP x_a").unwrap();
        let b = out.find("# HELP x_b").unwrap();
        assert!(a < b);
    }
}
