//! Plain-text hover text for nodes.

use crate::types::{LineageNode, NOT_AVAILABLE};

/// Columns listed before the rest are summarised.
const MAX_TOOLTIP_COLUMNS: usize = 10;

/// Hover text for a node, one fact per line.
pub fn tooltip(node: &LineageNode) -> String {
    if node.is_job() {
        return format!(
            "Job: {}\nNamespace: {}\nEvent Time: {}",
            node.label,
            node.details.namespace,
            node.details.event_time.as_deref().unwrap_or(NOT_AVAILABLE)
        );
    }

    let mut lines = vec![
        node.label.clone(),
        format!("Layer: {}", node.layer.as_str().to_uppercase()),
        format!("Source: {}", node.source_system),
    ];

    if let Some(rows) = node.details.row_count {
        lines.push(format!("Rows: {}", thousands(rows)));
    }
    if let Some(size) = node.details.size {
        lines.push(format!("Size: {:.2} MB", size as f64 / (1024.0 * 1024.0)));
    }

    let fields = &node.schema_fields;
    if !fields.is_empty() {
        lines.push(String::new());
        lines.push(format!("Schema ({} columns):", fields.len()));
        for field in fields.iter().take(MAX_TOOLTIP_COLUMNS) {
            lines.push(format!("  • {} ({})", field.name, field.field_type));
        }
        if fields.len() > MAX_TOOLTIP_COLUMNS {
            lines.push(format!(
                "  ... and {} more columns",
                fields.len() - MAX_TOOLTIP_COLUMNS
            ));
        }
    }

    lines.join("\n")
}

/// `1234567` -> `1,234,567`
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::extract;
    use crate::types::{DatasetRef, Event, SchemaField};

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(250000), "250,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_job_tooltip() {
        let graph = extract(&[Event::new("lake", "ingest").at("2024-03-01T10:00:00Z")]);
        let text = tooltip(graph.node("job_ingest").unwrap());
        assert_eq!(
            text,
            "Job: ingest\nNamespace: lake\nEvent Time: 2024-03-01T10:00:00Z"
        );
    }

    #[test]
    fn test_dataset_tooltip() {
        let columns: Vec<SchemaField> = (0..12)
            .map(|i| SchemaField::new(format!("col{}", i), "STRING"))
            .collect();
        let event = Event::new("lake", "ingest").with_output(
            DatasetRef::new("s3://lake", "bronze/orders")
                .with_schema(columns)
                .with_statistics(Some(250000), Some(3 * 1024 * 1024 / 2)),
        );
        let graph = extract(&[event]);
        let text = tooltip(graph.node("s3://lake/bronze/orders").unwrap());

        assert!(text.starts_with("bronze/orders\nLayer: BRONZE\nSource: Data Lake\n"));
        assert!(text.contains("Rows: 250,000"));
        assert!(text.contains("Size: 1.50 MB"));
        assert!(text.contains("Schema (12 columns):"));
        assert!(text.contains("  • col9 (STRING)"));
        assert!(!text.contains("col10"));
        assert!(text.ends_with("  ... and 2 more columns"));
    }

    #[test]
    fn test_dataset_tooltip_without_statistics() {
        let event = Event::new("lake", "read")
            .with_input(DatasetRef::new("postgres://prod", "public.orders"));
        let graph = extract(&[event]);
        let text = tooltip(graph.node("postgres://prod/public.orders").unwrap());
        assert_eq!(text, "public.orders\nLayer: SOURCE\nSource: PostgreSQL");
    }
}
