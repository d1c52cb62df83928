//! Dataset classification by name and namespace.
//!
//! All three classifiers are pure substring matchers. The builder runs them
//! once, when a dataset id is first seen, and never again for that id.

use crate::types::{Layer, SourceSystem};

/// Substrings that mark a dataset as an upstream source system table.
const SOURCE_MARKERS: &[&str] = &["postgres", "sqlserver", "mongodb", "public.", "dbo.", ".csv"];

/// Classify a dataset into a medallion layer from its display name.
///
/// Case-insensitive, first match wins:
/// `bronze`/`raw`, then `silver`/`clean`, then `gold`/`analytics`, then any
/// source marker. Everything else is [`Layer::Unknown`].
pub fn determine_layer(name: &str) -> Layer {
    let name = name.to_lowercase();

    if name.contains("bronze") || name.contains("raw") {
        Layer::Bronze
    } else if name.contains("silver") || name.contains("clean") {
        Layer::Silver
    } else if name.contains("gold") || name.contains("analytics") {
        Layer::Gold
    } else if SOURCE_MARKERS.iter().any(|marker| name.contains(marker)) {
        Layer::Source
    } else {
        Layer::Unknown
    }
}

/// Classify a dataset's source system from its namespace. Case-sensitive.
pub fn extract_source_system(namespace: &str) -> SourceSystem {
    if namespace.contains("postgres") {
        SourceSystem::PostgreSql
    } else if namespace.contains("sqlserver") {
        SourceSystem::SqlServer
    } else if namespace.contains("mongodb") {
        SourceSystem::MongoDb
    } else if namespace.contains("file://") {
        SourceSystem::CsvFiles
    } else if namespace.contains("s3://") {
        SourceSystem::DataLake
    } else {
        SourceSystem::Unknown
    }
}

/// Display table name of a dataset.
///
/// S3 datasets keep their full object path; dotted names (`schema.table`)
/// keep only the last segment.
pub fn get_source_table_name(namespace: &str, name: &str) -> String {
    if namespace.starts_with("s3://") {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((_, table)) => table.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_keywords() {
        assert_eq!(determine_layer("bronze/orders"), Layer::Bronze);
        assert_eq!(determine_layer("RAW_customers"), Layer::Bronze);
        assert_eq!(determine_layer("silver/orders_clean"), Layer::Silver);
        assert_eq!(determine_layer("cleaned.events"), Layer::Silver);
        assert_eq!(determine_layer("gold/daily_revenue"), Layer::Gold);
        assert_eq!(determine_layer("Analytics.kpis"), Layer::Gold);
    }

    #[test]
    fn test_layer_first_match_wins() {
        // "raw" is checked before "gold"
        assert_eq!(determine_layer("gold_from_raw"), Layer::Bronze);
        assert_eq!(determine_layer("silver_to_gold"), Layer::Silver);
    }

    #[test]
    fn test_layer_source_markers() {
        assert_eq!(determine_layer("public.orders"), Layer::Source);
        assert_eq!(determine_layer("dbo.Customers"), Layer::Source);
        assert_eq!(determine_layer("exports/customers.csv"), Layer::Source);
        assert_eq!(determine_layer("mongodb_users"), Layer::Source);
    }

    #[test]
    fn test_layer_unknown() {
        assert_eq!(determine_layer("ecommerce.orders"), Layer::Unknown);
        assert_eq!(determine_layer(""), Layer::Unknown);
    }

    #[test]
    fn test_source_system() {
        assert_eq!(
            extract_source_system("postgres://prod:5432"),
            SourceSystem::PostgreSql
        );
        assert_eq!(
            extract_source_system("sqlserver://erp:1433"),
            SourceSystem::SqlServer
        );
        assert_eq!(extract_source_system("mongodb://x"), SourceSystem::MongoDb);
        assert_eq!(extract_source_system("file:///data"), SourceSystem::CsvFiles);
        assert_eq!(extract_source_system("s3://lake"), SourceSystem::DataLake);
        assert_eq!(
            extract_source_system("mysql://prod:3306"),
            SourceSystem::Unknown
        );
        // Case-sensitive, unlike layer detection
        assert_eq!(extract_source_system("S3://LAKE"), SourceSystem::Unknown);
    }

    #[test]
    fn test_table_name() {
        assert_eq!(
            get_source_table_name("s3://lake", "bronze/orders.v2"),
            "bronze/orders.v2"
        );
        assert_eq!(
            get_source_table_name("postgres://db", "public.orders"),
            "orders"
        );
        assert_eq!(get_source_table_name("mongodb://x", "a.b.c"), "c");
        assert_eq!(get_source_table_name("file:///tmp", "customers"), "customers");
        assert_eq!(get_source_table_name("file:///tmp", "trailing."), "");
    }
}
