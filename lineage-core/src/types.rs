//! Data models for OpenLineage run events and the lineage graph built from them.
//!
//! Event types mirror the JSON shape emitted by OpenLineage producers. Every
//! field is optional on the wire: a value of the wrong shape is treated as
//! absent rather than failing the whole event, so one malformed producer cannot
//! take down a graph build.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder label for events whose job carries no name.
pub const UNKNOWN_JOB: &str = "Unknown Job";

/// Placeholder for a missing event time.
pub const NOT_AVAILABLE: &str = "N/A";

/// Deserialize a field, falling back to its default when the JSON value has
/// the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a list element by element, skipping entries of the wrong
/// shape. A value that is not a list at all becomes an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!("Expected a list, ignoring {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping malformed list entry {}: {}", i, e);
                None
            }
        })
        .collect())
}

/// Deserialize a count from any JSON number. Fractional values are
/// truncated; negative or non-numeric values read as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.trunc() as u64)
    }))
}

// ============================================================================
// Run events
// ============================================================================

/// One observation of a pipeline job execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "lenient")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub event_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub job: JobRef,
    #[serde(default, deserialize_with = "lenient")]
    pub run: Option<RunRef>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub inputs: Vec<DatasetRef>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub outputs: Vec<DatasetRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub producer: Option<String>,
}

impl Event {
    /// Create a `COMPLETE` event for the given job.
    pub fn new(job_namespace: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            event_type: Some("COMPLETE".to_string()),
            job: JobRef {
                namespace: Some(job_namespace.into()),
                name: Some(job_name.into()),
            },
            ..Default::default()
        }
    }

    /// Builder: set the event time.
    pub fn at(mut self, event_time: impl Into<String>) -> Self {
        self.event_time = Some(event_time.into());
        self
    }

    /// Builder: set the event type (`START`, `COMPLETE`, `FAIL`, ...).
    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Builder: append an input dataset.
    pub fn with_input(mut self, dataset: DatasetRef) -> Self {
        self.inputs.push(dataset);
        self
    }

    /// Builder: append an output dataset.
    pub fn with_output(mut self, dataset: DatasetRef) -> Self {
        self.outputs.push(dataset);
        self
    }

    pub fn job_name(&self) -> &str {
        self.job.name.as_deref().unwrap_or(UNKNOWN_JOB)
    }

    pub fn job_namespace(&self) -> &str {
        self.job.namespace.as_deref().unwrap_or_default()
    }

    pub fn event_time(&self) -> &str {
        self.event_time.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Whether this event reports a successfully finished run.
    pub fn is_complete(&self) -> bool {
        self.event_type.as_deref() == Some("COMPLETE")
    }
}

/// The job a run event belongs to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRef {
    #[serde(default, deserialize_with = "lenient")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// The run a run event belongs to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRef {
    #[serde(default, deserialize_with = "lenient")]
    pub run_id: Option<String>,
}

/// A dataset read or written by a job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    #[serde(default, deserialize_with = "lenient")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub facets: DatasetFacets,
}

impl DatasetRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: Some(name.into()),
            facets: DatasetFacets::default(),
        }
    }

    /// Builder: attach a schema facet.
    pub fn with_schema(mut self, fields: Vec<SchemaField>) -> Self {
        self.facets.schema = Some(SchemaFacet { fields });
        self
    }

    /// Builder: attach an output statistics facet.
    pub fn with_statistics(mut self, row_count: Option<u64>, size: Option<u64>) -> Self {
        self.facets.output_statistics = Some(OutputStatistics { row_count, size });
        self
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Schema columns from the `schema` facet, empty when absent.
    pub fn schema_fields(&self) -> &[SchemaField] {
        self.facets
            .schema
            .as_ref()
            .map(|s| s.fields.as_slice())
            .unwrap_or_default()
    }

    pub fn output_statistics(&self) -> Option<&OutputStatistics> {
        self.facets.output_statistics.as_ref()
    }
}

/// Facets attached to a dataset reference. Only the ones the graph uses are modelled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetFacets {
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<SchemaFacet>,
    #[serde(default, deserialize_with = "lenient")]
    pub output_statistics: Option<OutputStatistics>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFacet {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub fields: Vec<SchemaField>,
}

/// A single column in a dataset schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub field_type: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            description: None,
        }
    }

    /// Builder: add a column description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Row count and byte size reported for a written dataset.
///
/// Producers sometimes emit these as floats (`1.5e6`, `100.0`); they are
/// truncated to whole numbers. Negative values are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputStatistics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub row_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub size: Option<u64>,
}

// ============================================================================
// Graph model
// ============================================================================

/// Whether a node is a job or a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Job,
    Dataset,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Job => "job",
            NodeKind::Dataset => "dataset",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medallion layer of a node. Job nodes always sit in [`Layer::Job`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Source,
    Bronze,
    Silver,
    Gold,
    Unknown,
    Job,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Source => "source",
            Layer::Bronze => "bronze",
            Layer::Silver => "silver",
            Layer::Gold => "gold",
            Layer::Unknown => "unknown",
            Layer::Job => "job",
        }
    }

    /// Fill color used by renderers.
    pub fn color(&self) -> &'static str {
        match self {
            Layer::Source => "#10B981",
            Layer::Bronze => "#CD7F32",
            Layer::Silver => "#C0C0C0",
            Layer::Gold => "#FFD700",
            Layer::Unknown => "#6B7280",
            Layer::Job => "#6366F1",
        }
    }

    /// Abstract node shape used by renderers (vis.js vocabulary).
    pub fn shape(&self) -> &'static str {
        match self {
            Layer::Source => "database",
            Layer::Bronze | Layer::Silver | Layer::Gold => "box",
            Layer::Unknown => "ellipse",
            Layer::Job => "diamond",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(Layer::Source),
            "bronze" => Ok(Layer::Bronze),
            "silver" => Ok(Layer::Silver),
            "gold" => Ok(Layer::Gold),
            "unknown" => Ok(Layer::Unknown),
            "job" => Ok(Layer::Job),
            _ => Err(format!("Unknown layer: '{}'", s)),
        }
    }
}

/// System a dataset lives in, derived from its namespace scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSystem {
    #[serde(rename = "PostgreSQL")]
    PostgreSql,
    #[serde(rename = "SQL Server")]
    SqlServer,
    #[serde(rename = "MongoDB")]
    MongoDb,
    #[serde(rename = "CSV Files")]
    CsvFiles,
    #[serde(rename = "Data Lake")]
    DataLake,
    /// Fixed label carried by every job node.
    #[serde(rename = "Databricks")]
    Databricks,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl SourceSystem {
    pub const ALL: [SourceSystem; 7] = [
        SourceSystem::PostgreSql,
        SourceSystem::SqlServer,
        SourceSystem::MongoDb,
        SourceSystem::CsvFiles,
        SourceSystem::DataLake,
        SourceSystem::Databricks,
        SourceSystem::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSystem::PostgreSql => "PostgreSQL",
            SourceSystem::SqlServer => "SQL Server",
            SourceSystem::MongoDb => "MongoDB",
            SourceSystem::CsvFiles => "CSV Files",
            SourceSystem::DataLake => "Data Lake",
            SourceSystem::Databricks => "Databricks",
            SourceSystem::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceSystem {
    type Err = String;

    /// Parse a display label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|system| system.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown source system: '{}'", s))
    }
}

/// Namespace, timing and volume details carried by a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDetails {
    pub namespace: String,
    /// Event time of the first event that mentioned the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    /// `namespace/name` of a dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// `None` means the row count was never reported.
    #[serde(default)]
    pub row_count: Option<u64>,
    /// Size in bytes; `None` means never reported.
    #[serde(default)]
    pub size: Option<u64>,
}

/// A job or dataset in the lineage graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub layer: Layer,
    pub source_system: SourceSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default)]
    pub schema_fields: Vec<SchemaField>,
    pub details: NodeDetails,
}

impl LineageNode {
    pub fn is_job(&self) -> bool {
        self.kind == NodeKind::Job
    }

    pub fn is_dataset(&self) -> bool {
        self.kind == NodeKind::Dataset
    }

    pub fn color(&self) -> &'static str {
        self.layer.color()
    }

    pub fn shape(&self) -> &'static str {
        self.layer.shape()
    }
}

/// A directed `source -> target` relationship.
///
/// Dataset -> job edges are inputs, job -> dataset edges are outputs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    pub source: String,
    pub target: String,
}

impl LineageEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_openlineage_event() {
        let json = r#"{
            "eventType": "COMPLETE",
            "eventTime": "2024-03-01T10:00:00Z",
            "run": {"runId": "abc"},
            "job": {"namespace": "data_lakehouse", "name": "source_to_bronze"},
            "inputs": [{
                "namespace": "postgres://prod:5432",
                "name": "public.orders",
                "facets": {"schema": {"fields": [
                    {"name": "order_id", "type": "BIGINT", "description": "key"}
                ]}}
            }],
            "outputs": [{
                "namespace": "s3://lake",
                "name": "bronze/orders",
                "facets": {"outputStatistics": {"rowCount": 250000, "size": 1048576}}
            }]
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.is_complete());
        assert_eq!(event.job_name(), "source_to_bronze");
        assert_eq!(event.run.unwrap().run_id.as_deref(), Some("abc"));
        assert_eq!(event.inputs[0].schema_fields()[0].field_type, "BIGINT");
        assert_eq!(
            event.inputs[0].schema_fields()[0].description.as_deref(),
            Some("key")
        );
        let stats = event.outputs[0].output_statistics().unwrap();
        assert_eq!(stats.row_count, Some(250000));
        assert_eq!(stats.size, Some(1048576));
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let event: Event = serde_json::from_str("{}").unwrap();
        assert_eq!(event.job_name(), UNKNOWN_JOB);
        assert_eq!(event.job_namespace(), "");
        assert_eq!(event.event_time(), NOT_AVAILABLE);
        assert!(event.inputs.is_empty());
        assert!(!event.is_complete());
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let json = r#"{
            "job": {"name": 42, "namespace": null},
            "inputs": "not-a-list",
            "outputs": [{"name": "gold.sales", "facets": {"outputStatistics": {"rowCount": "many"}}}]
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.job_name(), UNKNOWN_JOB);
        assert!(event.inputs.is_empty());
        assert_eq!(event.outputs[0].name(), "gold.sales");
        assert_eq!(event.outputs[0].namespace(), "");
        assert_eq!(
            event.outputs[0].output_statistics().unwrap().row_count,
            None
        );
    }

    #[test]
    fn test_malformed_list_entries_are_skipped() {
        let json = r#"{
            "inputs": [null, "s3://lake/bronze/a", {"namespace": "s3://lake", "name": "bronze/a"}],
            "outputs": [{
                "namespace": "s3://lake",
                "name": "silver/a",
                "facets": {"schema": {"fields": ["junk", 7, {"name": "id", "type": "INT"}]}}
            }]
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.inputs.len(), 1);
        assert_eq!(event.inputs[0].name(), "bronze/a");
        assert_eq!(
            event.outputs[0].schema_fields(),
            &[SchemaField::new("id", "INT")]
        );
    }

    #[test]
    fn test_statistics_accept_any_number() {
        let json = r#"{"rowCount": 1.5e6, "size": 100.0}"#;
        let stats: OutputStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.row_count, Some(1_500_000));
        assert_eq!(stats.size, Some(100));

        let json = r#"{"rowCount": -3, "size": 12.9}"#;
        let stats: OutputStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.row_count, None);
        assert_eq!(stats.size, Some(12));
    }

    #[test]
    fn test_layer_hints() {
        assert_eq!(Layer::Bronze.color(), "#CD7F32");
        assert_eq!(Layer::Source.shape(), "database");
        assert_eq!(Layer::Unknown.shape(), "ellipse");
        assert_eq!(Layer::Job.shape(), "diamond");
        assert_eq!("GOLD".parse::<Layer>().unwrap(), Layer::Gold);
        assert!("platinum".parse::<Layer>().is_err());
    }

    #[test]
    fn test_source_system_labels() {
        assert_eq!(SourceSystem::SqlServer.to_string(), "SQL Server");
        assert_eq!(
            "data lake".parse::<SourceSystem>().unwrap(),
            SourceSystem::DataLake
        );
        assert_eq!(
            serde_json::to_string(&SourceSystem::CsvFiles).unwrap(),
            "\"CSV Files\""
        );
    }
}
