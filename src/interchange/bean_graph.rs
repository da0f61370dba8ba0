//! JSON and YAML storage for bean-graph snapshots.
//!
//! Both formats share one kebab-case shape:
//!
//! ```yaml
//! schema-type-mappings:
//!   - schema-type-name: Address
//!     schema-type-namespace: http://example.com/po
//!     java-type: po.Address
//!     bean: true
//! ```

use std::path::Path;

use tracing::debug;

use super::SnapshotFormat;
use crate::beans::BeanGraph;
use crate::error::{Result, SchemaError};

/// JSON snapshot format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl SnapshotFormat for Json {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, input: &[u8]) -> Result<BeanGraph> {
        serde_json::from_slice(input)
            .map_err(|e| SchemaError::serialization(format!("JSON parse error: {e}")))
    }

    fn write(&self, graph: &BeanGraph) -> Result<Vec<u8>> {
        let mut output = serde_json::to_vec_pretty(graph)
            .map_err(|e| SchemaError::serialization(format!("JSON serialization error: {e}")))?;
        output.push(b'\n');
        Ok(output)
    }
}

/// YAML snapshot format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl SnapshotFormat for Yaml {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn read(&self, input: &[u8]) -> Result<BeanGraph> {
        serde_yaml::from_slice(input)
            .map_err(|e| SchemaError::serialization(format!("YAML parse error: {e}")))
    }

    fn write(&self, graph: &BeanGraph) -> Result<Vec<u8>> {
        serde_yaml::to_string(graph)
            .map(String::into_bytes)
            .map_err(|e| SchemaError::serialization(format!("YAML serialization error: {e}")))
    }
}

/// Detect the snapshot format from a file extension.
pub fn detect_format(path: &Path) -> Option<Box<dyn SnapshotFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "json" => Some(Box::new(Json)),
        "yaml" | "yml" => Some(Box::new(Yaml)),
        _ => None,
    }
}

fn format_for(path: &Path) -> Result<Box<dyn SnapshotFormat>> {
    detect_format(path).ok_or_else(|| {
        SchemaError::serialization(format!(
            "no snapshot format for '{}'",
            path.display()
        ))
    })
}

/// Read a snapshot, picking the format from the file extension.
pub fn read_bean_graph(path: &Path) -> Result<BeanGraph> {
    let format = format_for(path)?;
    let bytes = std::fs::read(path)?;
    let graph = format.read(&bytes)?;
    debug!(
        path = %path.display(),
        format = format.name(),
        mappings = graph.mappings().len(),
        "read bean graph"
    );
    Ok(graph)
}

/// Write a snapshot, picking the format from the file extension.
pub fn write_bean_graph(path: &Path, graph: &BeanGraph) -> Result<()> {
    let format = format_for(path)?;
    std::fs::write(path, format.write(graph)?)?;
    debug!(path = %path.display(), format = format.name(), "wrote bean graph");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::beans::SchemaTypeMapping;

    fn sample() -> BeanGraph {
        let mut graph = BeanGraph::new();
        graph.push(SchemaTypeMapping {
            root: true,
            bean: true,
            ..SchemaTypeMapping::new("PurchaseOrder", "po.PurchaseOrder")
                .with_namespace("http://example.com/po")
        });
        graph.push(SchemaTypeMapping {
            can_be_empty: true,
            ..SchemaTypeMapping::new("flag", "boolean")
        });
        graph
    }

    #[test]
    fn test_json_uses_kebab_case_keys() {
        let text = String::from_utf8(Json.write(&sample()).unwrap()).unwrap();
        assert!(text.contains("\"schema-type-mappings\""));
        assert!(text.contains("\"java-type\": \"po.PurchaseOrder\""));
        assert!(text.contains("\"can-be-empty\": true"));
    }

    #[test]
    fn test_yaml_reads_with_defaults() {
        let input = b"schema-type-mappings:\n  - schema-type-name: Note\n    java-type: java.lang.String\n";
        let graph = Yaml.read(input).unwrap();
        let note = graph.find("Note").unwrap();
        assert!(!note.bean);
        assert!(note.schema_type_namespace.is_none());
    }

    #[test]
    fn test_malformed_input_is_serialization_error() {
        let err = Json.read(b"{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::Serialization(_)));
    }

    #[test]
    fn test_file_round_trip_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["graph.json", "graph.yaml"] {
            let path = dir.path().join(file);
            write_bean_graph(&path, &sample()).unwrap();
            assert_eq!(read_bean_graph(&path).unwrap(), sample());
        }
        let err = write_bean_graph(&dir.path().join("graph.txt"), &sample()).unwrap_err();
        assert!(matches!(err, SchemaError::Serialization(_)));
    }
}
