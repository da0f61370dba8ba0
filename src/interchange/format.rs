//! Common trait for bean-graph snapshot formats.

use crate::beans::BeanGraph;
use crate::error::Result;

/// A file format bean-graph snapshots can be stored in.
///
/// Snapshots written by one run are read back by later runs so types
/// that were already generated are mapped instead of generated again.
pub trait SnapshotFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    fn read(&self, input: &[u8]) -> Result<BeanGraph>;

    fn write(&self, graph: &BeanGraph) -> Result<Vec<u8>>;
}
