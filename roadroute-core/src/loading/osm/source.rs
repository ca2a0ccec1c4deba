//! Record sources feeding the two-pass ingestion.
//!
//! A source must be able to replay its records from the beginning: ingestion
//! scans ways first and nodes second, and both scans have to see the same data.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use osmpbf::{Element, ElementReader};

use crate::{
    Error,
    model::{NodeId, OsmRecord, WayId},
};

/// Kind of record a scan is interested in.
///
/// Sources may use it to skip decoding records that the caller would discard
/// anyway, but are free to hand over everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Node,
    Way,
}

impl RecordKind {
    pub fn matches(self, record: &OsmRecord) -> bool {
        matches!(
            (self, record),
            (RecordKind::Node, OsmRecord::Node { .. }) | (RecordKind::Way, OsmRecord::Way { .. })
        )
    }
}

pub trait RecordSource {
    /// Visits the records of the source, starting from the first one.
    ///
    /// Every call must produce the same records in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or the source
    /// cannot be restarted.
    fn scan(&self, kind: RecordKind, visit: &mut dyn FnMut(OsmRecord)) -> Result<(), Error>;
}

/// `.osm.pbf` file decoded with `osmpbf`. The file is reopened on every scan.
#[derive(Debug, Clone)]
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for PbfSource {
    fn scan(&self, kind: RecordKind, visit: &mut dyn FnMut(OsmRecord)) -> Result<(), Error> {
        let reader = ElementReader::from_path(&self.path)?;

        reader.for_each(|element| match (kind, element) {
            (RecordKind::Node, Element::Node(node)) => visit(OsmRecord::Node {
                id: NodeId(node.id()),
                lat: Some(node.lat()),
                lon: Some(node.lon()),
            }),
            (RecordKind::Node, Element::DenseNode(node)) => visit(OsmRecord::Node {
                id: NodeId(node.id()),
                lat: Some(node.lat()),
                lon: Some(node.lon()),
            }),
            (RecordKind::Way, Element::Way(way)) => visit(OsmRecord::Way {
                id: WayId(way.id()),
                refs: way.refs().map(NodeId).collect(),
            }),
            _ => {}
        })?;

        Ok(())
    }
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<OsmRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<OsmRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<OsmRecord>> for MemorySource {
    fn from(records: Vec<OsmRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<OsmRecord> for MemorySource {
    fn from_iter<T: IntoIterator<Item = OsmRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RecordSource for MemorySource {
    fn scan(&self, kind: RecordKind, visit: &mut dyn FnMut(OsmRecord)) -> Result<(), Error> {
        self.records
            .iter()
            .filter(|record| kind.matches(record))
            .cloned()
            .for_each(visit);
        Ok(())
    }
}

/// Stream that can only be consumed once.
///
/// The first scan drains the wrapped iterator, every later scan fails with
/// [`Error::StreamNotReplayable`].
pub struct OneShotSource<I> {
    records: RefCell<Option<I>>,
}

impl<I> OneShotSource<I>
where
    I: Iterator<Item = OsmRecord>,
{
    pub fn new(records: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            records: RefCell::new(Some(records.into_iter())),
        }
    }
}

impl<I> RecordSource for OneShotSource<I>
where
    I: Iterator<Item = OsmRecord>,
{
    fn scan(&self, kind: RecordKind, visit: &mut dyn FnMut(OsmRecord)) -> Result<(), Error> {
        let records = self
            .records
            .borrow_mut()
            .take()
            .ok_or(Error::StreamNotReplayable)?;
        records.filter(|record| kind.matches(record)).for_each(visit);
        Ok(())
    }
}
