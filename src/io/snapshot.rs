//! Native JSON snapshot I/O.
//!
//! The snapshot is the lossless sibling of the flat format: records are
//! serialized with their handles, so pointer fields survive a round trip
//! bit-for-bit and nothing has to be re-resolved by name. Loading rebuilds
//! the derived indices and runs the full integrity audit before handing
//! the store back.

use crate::idd::IddRegistry;
use crate::workspace::{Record, Workspace};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    snapshot_version: u32,
    records: Vec<Record>,
}

/// Writes a store to a snapshot (JSON) file.
pub fn write_snapshot(path: &Path, workspace: &Workspace) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let snapshot = Snapshot {
        snapshot_version: SNAPSHOT_VERSION,
        records: workspace.iter().cloned().collect(),
    };
    serde_json::to_writer_pretty(writer, &snapshot)
        .with_context(|| format!("Failed to serialize snapshot to: {}", path.display()))?;

    Ok(())
}

/// Reads a store from a snapshot (JSON) file.
///
/// The registry must describe every type the snapshot contains; records
/// are checked against it and against each other before the store is
/// returned.
pub fn read_snapshot(path: &Path, registry: Arc<IddRegistry>) -> Result<Workspace> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let snapshot: Snapshot = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize snapshot from: {}", path.display()))?;

    restore(snapshot, registry)
        .with_context(|| format!("Failed to restore snapshot from: {}", path.display()))
}

/// Serializes a store to a snapshot JSON string.
pub fn to_snapshot_string(workspace: &Workspace) -> Result<String> {
    let snapshot = Snapshot {
        snapshot_version: SNAPSHOT_VERSION,
        records: workspace.iter().cloned().collect(),
    };
    serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot to string")
}

/// Deserializes a store from a snapshot JSON string.
pub fn from_snapshot_string(json: &str, registry: Arc<IddRegistry>) -> Result<Workspace> {
    let snapshot: Snapshot =
        serde_json::from_str(json).context("Failed to deserialize snapshot from string")?;
    restore(snapshot, registry)
}

fn restore(snapshot: Snapshot, registry: Arc<IddRegistry>) -> Result<Workspace> {
    if snapshot.snapshot_version != SNAPSHOT_VERSION {
        anyhow::bail!("unsupported snapshot version {}", snapshot.snapshot_version);
    }
    Workspace::from_records(registry, snapshot.records)
}
