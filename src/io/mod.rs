//! File I/O for model input.
//!
//! This module provides functions for reading and writing the flat text
//! input format and the native JSON snapshot format.

pub mod idf;
pub mod snapshot;

pub use idf::{IdfDocument, IdfField, IdfObject, from_idf_string, read_idf, to_idf_string, write_idf};
pub use snapshot::{read_snapshot, write_snapshot};
