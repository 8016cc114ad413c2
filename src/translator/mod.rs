//! Bidirectional translation between typed records and the flat format.
//!
//! [`forward`] prints records as flat objects with names in place of
//! handles; [`reverse`] parses them back, rebuilding handles from names.
//! Both directions report problems as diagnostics instead of failing, so
//! imperfect input still yields the best output available.

pub mod forward;
pub mod reverse;

pub use forward::{Translation, translate_model, translate_objects};
pub use reverse::{ReverseTranslation, translate_document};
