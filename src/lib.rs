pub mod error;
mod handle;
pub mod idd;
pub mod io;
pub mod model;
mod name;
pub mod translator;
pub mod workspace;

// Prelude
pub use error::{Diagnostic, IddError, ModelError, Severity, ValidationError, WorkspaceError};
pub use handle::Handle;
pub use idd::{FieldSchema, IddRegistry, ObjectSchema, catalog};
pub use io::idf::{IdfDocument, IdfObject};
pub use model::{Model, ModelObject};
pub use translator::{
    ReverseTranslation, Translation, translate_document, translate_model, translate_objects,
};
pub use workspace::{FieldValue, Record, Workspace};
