//! Error taxonomy.
//!
//! Mutating operations fail synchronously with one of the typed errors
//! below and leave the store untouched. Translators never fail outright:
//! they accumulate [`Diagnostic`]s next to their (possibly partial) output.

use crate::Handle;
use std::fmt;
use thiserror::Error;

/// Schema registry failures.
///
/// `Inconsistent` is the fatal class: it means the schema table itself is
/// malformed and is only reported while constructing a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IddError {
    #[error("unknown object type: {0}")]
    UnknownType(String),
    #[error("no field {field:?} on {type_name}")]
    UnknownField { type_name: String, field: String },
    #[error("schema table is inconsistent: {0}")]
    Inconsistent(String),
}

/// What a rejected field write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Value kind does not match the declared field kind.
    TypeMismatch,
    /// Choice value is not in the field's legal set.
    IllegalChoice,
    /// Autosize on a field that is not autosizable.
    NotAutosizable,
    /// Autocalculate on a field that is not autocalculatable.
    NotAutocalculatable,
    /// Scalar write aimed at a reference field.
    PointerFieldDirectWrite,
    /// Pointer write aimed at a scalar field.
    NotAPointerField,
    /// Pointer target's type is not in the field's object list.
    IllegalReferenceTarget,
    /// Name contains flat-format delimiters or is empty.
    BadName,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TypeMismatch => "value kind does not match the field kind",
            Self::IllegalChoice => "value is not a legal choice",
            Self::NotAutosizable => "field is not autosizable",
            Self::NotAutocalculatable => "field is not autocalculatable",
            Self::PointerFieldDirectWrite => "reference fields take handles, not scalars",
            Self::NotAPointerField => "field is not a reference field",
            Self::IllegalReferenceTarget => "target type is not allowed for this field",
            Self::BadName => "name is empty or contains format delimiters",
        };
        write!(f, "{text}")
    }
}

/// A field write that violates the schema contract for its field.
///
/// Always local and recoverable: the write is rejected and the record is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{type_name} field {field:?}: {kind} (got {got})")]
pub struct ValidationError {
    pub type_name: String,
    pub field: String,
    pub kind: ValidationKind,
    pub got: String,
}

/// Record store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Idd(#[from] IddError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown handle: {0}")]
    UnknownHandle(Handle),
    #[error("cannot remove {target}: required field {field:?} of {source} still points at it")]
    DanglingRequiredReference {
        target: Handle,
        source: Handle,
        field: String,
    },
}

/// Typed-layer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(
        "schedule {schedule_name:?} is incompatible with {owner_type} field {field:?}: \
         requires {required}, found {found}"
    )]
    IncompatibleSchedule {
        schedule_name: String,
        owner_type: String,
        field: String,
        required: String,
        found: String,
    },
}

impl From<IddError> for ModelError {
    fn from(value: IddError) -> Self {
        Self::Workspace(WorkspaceError::Idd(value))
    }
}

impl From<ValidationError> for ModelError {
    fn from(value: ValidationError) -> Self {
        Self::Workspace(WorkspaceError::Validation(value))
    }
}

/// Severity of a translator diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A problem found while translating one object.
///
/// Attached to the owning object's identity; the translator keeps going,
/// so a partially specified model still produces output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub object_type: String,
    pub object_name: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        object_type: &str,
        object_name: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            object_type: object_type.to_string(),
            object_name: object_name.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn info(object_type: &str, object_name: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, object_type, object_name, message)
    }

    pub fn warning(
        object_type: &str,
        object_name: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, object_type, object_name, message)
    }

    pub fn error(object_type: &str, object_name: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, object_type, object_name, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object_name {
            Some(name) => write!(
                f,
                "[{}] {} {:?}: {}",
                self.severity, self.object_type, name, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.object_type, self.message),
        }
    }
}
