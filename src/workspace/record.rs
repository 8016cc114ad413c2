//! Records and raw field values.

use crate::Handle;
use crate::error::{ValidationError, ValidationKind};
use crate::idd::{FieldDefault, FieldKind, FieldSchema};
use crate::name::validate_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw value stored in one record field.
///
/// Values convert to typed views on demand; `Empty` is the unset sentinel,
/// so reads never have a null to dereference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// No value. The flat format prints a blank token.
    Empty,
    Text(String),
    Integer(i64),
    Real(f64),
    /// Reference to another record by handle.
    Pointer(Handle),
    /// Sizing marker: resolve the number externally.
    Autosize,
    Autocalculate,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric view. Integer fields widen to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<Handle> {
        match self {
            Self::Pointer(h) => Some(*h),
            _ => None,
        }
    }

    pub fn from_default(default: &FieldDefault) -> Self {
        match default {
            FieldDefault::Text(s) => Self::Text(s.clone()),
            FieldDefault::Real(v) => Self::Real(*v),
            FieldDefault::Integer(v) => Self::Integer(*v),
            FieldDefault::Autosize => Self::Autosize,
            FieldDefault::Autocalculate => Self::Autocalculate,
        }
    }

    /// Interprets a flat-format token against a field schema.
    ///
    /// Blank tokens become `Empty`. Numeric fields accept the
    /// case-insensitive `Autosize`/`Autocalculate` literals when the field
    /// is eligible. Choice values are canonicalized to the schema's
    /// casing. Reference fields are not handled here: their tokens are
    /// names, resolved by the translators.
    pub fn parse_scalar(
        field: &FieldSchema,
        type_name: &str,
        token: &str,
    ) -> Result<Self, ValidationError> {
        let token = token.trim();
        let fail = |kind: ValidationKind| ValidationError {
            type_name: type_name.to_string(),
            field: field.label.clone(),
            kind,
            got: token.to_string(),
        };

        if token.is_empty() {
            return Ok(Self::Empty);
        }
        if token.eq_ignore_ascii_case("autosize") {
            return if field.autosizable {
                Ok(Self::Autosize)
            } else {
                Err(fail(ValidationKind::NotAutosizable))
            };
        }
        if token.eq_ignore_ascii_case("autocalculate") {
            return if field.autocalculatable {
                Ok(Self::Autocalculate)
            } else {
                Err(fail(ValidationKind::NotAutocalculatable))
            };
        }

        match &field.kind {
            FieldKind::Text => {
                validate_name(token).map_err(|_| fail(ValidationKind::BadName))?;
                Ok(Self::Text(token.to_string()))
            }
            FieldKind::Real => token
                .parse::<f64>()
                .map(Self::Real)
                .map_err(|_| fail(ValidationKind::TypeMismatch)),
            FieldKind::Integer => token
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| fail(ValidationKind::TypeMismatch)),
            FieldKind::Choice(values) => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(token))
                .map(|v| Self::Text(v.clone()))
                .ok_or_else(|| fail(ValidationKind::IllegalChoice)),
            FieldKind::Reference(_) => Err(fail(ValidationKind::PointerFieldDirectWrite)),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Flat-format token form. Pointer fields print their handle; the
    /// translators substitute the target's name before anything is
    /// persisted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Pointer(h) => write!(f, "{h}"),
            Self::Autosize => write!(f, "Autosize"),
            Self::Autocalculate => write!(f, "Autocalculate"),
        }
    }
}

/// One schema-typed data unit in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub handle: Handle,
    pub type_name: String,
    pub name: Option<String>,
    pub fields: Vec<FieldValue>,
}

impl Record {
    pub(crate) fn new(handle: Handle, type_name: &str, fields: Vec<FieldValue>) -> Self {
        Self {
            handle,
            type_name: type_name.to_string(),
            name: None,
            fields,
        }
    }

    /// Field value by index, `Empty` when out of range.
    pub fn field(&self, index: usize) -> &FieldValue {
        self.fields.get(index).unwrap_or(&FieldValue::Empty)
    }

    /// Name for messages and the flat format; empty string when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idd::FieldSchema;

    #[test]
    fn test_as_double_widens_integers() {
        assert_eq!(FieldValue::Real(1.5).as_double(), Some(1.5));
        assert_eq!(FieldValue::Integer(3).as_double(), Some(3.0));
        assert_eq!(FieldValue::Autosize.as_double(), None);
        assert_eq!(FieldValue::Empty.as_double(), None);
    }

    #[test]
    fn test_parse_scalar_real() {
        let field = FieldSchema::real("Tank Volume");
        let v = FieldValue::parse_scalar(&field, "WaterHeater:Mixed", " 0.15 ").unwrap();
        assert_eq!(v, FieldValue::Real(0.15));

        let err = FieldValue::parse_scalar(&field, "WaterHeater:Mixed", "big").unwrap_err();
        assert_eq!(err.kind, ValidationKind::TypeMismatch);
    }

    #[test]
    fn test_parse_scalar_autosize_gating() {
        let sizable = FieldSchema::real("Heater Capacity").autosizable();
        let plain = FieldSchema::real("Deadband Temperature Difference");

        assert_eq!(
            FieldValue::parse_scalar(&sizable, "WaterHeater:Mixed", "AUTOSIZE").unwrap(),
            FieldValue::Autosize
        );
        let err = FieldValue::parse_scalar(&plain, "WaterHeater:Mixed", "Autosize").unwrap_err();
        assert_eq!(err.kind, ValidationKind::NotAutosizable);
    }

    #[test]
    fn test_parse_scalar_choice_canonicalizes() {
        let field = FieldSchema::choice("Numeric Type", &["Continuous", "Discrete"]);
        let v = FieldValue::parse_scalar(&field, "ScheduleTypeLimits", "continuous").unwrap();
        assert_eq!(v, FieldValue::Text("Continuous".to_string()));

        let err = FieldValue::parse_scalar(&field, "ScheduleTypeLimits", "Fuzzy").unwrap_err();
        assert_eq!(err.kind, ValidationKind::IllegalChoice);
    }

    #[test]
    fn test_parse_scalar_blank_is_empty() {
        let field = FieldSchema::real("Tank Volume");
        let v = FieldValue::parse_scalar(&field, "WaterHeater:Mixed", "   ").unwrap();
        assert_eq!(v, FieldValue::Empty);
    }

    #[test]
    fn test_display_tokens() {
        assert_eq!(FieldValue::Empty.to_string(), "");
        assert_eq!(FieldValue::Real(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Integer(4).to_string(), "4");
        assert_eq!(FieldValue::Autosize.to_string(), "Autosize");
        assert_eq!(FieldValue::Text("Continuous".into()).to_string(), "Continuous");
    }

    #[test]
    fn test_record_field_out_of_range_is_empty() {
        let rec = Record::new(Handle::new(), "Zone", vec![FieldValue::Real(1.0)]);
        assert_eq!(rec.field(0), &FieldValue::Real(1.0));
        assert_eq!(rec.field(10), &FieldValue::Empty);
    }
}
