//! IDD-like schema registry.
//!
//! Describes, for every object type, the ordered field list with declared
//! kinds, defaults and constraints. The registry is loaded once, validated
//! against itself, and read-only afterwards, so it can be shared behind an
//! `Arc` across anything that consults it.
//!
//! Type names and field labels are matched case-insensitively everywhere.

pub mod catalog;

use crate::error::IddError;
use std::collections::{HashMap, HashSet};

/// Declared kind of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Floating point number.
    Real,
    /// Integer number.
    Integer,
    /// One of an enumerated set of strings.
    Choice(Vec<String>),
    /// Reference to another record: a handle at runtime, a name in the
    /// flat format. The object list holds the legal target types.
    Reference(Vec<String>),
}

impl FieldKind {
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Real | Self::Integer)
    }
}

/// Default value a field starts out with.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    Text(String),
    Real(f64),
    Integer(i64),
    Autosize,
    Autocalculate,
}

/// Schema for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<FieldDefault>,
    /// Required for emission: the engine rejects input where this field is
    /// blank, and removing the target of a required reference needs force.
    pub required: bool,
    pub autosizable: bool,
    pub autocalculatable: bool,
    /// Unit string for numeric fields, e.g. "m3" or "W".
    pub units: Option<String>,
    /// Reference fields only: the target's life cycle is bound to the
    /// owner (deep-cloned with it, removed with it).
    pub owned: bool,
}

impl FieldSchema {
    fn new(label: &str, kind: FieldKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
            default: None,
            required: false,
            autosizable: false,
            autocalculatable: false,
            units: None,
            owned: false,
        }
    }

    pub fn text(label: &str) -> Self {
        Self::new(label, FieldKind::Text)
    }

    pub fn real(label: &str) -> Self {
        Self::new(label, FieldKind::Real)
    }

    pub fn integer(label: &str) -> Self {
        Self::new(label, FieldKind::Integer)
    }

    pub fn choice(label: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        Self::new(label, FieldKind::Choice(values))
    }

    pub fn reference(label: &str, object_list: &[&str]) -> Self {
        let targets = object_list.iter().map(|t| t.to_string()).collect();
        Self::new(label, FieldKind::Reference(targets))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn autosizable(mut self) -> Self {
        self.autosizable = true;
        self
    }

    pub fn autocalculatable(mut self) -> Self {
        self.autocalculatable = true;
        self
    }

    pub fn owned(mut self) -> Self {
        self.owned = true;
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    pub fn default_text(mut self, value: &str) -> Self {
        self.default = Some(FieldDefault::Text(value.to_string()));
        self
    }

    pub fn default_real(mut self, value: f64) -> Self {
        self.default = Some(FieldDefault::Real(value));
        self
    }

    pub fn default_integer(mut self, value: i64) -> Self {
        self.default = Some(FieldDefault::Integer(value));
        self
    }

    pub fn default_autosize(mut self) -> Self {
        self.default = Some(FieldDefault::Autosize);
        self
    }

    pub fn default_autocalculate(mut self) -> Self {
        self.default = Some(FieldDefault::Autocalculate);
        self
    }

    /// Legal choice values, empty for non-choice fields.
    pub fn choices(&self) -> &[String] {
        match &self.kind {
            FieldKind::Choice(values) => values,
            _ => &[],
        }
    }

    /// Legal reference target types, empty for non-reference fields.
    pub fn object_list(&self) -> &[String] {
        match &self.kind {
            FieldKind::Reference(targets) => targets,
            _ => &[],
        }
    }
}

/// Schema for one object type: a name plus the ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub type_name: String,
    /// Whether records of this type carry a name used for cross-references.
    /// Bookkeeping types like `Version` do not.
    pub has_name: bool,
    pub fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    pub fn new(type_name: &str, fields: Vec<FieldSchema>) -> Self {
        Self {
            type_name: type_name.to_string(),
            has_name: true,
            fields,
        }
    }

    /// Marks the type as unnamed (no cross-reference name field).
    pub fn unnamed(mut self) -> Self {
        self.has_name = false;
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Case-insensitive field lookup by label.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.label.eq_ignore_ascii_case(label.trim()))
    }

    /// Base string for generated default names, e.g. `Curve Biquadratic`.
    pub fn default_name_base(&self) -> String {
        self.type_name.replace(':', " ")
    }
}

/// Read-only lookup service over a validated schema table.
#[derive(Debug)]
pub struct IddRegistry {
    objects: Vec<ObjectSchema>,
    by_name: HashMap<String, usize>,
}

impl IddRegistry {
    /// Builds a registry, validating the table itself.
    ///
    /// Duplicate type names, duplicate field labels within a type, empty
    /// choice or object lists, ownership flags on non-reference fields and
    /// defaults that contradict their field's declaration are all fatal
    /// here; a registry that constructs successfully never produces such
    /// inconsistencies later.
    pub fn new(objects: Vec<ObjectSchema>) -> Result<Self, IddError> {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (idx, object) in objects.iter().enumerate() {
            let key = object.type_name.to_ascii_lowercase();
            if by_name.insert(key, idx).is_some() {
                return Err(IddError::Inconsistent(format!(
                    "duplicate object type: {}",
                    object.type_name
                )));
            }
            Self::check_fields(object)?;
        }
        Ok(Self { objects, by_name })
    }

    fn check_fields(object: &ObjectSchema) -> Result<(), IddError> {
        let mut labels: HashSet<String> = HashSet::new();
        for field in &object.fields {
            if !labels.insert(field.label.to_ascii_lowercase()) {
                return Err(IddError::Inconsistent(format!(
                    "duplicate field {:?} on {}",
                    field.label, object.type_name
                )));
            }
            match &field.kind {
                FieldKind::Choice(values) if values.is_empty() => {
                    return Err(IddError::Inconsistent(format!(
                        "choice field {:?} on {} has no legal values",
                        field.label, object.type_name
                    )));
                }
                FieldKind::Reference(targets) if targets.is_empty() => {
                    return Err(IddError::Inconsistent(format!(
                        "reference field {:?} on {} has an empty object list",
                        field.label, object.type_name
                    )));
                }
                _ => {}
            }
            if field.owned && !field.kind.is_reference() {
                return Err(IddError::Inconsistent(format!(
                    "non-reference field {:?} on {} is marked owned",
                    field.label, object.type_name
                )));
            }
            if (field.autosizable || field.autocalculatable) && !field.kind.is_numeric() {
                return Err(IddError::Inconsistent(format!(
                    "non-numeric field {:?} on {} is marked autosizable",
                    field.label, object.type_name
                )));
            }
            Self::check_default(object, field)?;
        }
        Ok(())
    }

    fn check_default(object: &ObjectSchema, field: &FieldSchema) -> Result<(), IddError> {
        let ok = match (&field.default, &field.kind) {
            (None, _) => true,
            (Some(FieldDefault::Text(value)), FieldKind::Text) => !value.is_empty(),
            (Some(FieldDefault::Text(value)), FieldKind::Choice(values)) => {
                values.iter().any(|v| v.eq_ignore_ascii_case(value))
            }
            (Some(FieldDefault::Real(_)), FieldKind::Real) => true,
            (Some(FieldDefault::Integer(_)), FieldKind::Integer) => true,
            (Some(FieldDefault::Autosize), _) => field.autosizable,
            (Some(FieldDefault::Autocalculate), _) => field.autocalculatable,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(IddError::Inconsistent(format!(
                "default of field {:?} on {} contradicts its declaration",
                field.label, object.type_name
            )))
        }
    }

    /// Looks up the schema for a type.
    pub fn lookup(&self, type_name: &str) -> Result<&ObjectSchema, IddError> {
        self.by_name
            .get(&type_name.trim().to_ascii_lowercase())
            .map(|&idx| &self.objects[idx])
            .ok_or_else(|| IddError::UnknownType(type_name.trim().to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name
            .contains_key(&type_name.trim().to_ascii_lowercase())
    }

    /// Index of a field by label, case-insensitively.
    pub fn field_index(&self, type_name: &str, label: &str) -> Result<usize, IddError> {
        let object = self.lookup(type_name)?;
        object.field_index(label).ok_or_else(|| IddError::UnknownField {
            type_name: object.type_name.clone(),
            field: label.to_string(),
        })
    }

    /// Field schema by index.
    pub fn field(&self, type_name: &str, index: usize) -> Result<&FieldSchema, IddError> {
        let object = self.lookup(type_name)?;
        object.fields.get(index).ok_or_else(|| IddError::UnknownField {
            type_name: object.type_name.clone(),
            field: format!("#{index}"),
        })
    }

    /// Legal values of a choice field; empty for other field kinds.
    pub fn legal_values(&self, type_name: &str, index: usize) -> Result<&[String], IddError> {
        Ok(self.field(type_name, index)?.choices())
    }

    pub fn is_autosizable(&self, type_name: &str, index: usize) -> Result<bool, IddError> {
        Ok(self.field(type_name, index)?.autosizable)
    }

    pub fn is_autocalculatable(&self, type_name: &str, index: usize) -> Result<bool, IddError> {
        Ok(self.field(type_name, index)?.autocalculatable)
    }

    /// All registered object schemas, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &ObjectSchema> {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> Vec<ObjectSchema> {
        vec![
            ObjectSchema::new(
                "Widget",
                vec![
                    FieldSchema::real("Rated Power").units("W").default_real(100.0),
                    FieldSchema::choice("Mode", &["On", "Off"]).default_text("On"),
                    FieldSchema::reference("Parent Widget Name", &["Widget"]),
                ],
            ),
            ObjectSchema::new("Gadget", vec![FieldSchema::integer("Count").default_integer(1)]),
        ]
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = IddRegistry::new(small_table()).unwrap();
        assert_eq!(registry.lookup("widget").unwrap().type_name, "Widget");
        assert_eq!(registry.lookup(" WIDGET ").unwrap().type_name, "Widget");
        assert!(matches!(
            registry.lookup("NoSuchThing"),
            Err(IddError::UnknownType(_))
        ));
    }

    #[test]
    fn test_field_index_is_case_insensitive() {
        let registry = IddRegistry::new(small_table()).unwrap();
        assert_eq!(registry.field_index("Widget", "rated power").unwrap(), 0);
        assert_eq!(registry.field_index("Widget", "MODE").unwrap(), 1);
        assert!(matches!(
            registry.field_index("Widget", "Bogus"),
            Err(IddError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_field_out_of_range() {
        let registry = IddRegistry::new(small_table()).unwrap();
        assert!(matches!(
            registry.field("Gadget", 5),
            Err(IddError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_legal_values() {
        let registry = IddRegistry::new(small_table()).unwrap();
        assert_eq!(registry.legal_values("Widget", 1).unwrap(), &["On", "Off"]);
        // Non-choice fields report an empty set rather than failing.
        assert!(registry.legal_values("Widget", 0).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut table = small_table();
        table.push(ObjectSchema::new("widget", vec![]));
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::real("Power"), FieldSchema::text("power")],
        )];
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_empty_choice_list_rejected() {
        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::choice("Mode", &[])],
        )];
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_owned_scalar_rejected() {
        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::real("Power").owned()],
        )];
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_autosize_default_needs_autosizable() {
        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::real("Power").default_autosize()],
        )];
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));

        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::real("Power").autosizable().default_autosize()],
        )];
        assert!(IddRegistry::new(table).is_ok());
    }

    #[test]
    fn test_choice_default_must_be_legal() {
        let table = vec![ObjectSchema::new(
            "Widget",
            vec![FieldSchema::choice("Mode", &["On", "Off"]).default_text("Maybe")],
        )];
        assert!(matches!(
            IddRegistry::new(table),
            Err(IddError::Inconsistent(_))
        ));
    }
}
