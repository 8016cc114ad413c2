//! Post-run synchronization of autosized values.
//!
//! After a simulation run the engine reports the numeric value it chose
//! for every field left at its autosize or autocalculate marker. The
//! report addresses fields by object name and field label, the same way
//! the persisted format does.

use std::collections::HashMap;

use super::Model;
use crate::error::Diagnostic;
use crate::workspace::FieldValue;

/// One resolved value from the engine's sizing output.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingValue {
    pub value: f64,
    pub units: Option<String>,
}

/// Resolved sizing values keyed by object name and field label.
#[derive(Debug, Clone, Default)]
pub struct SizingReport {
    entries: HashMap<(String, String), SizingValue>,
}

fn report_key(object_name: &str, field_label: &str) -> (String, String) {
    (
        object_name.trim().to_lowercase(),
        field_label.trim().to_lowercase(),
    )
}

impl SizingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a resolved value. A later entry for the same object and
    /// field replaces the earlier one.
    pub fn insert(
        &mut self,
        object_name: &str,
        field_label: &str,
        value: f64,
        units: Option<&str>,
    ) {
        self.entries.insert(
            report_key(object_name, field_label),
            SizingValue {
                value,
                units: units.map(str::to_string),
            },
        );
    }

    pub fn get(&self, object_name: &str, field_label: &str) -> Option<&SizingValue> {
        self.entries.get(&report_key(object_name, field_label))
    }
}

/// Writes resolved sizing values back into the model.
///
/// Every field currently holding an autosize or autocalculate marker is
/// looked up in the report under the owning object's name and the
/// field's label. A matching entry replaces the marker with its number;
/// fields without an entry keep the marker. An entry whose units
/// disagree with the schema's declared units is skipped with a warning,
/// as is a value the field rejects.
pub fn apply_sizing_values(model: &mut Model, report: &SizingReport) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut updates = Vec::new();

    let ws = model.workspace();
    for record in ws.iter() {
        // Unnamed records are not addressable by the report.
        let Some(name) = record.name.as_deref() else {
            continue;
        };
        let Ok(schema) = ws.registry().lookup(&record.type_name) else {
            continue;
        };
        for (index, value) in record.fields.iter().enumerate() {
            if !matches!(value, FieldValue::Autosize | FieldValue::Autocalculate) {
                continue;
            }
            let field = &schema.fields[index];
            let Some(entry) = report.get(name, &field.label) else {
                continue;
            };
            if let (Some(expected), Some(got)) = (field.units.as_deref(), entry.units.as_deref())
                && !expected.eq_ignore_ascii_case(got)
            {
                diagnostics.push(Diagnostic::warning(
                    &record.type_name,
                    Some(name),
                    format!(
                        "sizing value for field {:?} reports units {:?}, expected {:?}",
                        field.label, got, expected
                    ),
                ));
                continue;
            }
            updates.push((
                record.handle,
                index,
                entry.value,
                record.type_name.clone(),
                name.to_string(),
                field.label.clone(),
            ));
        }
    }

    for (handle, index, value, type_name, name, label) in updates {
        if let Err(err) = model
            .workspace_mut()
            .set_field(handle, index, FieldValue::Real(value))
        {
            diagnostics.push(Diagnostic::warning(
                &type_name,
                Some(&name),
                format!("sizing value {value} rejected for field {label:?}: {err}"),
            ));
        }
    }
    diagnostics
}
