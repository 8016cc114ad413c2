//! Forward translation: typed records to the flat text format.
//!
//! Prints one flat object per record, names standing in for handles. A
//! referenced record lands in the document before its first referrer, so
//! readers meet definitions before uses; only inside a reference cycle
//! must some record come first. Problems surface as [`Diagnostic`]s and
//! never abort the pass.

use std::collections::HashMap;

use crate::Handle;
use crate::error::Diagnostic;
use crate::io::idf::{IdfDocument, IdfObject};
use crate::model::Model;
use crate::workspace::{FieldValue, Workspace};

/// Output of a forward pass: the document plus any problems found on the
/// way. An empty diagnostics list means the document is a faithful print
/// of the records.
#[derive(Debug, Default)]
pub struct Translation {
    pub document: IdfDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Translates a whole model in record creation order.
pub fn translate_model(model: &Model) -> Translation {
    translate_records(model.workspace(), model.workspace().handles())
}

/// Translates the given records plus, transitively, everything they
/// reference. Shared targets are printed once.
pub fn translate_objects(model: &Model, handles: &[Handle]) -> Translation {
    translate_records(model.workspace(), handles)
}

fn translate_records(workspace: &Workspace, handles: &[Handle]) -> Translation {
    let mut pass = ForwardPass {
        workspace,
        document: IdfDocument::new(),
        diagnostics: Vec::new(),
        emitted: HashMap::new(),
    };
    for &handle in handles {
        if pass.emitted.contains_key(&handle) {
            continue;
        }
        pass.emit(handle);
        if !pass.emitted.contains_key(&handle) {
            pass.diagnostics.push(Diagnostic::warning(
                "Workspace",
                None,
                format!("skipped {handle}: no record with this handle"),
            ));
        }
    }
    Translation {
        document: pass.document,
        diagnostics: pass.diagnostics,
    }
}

struct ForwardPass<'a> {
    workspace: &'a Workspace,
    document: IdfDocument,
    diagnostics: Vec<Diagnostic>,
    /// Handle to assigned output name, `None` for unnamed types. An entry
    /// exists for every record already printed (or being printed).
    emitted: HashMap<Handle, Option<String>>,
}

impl ForwardPass<'_> {
    /// Prints one record, pulling unprinted reference targets in first,
    /// and returns the name referrers should use for it.
    fn emit(&mut self, handle: Handle) -> Option<String> {
        if let Some(name) = self.emitted.get(&handle) {
            return name.clone();
        }
        let workspace = self.workspace;
        let record = workspace.record(handle)?;
        let schema = match workspace.registry().lookup(&record.type_name) {
            Ok(schema) => schema,
            Err(err) => {
                self.diagnostics.push(Diagnostic::error(
                    &record.type_name,
                    record.name.as_deref(),
                    err.to_string(),
                ));
                self.emitted.insert(handle, None);
                return None;
            }
        };

        // The memo entry is written before the fields are walked, so a
        // reference cycle terminates and a shared target prints once.
        self.emitted.insert(handle, record.name.clone());

        let mut object = IdfObject::new(&record.type_name);
        if schema.has_name {
            object.push_labeled(record.display_name(), "Name");
        }
        for (index, field) in schema.fields.iter().enumerate() {
            match record.field(index) {
                FieldValue::Pointer(target) => match self.emit(*target) {
                    Some(name) => object.push_labeled(name, &field.label),
                    None => {
                        object.push_labeled("", &field.label);
                        self.diagnostics.push(Diagnostic::error(
                            &record.type_name,
                            record.name.as_deref(),
                            format!(
                                "field {:?} points at a record that no longer exists",
                                field.label
                            ),
                        ));
                    }
                },
                FieldValue::Empty => {
                    object.push_labeled("", &field.label);
                    if field.required {
                        self.diagnostics.push(Diagnostic::warning(
                            &record.type_name,
                            record.name.as_deref(),
                            format!("required field {:?} has no value", field.label),
                        ));
                    }
                }
                value => object.push_labeled(value.to_string(), &field.label),
            }
        }
        self.document.objects.push(object);
        record.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::idd::catalog;
    use crate::model::{CoilCoolingDxSingleSpeed, Model, ModelObject, WaterHeaterMixed};
    use anyhow::Result;

    #[test]
    fn test_referenced_records_precede_their_referrer() -> Result<()> {
        let mut model = Model::new();
        CoilCoolingDxSingleSpeed::create(&mut model)?;

        let translation = translate_model(&model);
        assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

        let types: Vec<&str> = translation
            .document
            .objects
            .iter()
            .map(|o| o.type_name.as_str())
            .collect();
        assert_eq!(types.first(), Some(&catalog::VERSION));
        assert_eq!(translation.document.len(), 5);

        let coil = types
            .iter()
            .position(|t| *t == catalog::COIL_COOLING_DX_SINGLE_SPEED)
            .unwrap();
        for (idx, t) in types.iter().enumerate() {
            if *t == catalog::CURVE_BIQUADRATIC || *t == catalog::CURVE_QUADRATIC {
                assert!(idx < coil, "curve at {idx} should precede the coil at {coil}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_shared_target_is_printed_once() -> Result<()> {
        let mut model = Model::new();
        let curve_index = model
            .workspace()
            .registry()
            .field_index(
                catalog::COIL_COOLING_DX_SINGLE_SPEED,
                "Total Cooling Capacity Function of Temperature Curve Name",
            )
            .unwrap();

        let ws = model.workspace_mut();
        let curve = ws.create(catalog::CURVE_BIQUADRATIC)?;
        ws.set_name(curve, "Shared Cap-FT")?;
        for coefficient in 0..10 {
            ws.set_field(curve, coefficient, FieldValue::Real(1.0))?;
        }
        let first = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let second = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        ws.set_pointer(first, curve_index, Some(curve))?;
        ws.set_pointer(second, curve_index, Some(curve))?;

        let translation = translate_objects(&model, &[first, second]);
        assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);
        assert_eq!(translation.document.len(), 3);

        let objects = &translation.document.objects;
        assert_eq!(objects[0].type_name, catalog::CURVE_BIQUADRATIC);
        assert_eq!(objects[0].value(0), "Shared Cap-FT");
        // Both coils name the same curve; position 0 is the coil name.
        assert_eq!(objects[1].value(1 + curve_index), "Shared Cap-FT");
        assert_eq!(objects[2].value(1 + curve_index), "Shared Cap-FT");
        Ok(())
    }

    #[test]
    fn test_autosize_blank_and_required_blank_tokens() -> Result<()> {
        let mut model = Model::new();
        let heater = WaterHeaterMixed::create(&mut model)?;
        heater.set_name(&mut model, "Heater")?;

        let translation = translate_objects(&model, &[heater.handle()]);
        let object = &translation.document.objects[0];
        assert_eq!(object.type_name, catalog::WATER_HEATER_MIXED);
        assert_eq!(object.value(0), "Heater");
        assert_eq!(object.value(1), "Autosize"); // tank volume
        assert_eq!(object.value(2), ""); // setpoint schedule, unset
        assert_eq!(object.value(3), "2"); // deadband default
        assert_eq!(object.value(4), ""); // maximum temperature limit

        // The unset required schedule is reported but still printed blank.
        assert_eq!(translation.diagnostics.len(), 1);
        let diagnostic = &translation.diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.object_type, catalog::WATER_HEATER_MIXED);
        assert!(diagnostic.message.contains("Setpoint Temperature Schedule Name"));
        Ok(())
    }

    #[test]
    fn test_removed_handle_is_skipped_with_a_warning() -> Result<()> {
        let mut model = Model::new();
        let zone = model.workspace_mut().create(catalog::ZONE)?;
        model.workspace_mut().remove(zone)?;

        let translation = translate_objects(&model, &[zone]);
        assert!(translation.document.is_empty());
        assert_eq!(translation.diagnostics.len(), 1);
        assert_eq!(translation.diagnostics[0].severity, Severity::Warning);
        Ok(())
    }

    #[test]
    fn test_labels_follow_the_schema() -> Result<()> {
        let mut model = Model::new();
        let translation = translate_model(&model);

        let version = &translation.document.objects[0];
        assert_eq!(version.type_name, catalog::VERSION);
        assert_eq!(version.value(0), catalog::VERSION_IDENTIFIER);
        assert_eq!(version.fields[0].label, "Version Identifier");
        Ok(())
    }
}
