//! Reverse translation: flat documents to typed records.
//!
//! Rebuilds a model from a parsed document. Name tokens become handles
//! again: when a reference names an object later in the file, conversion
//! recurses into the target first, so file order never matters. Records
//! convert at most once; a reference that reaches a record already being
//! converted closes a cycle and is left unset instead of looping. As in
//! the forward direction, problems become [`Diagnostic`]s and the pass
//! always finishes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Handle;
use crate::error::Diagnostic;
use crate::idd::{FieldSchema, IddRegistry, ObjectSchema};
use crate::io::idf::IdfDocument;
use crate::model::{Model, ScheduleTypeRegistry};
use crate::workspace::FieldValue;

/// Output of a reverse pass: a fresh model built from the document, plus
/// any problems found on the way.
#[derive(Debug)]
pub struct ReverseTranslation {
    pub model: Model,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unvisited,
    /// Being converted right now; a reference landing here closes a cycle.
    InProgress,
    Converted(Handle),
    Skipped,
}

/// Builds a typed model from a flat document against the given schema
/// table.
///
/// The model starts empty apart from the bookkeeping records the typed
/// layer always carries, so a document entry for an unnamed type updates
/// that record rather than duplicating it. Duplicate names convert under
/// a fresh suffixed name, unknown types are skipped, and scalar tokens
/// the schema rejects keep the created default; each such repair is
/// reported.
pub fn translate_document(document: &IdfDocument, registry: Arc<IddRegistry>) -> ReverseTranslation {
    let mut model = Model::with_registry(registry);
    *model.schedule_types_mut() = ScheduleTypeRegistry::with_builtin_requirements();

    // First occurrence wins in the name index; later records with the
    // same name still convert, under a fresh name.
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    {
        let registry = model.workspace().registry();
        for (position, object) in document.objects.iter().enumerate() {
            let Ok(schema) = registry.lookup(&object.type_name) else {
                continue;
            };
            if !schema.has_name {
                continue;
            }
            let name = object.value(0).trim();
            if name.is_empty() {
                continue;
            }
            let key = (schema.type_name.to_ascii_lowercase(), name.to_ascii_lowercase());
            index.entry(key).or_insert(position);
        }
    }

    let mut pass = ReversePass {
        document,
        model,
        states: vec![State::Unvisited; document.len()],
        index,
        diagnostics: Vec::new(),
    };
    for position in 0..document.len() {
        pass.convert(position);
    }
    ReverseTranslation {
        model: pass.model,
        diagnostics: pass.diagnostics,
    }
}

struct ReversePass<'a> {
    document: &'a IdfDocument,
    model: Model,
    states: Vec<State>,
    /// `(type, name)` lowercased, to document position.
    index: HashMap<(String, String), usize>,
    diagnostics: Vec<Diagnostic>,
}

impl ReversePass<'_> {
    /// Converts the document entry at `position`, recursing into its
    /// reference targets, and returns the record it now corresponds to.
    fn convert(&mut self, position: usize) -> Option<Handle> {
        match self.states[position] {
            State::Converted(handle) => return Some(handle),
            State::Skipped | State::InProgress => return None,
            State::Unvisited => {}
        }

        let document = self.document;
        let object = &document.objects[position];
        let schema = match self.model.workspace().registry().lookup(&object.type_name) {
            Ok(schema) => schema.clone(),
            Err(_) => {
                self.states[position] = State::Skipped;
                self.diagnostics.push(Diagnostic::warning(
                    &object.type_name,
                    None,
                    "unknown object type, record skipped",
                ));
                return None;
            }
        };

        // Unnamed types are singletons in practice; a document entry for
        // one updates the record the model already holds.
        if !schema.has_name
            && let Some(&existing) = self.model.workspace().objects_of_type(&schema.type_name).first()
        {
            self.states[position] = State::InProgress;
            self.apply_fields(existing, &schema, position, 0);
            self.states[position] = State::Converted(existing);
            return Some(existing);
        }

        let handle = match self.model.workspace_mut().create(&schema.type_name) {
            Ok(handle) => handle,
            Err(err) => {
                self.states[position] = State::Skipped;
                self.diagnostics
                    .push(Diagnostic::error(&schema.type_name, None, err.to_string()));
                return None;
            }
        };
        self.states[position] = State::InProgress;

        let offset = if schema.has_name {
            let requested = object.value(0).trim().to_string();
            if !requested.is_empty() {
                match self.model.workspace_mut().set_name(handle, &requested) {
                    Ok(stored) if stored != requested => {
                        self.diagnostics.push(Diagnostic::warning(
                            &schema.type_name,
                            Some(&stored),
                            format!("name {requested:?} is taken, converted as {stored:?}"),
                        ));
                    }
                    Ok(_) => {}
                    Err(err) => self.diagnostics.push(Diagnostic::warning(
                        &schema.type_name,
                        Some(&requested),
                        err.to_string(),
                    )),
                }
            }
            1
        } else {
            0
        };

        self.apply_fields(handle, &schema, position, offset);
        self.states[position] = State::Converted(handle);
        Some(handle)
    }

    fn apply_fields(
        &mut self,
        handle: Handle,
        schema: &ObjectSchema,
        position: usize,
        offset: usize,
    ) {
        let document = self.document;
        let object = &document.objects[position];
        let owner = self.model.workspace().name(handle).map(str::to_string);

        for (index, field) in schema.fields.iter().enumerate() {
            let token = object.value(offset + index).trim().to_string();
            if field.kind.is_reference() {
                self.apply_reference(handle, schema, field, index, &token, owner.as_deref());
                continue;
            }
            match FieldValue::parse_scalar(field, &schema.type_name, &token) {
                Ok(value) => {
                    if let Err(err) = self.model.workspace_mut().set_field(handle, index, value) {
                        self.diagnostics.push(Diagnostic::warning(
                            &schema.type_name,
                            owner.as_deref(),
                            err.to_string(),
                        ));
                    }
                }
                Err(err) => self.diagnostics.push(Diagnostic::warning(
                    &schema.type_name,
                    owner.as_deref(),
                    format!("{err}; value ignored"),
                )),
            }
        }

        let extra = object.fields.len().saturating_sub(offset + schema.fields.len());
        if extra > 0 {
            self.diagnostics.push(Diagnostic::warning(
                &schema.type_name,
                owner.as_deref(),
                format!("{extra} field value(s) beyond the schema ignored"),
            ));
        }
    }

    fn apply_reference(
        &mut self,
        handle: Handle,
        schema: &ObjectSchema,
        field: &FieldSchema,
        index: usize,
        token: &str,
        owner: Option<&str>,
    ) {
        if token.is_empty() {
            // A blank token means "points at nothing", even where a
            // created record started out with something.
            let _ = self.model.workspace_mut().set_pointer(handle, index, None);
            return;
        }
        let needle = token.to_ascii_lowercase();
        for target_type in field.object_list() {
            let key = (target_type.to_ascii_lowercase(), needle.clone());
            let Some(&target_position) = self.index.get(&key) else {
                continue;
            };
            if self.states[target_position] == State::InProgress {
                self.diagnostics.push(Diagnostic::warning(
                    &schema.type_name,
                    owner,
                    format!(
                        "field {:?}: reference to {token:?} closes a cycle, left unset",
                        field.label
                    ),
                ));
                return;
            }
            if let Some(target) = self.convert(target_position) {
                if let Err(err) = self.model.workspace_mut().set_pointer(handle, index, Some(target))
                {
                    self.diagnostics.push(Diagnostic::error(
                        &schema.type_name,
                        owner,
                        err.to_string(),
                    ));
                }
                return;
            }
        }
        self.diagnostics.push(Diagnostic::error(
            &schema.type_name,
            owner,
            format!("field {:?} references {token:?}, which is not in the document", field.label),
        ));
    }
}
