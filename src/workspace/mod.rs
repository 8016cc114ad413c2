//! Schema-validated record store.
//!
//! The workspace owns every record, addressed by [`Handle`]. All writes go
//! through the schema registry, so a record never holds a value its field
//! declaration forbids, and pointer fields never dangle: a reverse-reference
//! index tracks who points at whom, removal clears or refuses accordingly,
//! and cloning follows the ownership flags of the schema.
//!
//! Lookup by `(type, name)` is case-insensitive and backed by an index that
//! is kept in step with creation, renaming and removal.

pub mod record;

pub use record::{FieldValue, Record};

use crate::Handle;
use crate::error::{ValidationError, ValidationKind, WorkspaceError};
use crate::idd::{FieldKind, IddRegistry};
use crate::name::{make_unique_name, validate_name};
use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Inbound reference entry: which field of which record points at a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSource {
    pub source: Handle,
    pub field_index: usize,
}

/// Keys for the case-insensitive `(type, name)` index.
fn name_key(type_name: &str, name: &str) -> (String, String) {
    (
        type_name.trim().to_ascii_lowercase(),
        name.trim().to_ascii_lowercase(),
    )
}

#[derive(Debug)]
pub struct Workspace {
    registry: Arc<IddRegistry>,
    records: HashMap<Handle, Record>,
    /// Handles in creation order; `remove` filters, nothing else reorders.
    order: Vec<Handle>,
    /// Target handle to the pointer fields aimed at it.
    sources: HashMap<Handle, Vec<PointerSource>>,
    names: HashMap<(String, String), Handle>,
}

impl Workspace {
    pub fn new(registry: Arc<IddRegistry>) -> Self {
        Self {
            registry,
            records: HashMap::new(),
            order: Vec::new(),
            sources: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &IddRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.records.contains_key(&handle)
    }

    pub fn record(&self, handle: Handle) -> Option<&Record> {
        self.records.get(&handle)
    }

    /// Handles in creation order.
    pub fn handles(&self) -> &[Handle] {
        &self.order
    }

    /// Records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().filter_map(|h| self.records.get(h))
    }

    /// Handles of all records of one type, in creation order.
    pub fn objects_of_type(&self, type_name: &str) -> Vec<Handle> {
        let wanted = type_name.trim();
        self.order
            .iter()
            .copied()
            .filter(|h| {
                self.records
                    .get(h)
                    .is_some_and(|r| r.type_name.eq_ignore_ascii_case(wanted))
            })
            .collect()
    }

    /// Case-insensitive lookup by type and name.
    pub fn find(&self, type_name: &str, name: &str) -> Option<Handle> {
        self.names.get(&name_key(type_name, name)).copied()
    }

    /// Inbound reference entries pointing at `handle`.
    pub fn sources(&self, handle: Handle) -> &[PointerSource] {
        self.sources.get(&handle).map(Vec::as_slice).unwrap_or(&[])
    }

    // ----- creation ------------------------------------------------------

    /// Creates a record of `type_name` with every schema default
    /// materialized. Named types get a generated name, made unique within
    /// the type by a numeric suffix.
    pub fn create(&mut self, type_name: &str) -> Result<Handle, WorkspaceError> {
        let schema = self.registry.lookup(type_name)?;
        let canonical = schema.type_name.clone();
        let has_name = schema.has_name;
        let base = schema.default_name_base();
        let fields: Vec<FieldValue> = schema
            .fields
            .iter()
            .map(|f| {
                f.default
                    .as_ref()
                    .map(FieldValue::from_default)
                    .unwrap_or(FieldValue::Empty)
            })
            .collect();

        let handle = Handle::new();
        let mut record = Record::new(handle, &canonical, fields);
        if has_name {
            let name = make_unique_name(&base, |candidate| {
                self.names.contains_key(&name_key(&canonical, candidate))
            });
            self.names.insert(name_key(&canonical, &name), handle);
            record.name = Some(name);
        }
        self.records.insert(handle, record);
        self.order.push(handle);
        self.sources.insert(handle, Vec::new());
        Ok(handle)
    }

    // ----- reads ---------------------------------------------------------

    /// Raw field value. Unknown handles and out-of-range indices read as
    /// `Empty`, so lookups never fail.
    pub fn field(&self, handle: Handle, index: usize) -> &FieldValue {
        self.records
            .get(&handle)
            .map(|r| r.field(index))
            .unwrap_or(&FieldValue::Empty)
    }

    pub fn get_double(&self, handle: Handle, index: usize) -> Option<f64> {
        self.field(handle, index).as_double()
    }

    pub fn get_integer(&self, handle: Handle, index: usize) -> Option<i64> {
        self.field(handle, index).as_integer()
    }

    pub fn get_string(&self, handle: Handle, index: usize) -> Option<&str> {
        self.field(handle, index).as_str()
    }

    pub fn get_pointer(&self, handle: Handle, index: usize) -> Option<Handle> {
        self.field(handle, index).as_pointer()
    }

    pub fn is_autosized(&self, handle: Handle, index: usize) -> bool {
        matches!(self.field(handle, index), FieldValue::Autosize)
    }

    pub fn is_autocalculated(&self, handle: Handle, index: usize) -> bool {
        matches!(self.field(handle, index), FieldValue::Autocalculate)
    }

    pub fn name(&self, handle: Handle) -> Option<&str> {
        self.records.get(&handle).and_then(|r| r.name.as_deref())
    }

    pub fn type_name(&self, handle: Handle) -> Option<&str> {
        self.records.get(&handle).map(|r| r.type_name.as_str())
    }

    // ----- writes --------------------------------------------------------

    /// Writes a scalar field after validating the value against the
    /// schema. The record is untouched when validation fails.
    ///
    /// Reference fields reject everything except `Empty`, which clears
    /// them through the pointer path; targets are assigned with
    /// [`Workspace::set_pointer`].
    pub fn set_field(
        &mut self,
        handle: Handle,
        index: usize,
        value: FieldValue,
    ) -> Result<(), WorkspaceError> {
        let registry = self.registry.clone();
        let type_name = self
            .records
            .get(&handle)
            .ok_or(WorkspaceError::UnknownHandle(handle))?
            .type_name
            .clone();
        let field = registry.field(&type_name, index)?;

        if field.kind.is_reference() {
            return match value {
                FieldValue::Empty => self.set_pointer(handle, index, None),
                other => Err(validation(
                    &type_name,
                    &field.label,
                    ValidationKind::PointerFieldDirectWrite,
                    other.to_string(),
                )),
            };
        }

        let checked = match value {
            FieldValue::Empty => FieldValue::Empty,
            FieldValue::Pointer(target) => {
                return Err(validation(
                    &type_name,
                    &field.label,
                    ValidationKind::NotAPointerField,
                    target.to_string(),
                ));
            }
            FieldValue::Autosize => {
                if !field.autosizable {
                    return Err(validation(
                        &type_name,
                        &field.label,
                        ValidationKind::NotAutosizable,
                        "Autosize".to_string(),
                    ));
                }
                FieldValue::Autosize
            }
            FieldValue::Autocalculate => {
                if !field.autocalculatable {
                    return Err(validation(
                        &type_name,
                        &field.label,
                        ValidationKind::NotAutocalculatable,
                        "Autocalculate".to_string(),
                    ));
                }
                FieldValue::Autocalculate
            }
            FieldValue::Real(v) => match &field.kind {
                FieldKind::Real => FieldValue::Real(v),
                FieldKind::Integer if v.fract() == 0.0 => FieldValue::Integer(v as i64),
                _ => {
                    return Err(validation(
                        &type_name,
                        &field.label,
                        ValidationKind::TypeMismatch,
                        v.to_string(),
                    ));
                }
            },
            FieldValue::Integer(v) => match &field.kind {
                FieldKind::Integer => FieldValue::Integer(v),
                // Integers widen into real fields.
                FieldKind::Real => FieldValue::Real(v as f64),
                _ => {
                    return Err(validation(
                        &type_name,
                        &field.label,
                        ValidationKind::TypeMismatch,
                        v.to_string(),
                    ));
                }
            },
            FieldValue::Text(s) => match &field.kind {
                FieldKind::Text => {
                    let trimmed = validate_name(&s).map_err(|_| {
                        validation(&type_name, &field.label, ValidationKind::BadName, s.clone())
                    })?;
                    FieldValue::Text(trimmed.to_string())
                }
                FieldKind::Choice(values) => {
                    let canonical = values
                        .iter()
                        .find(|v| v.eq_ignore_ascii_case(s.trim()))
                        .ok_or_else(|| {
                            validation(
                                &type_name,
                                &field.label,
                                ValidationKind::IllegalChoice,
                                s.clone(),
                            )
                        })?;
                    FieldValue::Text(canonical.clone())
                }
                _ => {
                    return Err(validation(
                        &type_name,
                        &field.label,
                        ValidationKind::TypeMismatch,
                        s,
                    ));
                }
            },
        };

        if let Some(record) = self.records.get_mut(&handle) {
            record.fields[index] = checked;
        }
        Ok(())
    }

    /// Points a reference field at `target`, or clears it with `None`.
    ///
    /// The target must exist and its type must be on the field's object
    /// list. The reverse-reference index is kept in step.
    pub fn set_pointer(
        &mut self,
        handle: Handle,
        index: usize,
        target: Option<Handle>,
    ) -> Result<(), WorkspaceError> {
        let registry = self.registry.clone();
        let type_name = self
            .records
            .get(&handle)
            .ok_or(WorkspaceError::UnknownHandle(handle))?
            .type_name
            .clone();
        let field = registry.field(&type_name, index)?;
        if !field.kind.is_reference() {
            return Err(validation(
                &type_name,
                &field.label,
                ValidationKind::NotAPointerField,
                target.map(|h| h.to_string()).unwrap_or_default(),
            ));
        }
        if let Some(t) = target {
            let target_type = self
                .records
                .get(&t)
                .map(|r| r.type_name.clone())
                .ok_or(WorkspaceError::UnknownHandle(t))?;
            let legal = field
                .object_list()
                .iter()
                .any(|ty| ty.eq_ignore_ascii_case(&target_type));
            if !legal {
                return Err(validation(
                    &type_name,
                    &field.label,
                    ValidationKind::IllegalReferenceTarget,
                    target_type,
                ));
            }
        }

        let old = self
            .records
            .get(&handle)
            .and_then(|r| r.field(index).as_pointer());
        if let Some(old_target) = old
            && let Some(entries) = self.sources.get_mut(&old_target)
        {
            entries.retain(|e| !(e.source == handle && e.field_index == index));
        }
        if let Some(record) = self.records.get_mut(&handle) {
            record.fields[index] = target.map(FieldValue::Pointer).unwrap_or(FieldValue::Empty);
        }
        if let Some(t) = target {
            self.sources.entry(t).or_default().push(PointerSource {
                source: handle,
                field_index: index,
            });
        }
        Ok(())
    }

    /// Renames a record. The stored name can differ from the request: it
    /// is trimmed, and a numeric suffix is appended if the name is taken
    /// within the type. Returns the name actually stored.
    pub fn set_name(&mut self, handle: Handle, name: &str) -> Result<String, WorkspaceError> {
        let record = self
            .records
            .get(&handle)
            .ok_or(WorkspaceError::UnknownHandle(handle))?;
        let type_name = record.type_name.clone();
        let old_name = record.name.clone();
        if !self.registry.lookup(&type_name)?.has_name {
            return Err(validation(
                &type_name,
                "Name",
                ValidationKind::BadName,
                format!("{name:?} (type carries no name)"),
            ));
        }
        let trimmed = validate_name(name).map_err(|_| {
            validation(&type_name, "Name", ValidationKind::BadName, name.to_string())
        })?;

        let unique = make_unique_name(trimmed, |candidate| {
            // Re-asserting the record's own name is not a collision.
            self.names
                .get(&name_key(&type_name, candidate))
                .is_some_and(|&h| h != handle)
        });
        if let Some(old) = &old_name {
            self.names.remove(&name_key(&type_name, old));
        }
        self.names.insert(name_key(&type_name, &unique), handle);
        if let Some(record) = self.records.get_mut(&handle) {
            record.name = Some(unique.clone());
        }
        Ok(unique)
    }

    // ----- removal -------------------------------------------------------

    /// Removes a record together with its owned children, returning the
    /// handles actually removed, in creation order.
    ///
    /// Inbound plain references are cleared. An inbound reference through
    /// a required field fails the whole removal with the offending edge.
    /// Owned children survive when a record outside the removal set still
    /// points at them.
    pub fn remove(&mut self, handle: Handle) -> Result<Vec<Handle>, WorkspaceError> {
        self.remove_impl(handle, false)
    }

    /// Like [`Workspace::remove`], but required inbound references are
    /// cleared instead of failing the removal.
    pub fn remove_forced(&mut self, handle: Handle) -> Result<Vec<Handle>, WorkspaceError> {
        self.remove_impl(handle, true)
    }

    fn remove_impl(&mut self, handle: Handle, forced: bool) -> Result<Vec<Handle>, WorkspaceError> {
        if !self.records.contains_key(&handle) {
            return Err(WorkspaceError::UnknownHandle(handle));
        }
        let registry = self.registry.clone();

        // Gather the owned subtree, then shrink it: a child kept alive by
        // a reference from outside the set survives, as do its own
        // children in turn, until nothing changes.
        let mut set: HashSet<Handle> = HashSet::new();
        let mut queue = vec![handle];
        while let Some(h) = queue.pop() {
            if !set.insert(h) {
                continue;
            }
            let Some(record) = self.records.get(&h) else {
                continue;
            };
            let Ok(schema) = registry.lookup(&record.type_name) else {
                continue;
            };
            for (idx, field) in schema.fields.iter().enumerate() {
                if field.owned
                    && let FieldValue::Pointer(t) = record.field(idx)
                    && self.records.contains_key(t)
                {
                    queue.push(*t);
                }
            }
        }
        loop {
            let kept: Vec<Handle> = set
                .iter()
                .copied()
                .filter(|&member| {
                    member != handle
                        && self
                            .sources
                            .get(&member)
                            .is_some_and(|entries| entries.iter().any(|e| !set.contains(&e.source)))
                })
                .collect();
            if kept.is_empty() {
                break;
            }
            for h in kept {
                set.remove(&h);
            }
        }

        if !forced {
            for &member in &set {
                let Some(entries) = self.sources.get(&member) else {
                    continue;
                };
                for entry in entries {
                    if set.contains(&entry.source) {
                        continue;
                    }
                    let Some(source) = self.records.get(&entry.source) else {
                        continue;
                    };
                    let Ok(field) = registry.field(&source.type_name, entry.field_index) else {
                        continue;
                    };
                    if field.required {
                        return Err(WorkspaceError::DanglingRequiredReference {
                            target: member,
                            source: entry.source,
                            field: field.label.clone(),
                        });
                    }
                }
            }
        }

        let removed: Vec<Handle> = self
            .order
            .iter()
            .copied()
            .filter(|h| set.contains(h))
            .collect();
        for &member in &removed {
            // Detach outbound edges that leave the set.
            let outbound: Vec<Handle> = self
                .records
                .get(&member)
                .map(|r| r.fields.iter().filter_map(FieldValue::as_pointer).collect())
                .unwrap_or_default();
            for target in outbound {
                if let Some(entries) = self.sources.get_mut(&target) {
                    entries.retain(|e| e.source != member);
                }
            }
            // Clear inbound edges from survivors.
            let inbound = self.sources.get(&member).cloned().unwrap_or_default();
            for entry in inbound {
                if set.contains(&entry.source) {
                    continue;
                }
                if let Some(source) = self.records.get_mut(&entry.source) {
                    source.fields[entry.field_index] = FieldValue::Empty;
                }
            }
        }
        for &member in &removed {
            if let Some(record) = self.records.remove(&member)
                && let Some(name) = &record.name
            {
                self.names.remove(&name_key(&record.type_name, name));
            }
            self.sources.remove(&member);
        }
        self.order.retain(|h| !set.contains(h));
        Ok(removed)
    }

    // ----- cloning -------------------------------------------------------

    /// Deep-clones a record.
    ///
    /// Scalar values are copied, plain pointer fields keep their target,
    /// and owned children are cloned along with the owner. A child owned
    /// through two fields is cloned once, so sharing inside the subtree
    /// is preserved. Clone names get a uniquifying suffix.
    pub fn clone_record(&mut self, handle: Handle) -> Result<Handle, WorkspaceError> {
        let mut cloned = HashMap::new();
        self.clone_inner(handle, &mut cloned)
    }

    fn clone_inner(
        &mut self,
        handle: Handle,
        cloned: &mut HashMap<Handle, Handle>,
    ) -> Result<Handle, WorkspaceError> {
        if let Some(&copy) = cloned.get(&handle) {
            return Ok(copy);
        }
        let registry = self.registry.clone();
        let source = self
            .records
            .get(&handle)
            .ok_or(WorkspaceError::UnknownHandle(handle))?
            .clone();
        let owned: Vec<bool> = registry
            .lookup(&source.type_name)?
            .fields
            .iter()
            .map(|f| f.owned)
            .collect();

        let copy = Handle::new();
        cloned.insert(handle, copy);

        let mut record = Record::new(
            copy,
            &source.type_name,
            vec![FieldValue::Empty; source.fields.len()],
        );
        if let Some(name) = &source.name {
            let unique = make_unique_name(name, |candidate| {
                self.names.contains_key(&name_key(&source.type_name, candidate))
            });
            self.names.insert(name_key(&source.type_name, &unique), copy);
            record.name = Some(unique);
        }
        self.records.insert(copy, record);
        self.order.push(copy);
        self.sources.insert(copy, Vec::new());

        for (idx, value) in source.fields.iter().enumerate() {
            let stored = match value {
                FieldValue::Pointer(t) if owned.get(idx).copied().unwrap_or(false) => {
                    if self.records.contains_key(t) {
                        FieldValue::Pointer(self.clone_inner(*t, cloned)?)
                    } else {
                        FieldValue::Empty
                    }
                }
                other => other.clone(),
            };
            if let FieldValue::Pointer(t) = stored {
                self.sources.entry(t).or_default().push(PointerSource {
                    source: copy,
                    field_index: idx,
                });
            }
            if let Some(rec) = self.records.get_mut(&copy) {
                rec.fields[idx] = stored;
            }
        }
        Ok(copy)
    }

    // ----- integrity -----------------------------------------------------

    /// Full integrity audit.
    ///
    /// Checks that every record matches its schema's field count, that
    /// every pointer has a live, type-legal target with a matching
    /// reverse entry, that every reverse entry matches a live pointer,
    /// and that the name index agrees with the records.
    pub fn validate(&self) -> Result<()> {
        for record in self.iter() {
            let schema = self
                .registry
                .lookup(&record.type_name)
                .map_err(|e| anyhow!("{}: {e}", record.handle))?;
            if record.fields.len() != schema.field_count() {
                return Err(anyhow!(
                    "{} {} carries {} fields, schema says {}",
                    record.type_name,
                    record.handle,
                    record.fields.len(),
                    schema.field_count()
                ));
            }
            for (idx, value) in record.fields.iter().enumerate() {
                let FieldValue::Pointer(target) = value else {
                    continue;
                };
                let field = &schema.fields[idx];
                if !field.kind.is_reference() {
                    return Err(anyhow!(
                        "{} {}: scalar field {:?} holds a pointer",
                        record.type_name,
                        record.handle,
                        field.label
                    ));
                }
                let Some(target_record) = self.records.get(target) else {
                    return Err(anyhow!(
                        "{} {}: field {:?} points at missing record {}",
                        record.type_name,
                        record.handle,
                        field.label,
                        target
                    ));
                };
                if !field
                    .object_list()
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&target_record.type_name))
                {
                    return Err(anyhow!(
                        "{} {}: field {:?} points at a {}",
                        record.type_name,
                        record.handle,
                        field.label,
                        target_record.type_name
                    ));
                }
                let indexed = self.sources.get(target).is_some_and(|entries| {
                    entries
                        .iter()
                        .any(|e| e.source == record.handle && e.field_index == idx)
                });
                if !indexed {
                    return Err(anyhow!(
                        "{} {}: field {:?} has no reverse entry at {}",
                        record.type_name,
                        record.handle,
                        field.label,
                        target
                    ));
                }
            }
        }
        for (target, entries) in &self.sources {
            for entry in entries {
                let Some(source) = self.records.get(&entry.source) else {
                    return Err(anyhow!(
                        "reverse entry at {target} names missing source {}",
                        entry.source
                    ));
                };
                if source.field(entry.field_index).as_pointer() != Some(*target) {
                    return Err(anyhow!(
                        "stale reverse entry: {} field #{} does not point at {target}",
                        entry.source,
                        entry.field_index
                    ));
                }
            }
        }
        for record in self.iter() {
            if let Some(name) = &record.name {
                let hit = self.names.get(&name_key(&record.type_name, name));
                if hit != Some(&record.handle) {
                    return Err(anyhow!(
                        "name index disagrees for {} {:?}",
                        record.type_name,
                        name
                    ));
                }
            }
        }
        Ok(())
    }

    /// Rebuilds a store from records in creation order, reconstructing
    /// the name and reverse-reference indices. Snapshot loading ends
    /// here.
    pub(crate) fn from_records(registry: Arc<IddRegistry>, list: Vec<Record>) -> Result<Self> {
        let mut ws = Self::new(registry);
        for record in list {
            let schema = ws.registry.lookup(&record.type_name)?;
            if record.fields.len() != schema.field_count() {
                return Err(anyhow!(
                    "{} {}: {} fields, schema says {}",
                    record.type_name,
                    record.handle,
                    record.fields.len(),
                    schema.field_count()
                ));
            }
            if ws.records.contains_key(&record.handle) {
                return Err(anyhow!("duplicate handle {}", record.handle));
            }
            if let Some(name) = &record.name {
                let key = name_key(&record.type_name, name);
                if ws.names.insert(key, record.handle).is_some() {
                    return Err(anyhow!("duplicate {} name {:?}", record.type_name, name));
                }
            }
            ws.order.push(record.handle);
            ws.records.insert(record.handle, record);
        }
        let handles: Vec<Handle> = ws.order.clone();
        for handle in handles {
            let pointers: Vec<(usize, Handle)> = ws
                .records
                .get(&handle)
                .map(|r| {
                    r.fields
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.as_pointer().map(|t| (i, t)))
                        .collect()
                })
                .unwrap_or_default();
            for (idx, target) in pointers {
                ws.sources.entry(target).or_default().push(PointerSource {
                    source: handle,
                    field_index: idx,
                });
            }
        }
        ws.validate()?;
        Ok(ws)
    }
}

fn validation(
    type_name: &str,
    field: &str,
    kind: ValidationKind,
    got: String,
) -> WorkspaceError {
    WorkspaceError::Validation(ValidationError {
        type_name: type_name.to_string(),
        field: field.to_string(),
        kind,
        got,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idd::catalog;

    fn workspace() -> Workspace {
        Workspace::new(Arc::new(catalog::builtin()))
    }

    #[test]
    fn test_create_materializes_defaults() -> Result<()> {
        let mut ws = workspace();
        let zone = ws.create(catalog::ZONE)?;
        let multiplier = ws.registry().field_index(catalog::ZONE, "Multiplier")?;
        let volume = ws.registry().field_index(catalog::ZONE, "Volume")?;
        let north = ws
            .registry()
            .field_index(catalog::ZONE, "Direction of Relative North")?;

        assert_eq!(ws.get_integer(zone, multiplier), Some(1));
        assert!(ws.is_autocalculated(zone, volume));
        assert_eq!(ws.get_double(zone, north), Some(0.0));
        ws.validate()
    }

    #[test]
    fn test_create_assigns_unique_default_names() -> Result<()> {
        let mut ws = workspace();
        let a = ws.create(catalog::ZONE)?;
        let b = ws.create(catalog::ZONE)?;
        assert_eq!(ws.name(a), Some("Zone"));
        assert_eq!(ws.name(b), Some("Zone 1"));

        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        assert_eq!(ws.name(heater), Some("WaterHeater Mixed"));
        Ok(())
    }

    #[test]
    fn test_create_unknown_type_fails() {
        let mut ws = workspace();
        assert!(matches!(
            ws.create("Chiller:Imaginary"),
            Err(WorkspaceError::Idd(_))
        ));
    }

    #[test]
    fn test_unnamed_type_has_no_name() -> Result<()> {
        let mut ws = workspace();
        let version = ws.create(catalog::VERSION)?;
        assert_eq!(ws.name(version), None);
        assert!(ws.set_name(version, "Anything").is_err());
        Ok(())
    }

    #[test]
    fn test_set_field_validates_kind() -> Result<()> {
        let mut ws = workspace();
        let zone = ws.create(catalog::ZONE)?;
        let volume = ws.registry().field_index(catalog::ZONE, "Volume")?;
        let multiplier = ws.registry().field_index(catalog::ZONE, "Multiplier")?;

        ws.set_field(zone, volume, FieldValue::Real(250.0))?;
        assert_eq!(ws.get_double(zone, volume), Some(250.0));

        // Integers widen into real fields; text does not.
        ws.set_field(zone, volume, FieldValue::Integer(300))?;
        assert_eq!(ws.get_double(zone, volume), Some(300.0));
        let err = ws
            .set_field(zone, volume, FieldValue::Text("big".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::TypeMismatch,
                ..
            })
        ));

        // Whole reals land in integer fields, fractional ones do not.
        ws.set_field(zone, multiplier, FieldValue::Real(2.0))?;
        assert_eq!(ws.get_integer(zone, multiplier), Some(2));
        assert!(ws.set_field(zone, multiplier, FieldValue::Real(2.5)).is_err());

        // Failed writes leave the old value in place.
        assert_eq!(ws.get_double(zone, volume), Some(300.0));
        Ok(())
    }

    #[test]
    fn test_set_field_choice_canonicalizes() -> Result<()> {
        let mut ws = workspace();
        let limits = ws.create(catalog::SCHEDULE_TYPE_LIMITS)?;
        let numeric = ws
            .registry()
            .field_index(catalog::SCHEDULE_TYPE_LIMITS, "Numeric Type")?;

        ws.set_field(limits, numeric, FieldValue::Text("DISCRETE".into()))?;
        assert_eq!(ws.get_string(limits, numeric), Some("Discrete"));

        let err = ws
            .set_field(limits, numeric, FieldValue::Text("Fuzzy".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::IllegalChoice,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_autosize_only_where_declared() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let capacity = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Heater Capacity")?;
        let deadband = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Deadband Temperature Difference")?;

        ws.set_field(heater, capacity, FieldValue::Real(4500.0))?;
        ws.set_field(heater, capacity, FieldValue::Autosize)?;
        assert!(ws.is_autosized(heater, capacity));

        let err = ws
            .set_field(heater, deadband, FieldValue::Autosize)
            .unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::NotAutosizable,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_pointer_fields_reject_scalar_writes() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let setpoint = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Setpoint Temperature Schedule Name")?;
        let tank = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Tank Volume")?;

        let err = ws
            .set_field(heater, setpoint, FieldValue::Text("Some Schedule".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::PointerFieldDirectWrite,
                ..
            })
        ));

        let schedule = ws.create(catalog::SCHEDULE_CONSTANT)?;
        let err = ws
            .set_pointer(heater, tank, Some(schedule))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::NotAPointerField,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_set_pointer_checks_target_type() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let setpoint = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Setpoint Temperature Schedule Name")?;
        let zone = ws.create(catalog::ZONE)?;

        let err = ws.set_pointer(heater, setpoint, Some(zone)).unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Validation(ValidationError {
                kind: ValidationKind::IllegalReferenceTarget,
                ..
            })
        ));

        let schedule = ws.create(catalog::SCHEDULE_CONSTANT)?;
        ws.set_pointer(heater, setpoint, Some(schedule))?;
        assert_eq!(ws.get_pointer(heater, setpoint), Some(schedule));
        ws.validate()
    }

    #[test]
    fn test_reverse_index_follows_pointer_writes() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let setpoint = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Setpoint Temperature Schedule Name")?;
        let first = ws.create(catalog::SCHEDULE_CONSTANT)?;
        let second = ws.create(catalog::SCHEDULE_CONSTANT)?;

        ws.set_pointer(heater, setpoint, Some(first))?;
        assert_eq!(ws.sources(first).len(), 1);
        assert_eq!(ws.sources(first)[0].source, heater);

        ws.set_pointer(heater, setpoint, Some(second))?;
        assert!(ws.sources(first).is_empty());
        assert_eq!(ws.sources(second).len(), 1);

        ws.set_pointer(heater, setpoint, None)?;
        assert!(ws.sources(second).is_empty());
        assert_eq!(ws.field(heater, setpoint), &FieldValue::Empty);
        ws.validate()
    }

    #[test]
    fn test_find_and_rename() -> Result<()> {
        let mut ws = workspace();
        let zone = ws.create(catalog::ZONE)?;
        ws.set_name(zone, "Core Zone")?;

        assert_eq!(ws.find(catalog::ZONE, "core zone"), Some(zone));
        assert_eq!(ws.find("zone", " CORE ZONE "), Some(zone));
        assert_eq!(ws.find(catalog::ZONE, "Zone"), None);

        // A taken name gets a suffix; re-asserting your own does not.
        let other = ws.create(catalog::ZONE)?;
        let stored = ws.set_name(other, "Core Zone")?;
        assert_eq!(stored, "Core Zone 1");
        let same = ws.set_name(zone, "Core Zone")?;
        assert_eq!(same, "Core Zone");

        assert!(ws.set_name(zone, "Bad,Name").is_err());
        assert!(ws.set_name(zone, "   ").is_err());
        ws.validate()
    }

    #[test]
    fn test_remove_clears_plain_inbound_pointers() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let ambient = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Ambient Temperature Schedule Name")?;
        let schedule = ws.create(catalog::SCHEDULE_CONSTANT)?;
        ws.set_pointer(heater, ambient, Some(schedule))?;

        let removed = ws.remove(schedule)?;
        assert_eq!(removed, vec![schedule]);
        assert_eq!(ws.field(heater, ambient), &FieldValue::Empty);
        assert!(!ws.contains(schedule));
        ws.validate()
    }

    #[test]
    fn test_remove_refuses_required_inbound_unless_forced() -> Result<()> {
        let mut ws = workspace();
        let heater = ws.create(catalog::WATER_HEATER_MIXED)?;
        let setpoint = ws
            .registry()
            .field_index(catalog::WATER_HEATER_MIXED, "Setpoint Temperature Schedule Name")?;
        let schedule = ws.create(catalog::SCHEDULE_CONSTANT)?;
        ws.set_pointer(heater, setpoint, Some(schedule))?;

        let err = ws.remove(schedule).unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::DanglingRequiredReference { target, source, .. }
                if target == schedule && source == heater
        ));
        assert!(ws.contains(schedule));

        let removed = ws.remove_forced(schedule)?;
        assert_eq!(removed, vec![schedule]);
        assert_eq!(ws.field(heater, setpoint), &FieldValue::Empty);
        ws.validate()
    }

    #[test]
    fn test_remove_takes_owned_children_along() -> Result<()> {
        let mut ws = workspace();
        let coil = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let cap_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Total Cooling Capacity Function of Temperature Curve Name",
        )?;
        let plf_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Part Load Fraction Correlation Curve Name",
        )?;
        let biquad = ws.create(catalog::CURVE_BIQUADRATIC)?;
        let quad = ws.create(catalog::CURVE_QUADRATIC)?;
        ws.set_pointer(coil, cap_curve, Some(biquad))?;
        ws.set_pointer(coil, plf_curve, Some(quad))?;

        let mut removed = ws.remove(coil)?;
        removed.sort();
        let mut expected = vec![coil, biquad, quad];
        expected.sort();
        assert_eq!(removed, expected);
        assert!(ws.is_empty());
        ws.validate()
    }

    #[test]
    fn test_owned_child_survives_external_reference() -> Result<()> {
        let mut ws = workspace();
        let cap_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Total Cooling Capacity Function of Temperature Curve Name",
        )?;
        let first = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let second = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let shared = ws.create(catalog::CURVE_BIQUADRATIC)?;
        ws.set_pointer(first, cap_curve, Some(shared))?;
        ws.set_pointer(second, cap_curve, Some(shared))?;

        // Removing one coil keeps the curve the other still needs, so
        // the removal set shrinks to the coil itself.
        let removed = ws.remove(first)?;
        assert_eq!(removed, vec![first]);
        assert!(ws.contains(shared));
        assert_eq!(ws.get_pointer(second, cap_curve), Some(shared));
        ws.validate()
    }

    #[test]
    fn test_double_remove_reports_unknown_handle() -> Result<()> {
        let mut ws = workspace();
        let zone = ws.create(catalog::ZONE)?;
        ws.remove(zone)?;
        assert!(matches!(
            ws.remove(zone),
            Err(WorkspaceError::UnknownHandle(h)) if h == zone
        ));
        Ok(())
    }

    #[test]
    fn test_clone_shares_plain_and_copies_owned() -> Result<()> {
        let mut ws = workspace();
        let coil = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let avail = ws
            .registry()
            .field_index(catalog::COIL_COOLING_DX_SINGLE_SPEED, "Availability Schedule Name")?;
        let cap_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Total Cooling Capacity Function of Temperature Curve Name",
        )?;
        let cop = ws
            .registry()
            .field_index(catalog::COIL_COOLING_DX_SINGLE_SPEED, "Gross Rated COP")?;
        let schedule = ws.create(catalog::SCHEDULE_CONSTANT)?;
        let curve = ws.create(catalog::CURVE_BIQUADRATIC)?;
        ws.set_pointer(coil, avail, Some(schedule))?;
        ws.set_pointer(coil, cap_curve, Some(curve))?;
        ws.set_field(coil, cop, FieldValue::Real(3.5))?;

        let copy = ws.clone_record(coil)?;
        assert_ne!(copy, coil);
        assert_eq!(ws.get_double(copy, cop), Some(3.5));
        // Plain pointer shared, owned child duplicated.
        assert_eq!(ws.get_pointer(copy, avail), Some(schedule));
        let curve_copy = ws.get_pointer(copy, cap_curve).unwrap();
        assert_ne!(curve_copy, curve);
        assert_eq!(ws.type_name(curve_copy), Some(catalog::CURVE_BIQUADRATIC));
        assert_eq!(ws.sources(schedule).len(), 2);
        ws.validate()
    }

    #[test]
    fn test_clone_preserves_sharing_inside_subtree() -> Result<()> {
        let mut ws = workspace();
        let coil = ws.create(catalog::COIL_COOLING_DX_SINGLE_SPEED)?;
        let cap_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Total Cooling Capacity Function of Temperature Curve Name",
        )?;
        let eir_curve = ws.registry().field_index(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Energy Input Ratio Function of Temperature Curve Name",
        )?;
        let shared = ws.create(catalog::CURVE_BIQUADRATIC)?;
        ws.set_pointer(coil, cap_curve, Some(shared))?;
        ws.set_pointer(coil, eir_curve, Some(shared))?;

        let copy = ws.clone_record(coil)?;
        let a = ws.get_pointer(copy, cap_curve).unwrap();
        let b = ws.get_pointer(copy, eir_curve).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, shared);
        ws.validate()
    }

    #[test]
    fn test_creation_order_survives_removals() -> Result<()> {
        let mut ws = workspace();
        let a = ws.create(catalog::ZONE)?;
        let b = ws.create(catalog::SCHEDULE_CONSTANT)?;
        let c = ws.create(catalog::ZONE)?;
        ws.remove(b)?;
        assert_eq!(ws.handles(), &[a, c]);
        assert_eq!(ws.objects_of_type(catalog::ZONE), vec![a, c]);
        Ok(())
    }

    #[test]
    fn test_reads_never_fail() {
        let ws = workspace();
        let ghost = Handle::new();
        assert_eq!(ws.field(ghost, 3), &FieldValue::Empty);
        assert_eq!(ws.get_double(ghost, 0), None);
        assert_eq!(ws.name(ghost), None);
        assert!(ws.sources(ghost).is_empty());
    }
}
