//! Typed object layer.
//!
//! A [`Model`] bundles the record store with the schedule compatibility
//! registry, and hands out thin typed wrappers over individual records.
//! Wrappers are `Copy` views holding nothing but a handle; every accessor
//! takes the model explicitly, so there is no hidden shared state and no
//! wrapper outliving the data it views invites a crash: stale wrappers
//! simply read as absent.

pub mod coil;
pub mod curves;
pub mod schedule_types;
pub mod schedules;
pub mod sizing;
pub mod water_heater;
pub mod zone;

pub use coil::CoilCoolingDxSingleSpeed;
pub use curves::{CurveBiquadratic, CurveQuadratic};
pub use schedule_types::{LimitsSpec, ScheduleTypeRegistry};
pub use schedules::{ScheduleConstant, ScheduleTypeLimits};
pub use sizing::{SizingReport, apply_sizing_values};
pub use water_heater::WaterHeaterMixed;
pub use zone::Zone;

use crate::Handle;
use crate::error::ModelError;
use crate::idd::{IddRegistry, catalog};
use crate::workspace::Workspace;
use std::sync::Arc;

/// A typed view over one record.
///
/// Implementors are wrappers: a handle plus accessors. The checked way in
/// is [`Model::get`], which verifies the record's type tag first; a failed
/// check is a `None`, never a panic.
pub trait ModelObject: Copy {
    /// Schema type this wrapper views.
    fn type_name() -> &'static str;

    /// Wraps a handle without checking the type tag. Callers outside the
    /// wrapper modules go through [`Model::get`] instead.
    fn wrap(handle: Handle) -> Self;

    fn handle(&self) -> Handle;
}

/// The model: a record store plus the schedule compatibility registry.
#[derive(Debug)]
pub struct Model {
    workspace: Workspace,
    schedule_types: ScheduleTypeRegistry,
}

impl Model {
    /// An empty model over the built-in schema table, with the built-in
    /// schedule type requirements registered and a version record in
    /// place.
    pub fn new() -> Self {
        let mut workspace = Workspace::new(Arc::new(catalog::builtin()));
        workspace
            .create(catalog::VERSION)
            .expect("built-in catalog registers Version");
        Self {
            workspace,
            schedule_types: ScheduleTypeRegistry::with_builtin_requirements(),
        }
    }

    /// A model over a caller-supplied schema table. No schedule type
    /// requirements are registered; a version record is created only when
    /// the table has such a type.
    pub fn with_registry(registry: Arc<IddRegistry>) -> Self {
        let mut workspace = Workspace::new(registry);
        if workspace.registry().contains(catalog::VERSION) {
            let _ = workspace.create(catalog::VERSION);
        }
        Self {
            workspace,
            schedule_types: ScheduleTypeRegistry::new(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn schedule_types(&self) -> &ScheduleTypeRegistry {
        &self.schedule_types
    }

    pub fn schedule_types_mut(&mut self) -> &mut ScheduleTypeRegistry {
        &mut self.schedule_types
    }

    /// Checked downcast of a handle to a typed wrapper. `None` when the
    /// record is gone or tagged with a different type.
    pub fn get<T: ModelObject>(&self, handle: Handle) -> Option<T> {
        let tag = self.workspace.type_name(handle)?;
        tag.eq_ignore_ascii_case(T::type_name()).then(|| T::wrap(handle))
    }

    /// Creates a record of the wrapper's type.
    pub fn create_object<T: ModelObject>(&mut self) -> Result<T, ModelError> {
        let handle = self.workspace.create(T::type_name())?;
        Ok(T::wrap(handle))
    }

    /// All objects of the wrapper's type, in creation order.
    pub fn objects<T: ModelObject>(&self) -> Vec<T> {
        self.workspace
            .objects_of_type(T::type_name())
            .into_iter()
            .map(T::wrap)
            .collect()
    }

    /// Typed case-insensitive name lookup.
    pub fn find<T: ModelObject>(&self, name: &str) -> Option<T> {
        self.workspace.find(T::type_name(), name).map(T::wrap)
    }

    /// The version identifier of the model's version record, if any.
    pub fn version_identifier(&self) -> Option<&str> {
        let version = self.workspace.objects_of_type(catalog::VERSION).first().copied()?;
        self.workspace.get_string(version, 0)
    }

    /// Assigns a schedule to a pointer field, enforcing any schedule type
    /// requirement registered for that field.
    ///
    /// An incompatible schedule is rejected without touching the field.
    /// When the field carries a requirement and the schedule has no
    /// declared limits yet, the matching limits record is looked up or
    /// created and back-propagated onto the schedule. An existing
    /// compatible limits assignment is never replaced.
    pub fn set_schedule(
        &mut self,
        owner: Handle,
        field_index: usize,
        schedule: Handle,
    ) -> Result<(), ModelError> {
        let owner_type = self
            .workspace
            .type_name(owner)
            .ok_or(crate::error::WorkspaceError::UnknownHandle(owner))?
            .to_string();
        let label = self
            .workspace
            .registry()
            .field(&owner_type, field_index)?
            .label
            .clone();

        let requirement = self.schedule_types.requirement(&owner_type, &label).cloned();
        let declared = schedule_types::declared_limits(&self.workspace, schedule);

        if let Some(required) = &requirement
            && let Some(limits) = declared
        {
            let found = schedule_types::declared_spec(&self.workspace, limits);
            if !required.accepts(&found) {
                return Err(ModelError::IncompatibleSchedule {
                    schedule_name: self
                        .workspace
                        .name(schedule)
                        .unwrap_or_default()
                        .to_string(),
                    owner_type,
                    field: label,
                    required: required.to_string(),
                    found: found.to_string(),
                });
            }
        }

        self.workspace.set_pointer(owner, field_index, Some(schedule))?;

        if let Some(required) = requirement
            && declared.is_none()
            && let Some(schedule_type) = self.workspace.type_name(schedule).map(str::to_string)
        {
            let limits = self.get_or_create_limits(&required)?;
            let limits_field = self
                .workspace
                .registry()
                .field_index(&schedule_type, "Schedule Type Limits Name")?;
            self.workspace.set_pointer(schedule, limits_field, Some(limits))?;
        }
        Ok(())
    }

    /// Finds a limits record satisfying the spec, creating one named after
    /// the unit type when none exists.
    pub fn get_or_create_limits(&mut self, spec: &LimitsSpec) -> Result<Handle, ModelError> {
        let existing = self
            .workspace
            .objects_of_type(catalog::SCHEDULE_TYPE_LIMITS)
            .into_iter()
            .find(|&h| spec.accepts(&schedule_types::declared_spec(&self.workspace, h)));
        if let Some(handle) = existing {
            return Ok(handle);
        }

        let field_index = |label: &str| {
            self.workspace
                .registry()
                .field_index(catalog::SCHEDULE_TYPE_LIMITS, label)
        };
        let unit_field = field_index("Unit Type")?;
        let lower_field = field_index("Lower Limit Value")?;
        let upper_field = field_index("Upper Limit Value")?;

        let handle = self.workspace.create(catalog::SCHEDULE_TYPE_LIMITS)?;
        self.workspace.set_name(handle, &spec.unit_type)?;
        self.workspace.set_field(
            handle,
            unit_field,
            crate::workspace::FieldValue::Text(spec.unit_type.clone()),
        )?;
        if let Some(lower) = spec.lower {
            self.workspace
                .set_field(handle, lower_field, crate::workspace::FieldValue::Real(lower))?;
        }
        if let Some(upper) = spec.upper {
            self.workspace
                .set_field(handle, upper_field, crate::workspace::FieldValue::Real(upper))?;
        }
        Ok(handle)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
