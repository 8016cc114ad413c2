//! Schedule type compatibility registry.
//!
//! Every schedule-pointer field can carry a requirement: the unit type and
//! value range the assigned schedule's limits must declare. Requirements
//! are registered per `(owning type, field label)` and consulted by
//! [`Model::set_schedule`], which is the one place schedule pointers should
//! be assigned through.
//!
//! [`Model::set_schedule`]: crate::model::Model::set_schedule

use crate::Handle;
use crate::idd::catalog;
use crate::workspace::Workspace;
use std::collections::HashMap;
use std::fmt;

/// What a field requires of a schedule: a unit type, and optionally a
/// range the schedule's declared limits must stay inside.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitsSpec {
    pub unit_type: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl LimitsSpec {
    pub fn new(unit_type: &str) -> Self {
        Self {
            unit_type: unit_type.trim().to_string(),
            lower: None,
            upper: None,
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }

    /// Whether limits declaring `found` may serve where `self` is
    /// required. Units must agree; a declared bound must stay inside the
    /// required range, while an undeclared bound passes.
    pub fn accepts(&self, found: &LimitsSpec) -> bool {
        if !found.unit_type.eq_ignore_ascii_case(&self.unit_type) {
            return false;
        }
        if let (Some(required), Some(declared)) = (self.lower, found.lower)
            && declared < required
        {
            return false;
        }
        if let (Some(required), Some(declared)) = (self.upper, found.upper)
            && declared > required
        {
            return false;
        }
        true
    }
}

impl fmt::Display for LimitsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (None, None) => write!(f, "{}", self.unit_type),
            (Some(l), Some(u)) => write!(f, "{} [{l}, {u}]", self.unit_type),
            (Some(l), None) => write!(f, "{} [{l}, ]", self.unit_type),
            (None, Some(u)) => write!(f, "{} [, {u}]", self.unit_type),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScheduleTypeRegistry {
    requirements: HashMap<(String, String), LimitsSpec>,
}

fn requirement_key(object_type: &str, field_label: &str) -> (String, String) {
    (
        object_type.trim().to_ascii_lowercase(),
        field_label.trim().to_ascii_lowercase(),
    )
}

impl ScheduleTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry pre-loaded with the requirements of the built-in
    /// schema table.
    pub fn with_builtin_requirements() -> Self {
        let mut registry = Self::new();
        registry.register(
            catalog::WATER_HEATER_MIXED,
            "Setpoint Temperature Schedule Name",
            LimitsSpec::new("Temperature"),
        );
        registry.register(
            catalog::WATER_HEATER_MIXED,
            "Ambient Temperature Schedule Name",
            LimitsSpec::new("Temperature"),
        );
        registry.register(
            catalog::COIL_COOLING_DX_SINGLE_SPEED,
            "Availability Schedule Name",
            LimitsSpec::new("Availability").with_bounds(0.0, 1.0),
        );
        registry
    }

    /// Registers (or replaces) the requirement for one field. Last
    /// registration wins.
    pub fn register(&mut self, object_type: &str, field_label: &str, spec: LimitsSpec) {
        self.requirements
            .insert(requirement_key(object_type, field_label), spec);
    }

    /// The limits required for a field, if any requirement is registered.
    pub fn requirement(&self, object_type: &str, field_label: &str) -> Option<&LimitsSpec> {
        self.requirements
            .get(&requirement_key(object_type, field_label))
    }
}

/// The limits record a schedule points at, or `None` when it declares
/// none.
pub fn declared_limits(workspace: &Workspace, schedule: Handle) -> Option<Handle> {
    let schedule_type = workspace.type_name(schedule)?;
    let limits_field = workspace
        .registry()
        .field_index(schedule_type, "Schedule Type Limits Name")
        .ok()?;
    workspace.get_pointer(schedule, limits_field)
}

/// Reads a limits record back into spec form. A cleared unit field counts
/// as the schema default, `Dimensionless`.
pub fn declared_spec(workspace: &Workspace, limits: Handle) -> LimitsSpec {
    let index = |label: &str| {
        workspace
            .registry()
            .field_index(catalog::SCHEDULE_TYPE_LIMITS, label)
            .ok()
    };
    let unit_type = index("Unit Type")
        .and_then(|i| workspace.get_string(limits, i))
        .unwrap_or("Dimensionless")
        .to_string();
    LimitsSpec {
        unit_type,
        lower: index("Lower Limit Value").and_then(|i| workspace.get_double(limits, i)),
        upper: index("Upper Limit Value").and_then(|i| workspace.get_double(limits, i)),
    }
}

/// Whether a schedule may be assigned where `spec` is required. A
/// schedule with no declared limits is compatible with anything;
/// assignment then back-propagates the requirement.
pub fn check_compatible(workspace: &Workspace, schedule: Handle, spec: &LimitsSpec) -> bool {
    match declared_limits(workspace, schedule) {
        Some(limits) => spec.accepts(&declared_spec(workspace, limits)),
        None => true,
    }
}
