//! Schedule wrappers.

use super::{Model, ModelObject};
use crate::Handle;
use crate::error::ModelError;
use crate::idd::catalog;
use crate::workspace::FieldValue;

/// Field order of `ScheduleTypeLimits`.
mod limits_field {
    pub const LOWER_LIMIT: usize = 0;
    pub const UPPER_LIMIT: usize = 1;
    pub const NUMERIC_TYPE: usize = 2;
    pub const UNIT_TYPE: usize = 3;
}

/// Field order of `Schedule:Constant`.
mod field {
    pub const TYPE_LIMITS: usize = 0;
    pub const HOURLY_VALUE: usize = 1;
}

/// Declared value range and unit semantics for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTypeLimits(Handle);

impl ModelObject for ScheduleTypeLimits {
    fn type_name() -> &'static str {
        catalog::SCHEDULE_TYPE_LIMITS
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl ScheduleTypeLimits {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn lower_limit(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, limits_field::LOWER_LIMIT)
    }

    pub fn set_lower_limit(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, limits_field::LOWER_LIMIT, FieldValue::Real(value))?)
    }

    pub fn upper_limit(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, limits_field::UPPER_LIMIT)
    }

    pub fn set_upper_limit(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, limits_field::UPPER_LIMIT, FieldValue::Real(value))?)
    }

    pub fn numeric_type<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().get_string(self.0, limits_field::NUMERIC_TYPE)
    }

    pub fn set_numeric_type(&self, model: &mut Model, value: &str) -> Result<(), ModelError> {
        Ok(model.workspace_mut().set_field(
            self.0,
            limits_field::NUMERIC_TYPE,
            FieldValue::Text(value.to_string()),
        )?)
    }

    pub fn unit_type<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().get_string(self.0, limits_field::UNIT_TYPE)
    }

    pub fn set_unit_type(&self, model: &mut Model, value: &str) -> Result<(), ModelError> {
        Ok(model.workspace_mut().set_field(
            self.0,
            limits_field::UNIT_TYPE,
            FieldValue::Text(value.to_string()),
        )?)
    }
}

/// A schedule holding one value for every hour of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConstant(Handle);

impl ModelObject for ScheduleConstant {
    fn type_name() -> &'static str {
        catalog::SCHEDULE_CONSTANT
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl ScheduleConstant {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn hourly_value(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::HOURLY_VALUE)
    }

    pub fn set_hourly_value(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::HOURLY_VALUE, FieldValue::Real(value))?)
    }

    pub fn schedule_type_limits(&self, model: &Model) -> Option<ScheduleTypeLimits> {
        let handle = model.workspace().get_pointer(self.0, field::TYPE_LIMITS)?;
        model.get(handle)
    }

    pub fn set_schedule_type_limits(
        &self,
        model: &mut Model,
        limits: &ScheduleTypeLimits,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.0, field::TYPE_LIMITS, Some(limits.handle()))?)
    }

    pub fn reset_schedule_type_limits(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.0, field::TYPE_LIMITS, None)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_field_order_matches_catalog() -> Result<()> {
        let registry = catalog::builtin();
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_TYPE_LIMITS, "Lower Limit Value")?,
            limits_field::LOWER_LIMIT
        );
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_TYPE_LIMITS, "Upper Limit Value")?,
            limits_field::UPPER_LIMIT
        );
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_TYPE_LIMITS, "Numeric Type")?,
            limits_field::NUMERIC_TYPE
        );
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_TYPE_LIMITS, "Unit Type")?,
            limits_field::UNIT_TYPE
        );
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_CONSTANT, "Schedule Type Limits Name")?,
            field::TYPE_LIMITS
        );
        assert_eq!(
            registry.field_index(catalog::SCHEDULE_CONSTANT, "Hourly Value")?,
            field::HOURLY_VALUE
        );
        Ok(())
    }

    #[test]
    fn test_schedule_value_and_limits_wiring() -> Result<()> {
        let mut model = Model::new();
        let schedule = ScheduleConstant::create(&mut model)?;
        assert_eq!(schedule.hourly_value(&model), Some(0.0));
        assert!(schedule.schedule_type_limits(&model).is_none());

        schedule.set_hourly_value(&mut model, 21.5)?;
        assert_eq!(schedule.hourly_value(&model), Some(21.5));

        let limits = ScheduleTypeLimits::create(&mut model)?;
        limits.set_name(&mut model, "Setpoint Range")?;
        limits.set_lower_limit(&mut model, 10.0)?;
        limits.set_upper_limit(&mut model, 90.0)?;
        limits.set_unit_type(&mut model, "Temperature")?;
        schedule.set_schedule_type_limits(&mut model, &limits)?;

        let wired = schedule.schedule_type_limits(&model).unwrap();
        assert_eq!(wired.handle(), limits.handle());
        assert_eq!(wired.unit_type(&model), Some("Temperature"));
        assert_eq!(wired.lower_limit(&model), Some(10.0));

        schedule.reset_schedule_type_limits(&mut model)?;
        assert!(schedule.schedule_type_limits(&model).is_none());
        Ok(())
    }

    #[test]
    fn test_limits_numeric_type_is_a_choice() -> Result<()> {
        let mut model = Model::new();
        let limits = ScheduleTypeLimits::create(&mut model)?;
        limits.set_numeric_type(&mut model, "discrete")?;
        assert_eq!(limits.numeric_type(&model), Some("Discrete"));
        assert!(limits.set_numeric_type(&mut model, "Analog").is_err());
        Ok(())
    }
}
