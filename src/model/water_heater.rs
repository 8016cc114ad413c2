//! Mixed water heater wrapper.

use super::schedules::ScheduleConstant;
use super::{Model, ModelObject};
use crate::Handle;
use crate::error::ModelError;
use crate::idd::catalog;
use crate::workspace::FieldValue;

mod field {
    pub const TANK_VOLUME: usize = 0;
    pub const SETPOINT_SCHEDULE: usize = 1;
    pub const DEADBAND: usize = 2;
    pub const MAX_TEMPERATURE: usize = 3;
    pub const HEATER_CAPACITY: usize = 4;
    pub const AMBIENT_SCHEDULE: usize = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterHeaterMixed(Handle);

impl ModelObject for WaterHeaterMixed {
    fn type_name() -> &'static str {
        catalog::WATER_HEATER_MIXED
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl WaterHeaterMixed {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn tank_volume(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::TANK_VOLUME)
    }

    pub fn is_tank_volume_autosized(&self, model: &Model) -> bool {
        model.workspace().is_autosized(self.0, field::TANK_VOLUME)
    }

    pub fn set_tank_volume(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::TANK_VOLUME, FieldValue::Real(value))?)
    }

    pub fn autosize_tank_volume(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::TANK_VOLUME, FieldValue::Autosize)?)
    }

    pub fn setpoint_temperature_schedule(&self, model: &Model) -> Option<ScheduleConstant> {
        let handle = model.workspace().get_pointer(self.0, field::SETPOINT_SCHEDULE)?;
        model.get(handle)
    }

    /// Assigns the setpoint schedule through the compatibility check (the
    /// field requires `Temperature` limits).
    pub fn set_setpoint_temperature_schedule(
        &self,
        model: &mut Model,
        schedule: &ScheduleConstant,
    ) -> Result<(), ModelError> {
        model.set_schedule(self.0, field::SETPOINT_SCHEDULE, schedule.handle())
    }

    pub fn deadband_temperature_difference(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::DEADBAND)
    }

    pub fn set_deadband_temperature_difference(
        &self,
        model: &mut Model,
        value: f64,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::DEADBAND, FieldValue::Real(value))?)
    }

    pub fn maximum_temperature_limit(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::MAX_TEMPERATURE)
    }

    pub fn set_maximum_temperature_limit(
        &self,
        model: &mut Model,
        value: f64,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::MAX_TEMPERATURE, FieldValue::Real(value))?)
    }

    pub fn heater_capacity(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::HEATER_CAPACITY)
    }

    pub fn is_heater_capacity_autosized(&self, model: &Model) -> bool {
        model.workspace().is_autosized(self.0, field::HEATER_CAPACITY)
    }

    pub fn set_heater_capacity(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::HEATER_CAPACITY, FieldValue::Real(value))?)
    }

    pub fn autosize_heater_capacity(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::HEATER_CAPACITY, FieldValue::Autosize)?)
    }

    pub fn ambient_temperature_schedule(&self, model: &Model) -> Option<ScheduleConstant> {
        let handle = model.workspace().get_pointer(self.0, field::AMBIENT_SCHEDULE)?;
        model.get(handle)
    }

    pub fn set_ambient_temperature_schedule(
        &self,
        model: &mut Model,
        schedule: &ScheduleConstant,
    ) -> Result<(), ModelError> {
        model.set_schedule(self.0, field::AMBIENT_SCHEDULE, schedule.handle())
    }
}
