//! Thermal zone wrapper.

use super::{Model, ModelObject};
use crate::Handle;
use crate::error::ModelError;
use crate::idd::catalog;
use crate::workspace::FieldValue;

mod field {
    pub const NORTH: usize = 0;
    pub const X_ORIGIN: usize = 1;
    pub const Y_ORIGIN: usize = 2;
    pub const Z_ORIGIN: usize = 3;
    pub const MULTIPLIER: usize = 4;
    pub const CEILING_HEIGHT: usize = 5;
    pub const VOLUME: usize = 6;
    pub const FLOOR_AREA: usize = 7;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone(Handle);

impl ModelObject for Zone {
    fn type_name() -> &'static str {
        catalog::ZONE
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl Zone {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn direction_of_relative_north(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::NORTH)
    }

    pub fn set_direction_of_relative_north(
        &self,
        model: &mut Model,
        degrees: f64,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::NORTH, FieldValue::Real(degrees))?)
    }

    /// Origin of the zone coordinate system, `(x, y, z)` in metres.
    pub fn origin(&self, model: &Model) -> Option<(f64, f64, f64)> {
        let ws = model.workspace();
        let x = ws.get_double(self.0, field::X_ORIGIN)?;
        let y = ws.get_double(self.0, field::Y_ORIGIN)?;
        let z = ws.get_double(self.0, field::Z_ORIGIN)?;
        Some((x, y, z))
    }

    pub fn set_origin(&self, model: &mut Model, x: f64, y: f64, z: f64) -> Result<(), ModelError> {
        let ws = model.workspace_mut();
        ws.set_field(self.0, field::X_ORIGIN, FieldValue::Real(x))?;
        ws.set_field(self.0, field::Y_ORIGIN, FieldValue::Real(y))?;
        ws.set_field(self.0, field::Z_ORIGIN, FieldValue::Real(z))?;
        Ok(())
    }

    pub fn multiplier(&self, model: &Model) -> Option<i64> {
        model.workspace().get_integer(self.0, field::MULTIPLIER)
    }

    pub fn set_multiplier(&self, model: &mut Model, count: i64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::MULTIPLIER, FieldValue::Integer(count))?)
    }

    pub fn ceiling_height(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::CEILING_HEIGHT)
    }

    pub fn is_ceiling_height_autocalculated(&self, model: &Model) -> bool {
        model.workspace().is_autocalculated(self.0, field::CEILING_HEIGHT)
    }

    pub fn set_ceiling_height(&self, model: &mut Model, metres: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::CEILING_HEIGHT, FieldValue::Real(metres))?)
    }

    pub fn autocalculate_ceiling_height(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::CEILING_HEIGHT, FieldValue::Autocalculate)?)
    }

    pub fn volume(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::VOLUME)
    }

    pub fn is_volume_autocalculated(&self, model: &Model) -> bool {
        model.workspace().is_autocalculated(self.0, field::VOLUME)
    }

    pub fn set_volume(&self, model: &mut Model, cubic_metres: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::VOLUME, FieldValue::Real(cubic_metres))?)
    }

    pub fn autocalculate_volume(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::VOLUME, FieldValue::Autocalculate)?)
    }

    pub fn floor_area(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::FLOOR_AREA)
    }

    pub fn is_floor_area_autocalculated(&self, model: &Model) -> bool {
        model.workspace().is_autocalculated(self.0, field::FLOOR_AREA)
    }

    pub fn set_floor_area(&self, model: &mut Model, square_metres: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::FLOOR_AREA, FieldValue::Real(square_metres))?)
    }

    pub fn autocalculate_floor_area(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::FLOOR_AREA, FieldValue::Autocalculate)?)
    }
}
