//! Performance curve wrappers.
//!
//! Curves are shared freely: several components may point at the same
//! record, and translation emits it once. The wrappers expose the
//! coefficients as arrays in field order.

use super::{Model, ModelObject};
use crate::Handle;
use crate::error::ModelError;
use crate::idd::catalog;
use crate::workspace::FieldValue;

mod biquadratic_field {
    pub const COEFFICIENTS: usize = 0;
    pub const MIN_X: usize = 6;
    pub const MAX_X: usize = 7;
    pub const MIN_Y: usize = 8;
    pub const MAX_Y: usize = 9;
}

mod quadratic_field {
    pub const COEFFICIENTS: usize = 0;
    pub const MIN_X: usize = 3;
    pub const MAX_X: usize = 4;
}

fn clamp(value: f64, limits: Option<(f64, f64)>) -> f64 {
    match limits {
        Some((lo, hi)) => value.clamp(lo, hi),
        None => value,
    }
}

/// `z = c1 + c2 x + c3 x^2 + c4 y + c5 y^2 + c6 x y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveBiquadratic(Handle);

impl ModelObject for CurveBiquadratic {
    fn type_name() -> &'static str {
        catalog::CURVE_BIQUADRATIC
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl CurveBiquadratic {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    /// The six coefficients in field order; `None` while any is unset.
    pub fn coefficients(&self, model: &Model) -> Option<[f64; 6]> {
        let ws = model.workspace();
        let mut out = [0.0; 6];
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = ws.get_double(self.0, biquadratic_field::COEFFICIENTS + offset)?;
        }
        Some(out)
    }

    pub fn set_coefficients(
        &self,
        model: &mut Model,
        coefficients: [f64; 6],
    ) -> Result<(), ModelError> {
        for (offset, value) in coefficients.into_iter().enumerate() {
            model.workspace_mut().set_field(
                self.0,
                biquadratic_field::COEFFICIENTS + offset,
                FieldValue::Real(value),
            )?;
        }
        Ok(())
    }

    pub fn x_limits(&self, model: &Model) -> Option<(f64, f64)> {
        let ws = model.workspace();
        Some((
            ws.get_double(self.0, biquadratic_field::MIN_X)?,
            ws.get_double(self.0, biquadratic_field::MAX_X)?,
        ))
    }

    pub fn set_x_limits(&self, model: &mut Model, min: f64, max: f64) -> Result<(), ModelError> {
        let ws = model.workspace_mut();
        ws.set_field(self.0, biquadratic_field::MIN_X, FieldValue::Real(min))?;
        ws.set_field(self.0, biquadratic_field::MAX_X, FieldValue::Real(max))?;
        Ok(())
    }

    pub fn y_limits(&self, model: &Model) -> Option<(f64, f64)> {
        let ws = model.workspace();
        Some((
            ws.get_double(self.0, biquadratic_field::MIN_Y)?,
            ws.get_double(self.0, biquadratic_field::MAX_Y)?,
        ))
    }

    pub fn set_y_limits(&self, model: &mut Model, min: f64, max: f64) -> Result<(), ModelError> {
        let ws = model.workspace_mut();
        ws.set_field(self.0, biquadratic_field::MIN_Y, FieldValue::Real(min))?;
        ws.set_field(self.0, biquadratic_field::MAX_Y, FieldValue::Real(max))?;
        Ok(())
    }

    /// Evaluates the curve, clamping inputs into the declared limits.
    /// `None` while any coefficient is unset.
    pub fn evaluate(&self, model: &Model, x: f64, y: f64) -> Option<f64> {
        let [c1, c2, c3, c4, c5, c6] = self.coefficients(model)?;
        let x = clamp(x, self.x_limits(model));
        let y = clamp(y, self.y_limits(model));
        Some(c1 + c2 * x + c3 * x * x + c4 * y + c5 * y * y + c6 * x * y)
    }
}

/// `y = c1 + c2 x + c3 x^2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveQuadratic(Handle);

impl ModelObject for CurveQuadratic {
    fn type_name() -> &'static str {
        catalog::CURVE_QUADRATIC
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl CurveQuadratic {
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        model.create_object()
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn coefficients(&self, model: &Model) -> Option<[f64; 3]> {
        let ws = model.workspace();
        let mut out = [0.0; 3];
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = ws.get_double(self.0, quadratic_field::COEFFICIENTS + offset)?;
        }
        Some(out)
    }

    pub fn set_coefficients(
        &self,
        model: &mut Model,
        coefficients: [f64; 3],
    ) -> Result<(), ModelError> {
        for (offset, value) in coefficients.into_iter().enumerate() {
            model.workspace_mut().set_field(
                self.0,
                quadratic_field::COEFFICIENTS + offset,
                FieldValue::Real(value),
            )?;
        }
        Ok(())
    }

    pub fn x_limits(&self, model: &Model) -> Option<(f64, f64)> {
        let ws = model.workspace();
        Some((
            ws.get_double(self.0, quadratic_field::MIN_X)?,
            ws.get_double(self.0, quadratic_field::MAX_X)?,
        ))
    }

    pub fn set_x_limits(&self, model: &mut Model, min: f64, max: f64) -> Result<(), ModelError> {
        let ws = model.workspace_mut();
        ws.set_field(self.0, quadratic_field::MIN_X, FieldValue::Real(min))?;
        ws.set_field(self.0, quadratic_field::MAX_X, FieldValue::Real(max))?;
        Ok(())
    }

    pub fn evaluate(&self, model: &Model, x: f64) -> Option<f64> {
        let [c1, c2, c3] = self.coefficients(model)?;
        let x = clamp(x, self.x_limits(model));
        Some(c1 + c2 * x + c3 * x * x)
    }
}
