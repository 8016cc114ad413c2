//! Single-speed DX cooling coil wrapper.
//!
//! The coil owns its performance curves: creation wires in a standard set,
//! removal takes them along and cloning duplicates them. See the ownership
//! flags on the schema table.

use super::curves::{CurveBiquadratic, CurveQuadratic};
use super::schedules::ScheduleConstant;
use super::{Model, ModelObject};
use crate::Handle;
use crate::error::ModelError;
use crate::idd::catalog;
use crate::workspace::FieldValue;

mod field {
    pub const AVAILABILITY_SCHEDULE: usize = 0;
    pub const TOTAL_COOLING_CAPACITY: usize = 1;
    pub const SENSIBLE_HEAT_RATIO: usize = 2;
    pub const COP: usize = 3;
    pub const AIR_FLOW_RATE: usize = 4;
    pub const CAPACITY_CURVE: usize = 5;
    pub const EIR_CURVE: usize = 6;
    pub const PLF_CURVE: usize = 7;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilCoolingDxSingleSpeed(Handle);

impl ModelObject for CoilCoolingDxSingleSpeed {
    fn type_name() -> &'static str {
        catalog::COIL_COOLING_DX_SINGLE_SPEED
    }

    fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    fn handle(&self) -> Handle {
        self.0
    }
}

impl CoilCoolingDxSingleSpeed {
    /// Creates a coil with the standard DOE-2 performance curve set wired
    /// into the owned curve fields.
    pub fn create(model: &mut Model) -> Result<Self, ModelError> {
        let coil: Self = model.create_object()?;

        let cap_ft = CurveBiquadratic::create(model)?;
        cap_ft.set_name(model, "DX Coil Cap-FT")?;
        cap_ft.set_coefficients(
            model,
            [0.942587793, 0.009543347, 0.000683770, -0.011042676, 0.000005249, -0.000009720],
        )?;
        cap_ft.set_x_limits(model, 17.0, 22.0)?;
        cap_ft.set_y_limits(model, 13.0, 46.0)?;

        let eir_ft = CurveBiquadratic::create(model)?;
        eir_ft.set_name(model, "DX Coil EIR-FT")?;
        eir_ft.set_coefficients(
            model,
            [0.342414409, 0.034885008, -0.000623700, 0.004977216, 0.000437951, -0.000728028],
        )?;
        eir_ft.set_x_limits(model, 17.0, 22.0)?;
        eir_ft.set_y_limits(model, 13.0, 46.0)?;

        let plf = CurveQuadratic::create(model)?;
        plf.set_name(model, "DX Coil PLF")?;
        plf.set_coefficients(model, [0.85, 0.15, 0.0])?;
        plf.set_x_limits(model, 0.0, 1.0)?;

        let ws = model.workspace_mut();
        ws.set_pointer(coil.0, field::CAPACITY_CURVE, Some(cap_ft.handle()))?;
        ws.set_pointer(coil.0, field::EIR_CURVE, Some(eir_ft.handle()))?;
        ws.set_pointer(coil.0, field::PLF_CURVE, Some(plf.handle()))?;
        Ok(coil)
    }

    pub fn name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        model.workspace().name(self.0)
    }

    pub fn set_name(&self, model: &mut Model, name: &str) -> Result<String, ModelError> {
        Ok(model.workspace_mut().set_name(self.0, name)?)
    }

    pub fn availability_schedule(&self, model: &Model) -> Option<ScheduleConstant> {
        let handle = model.workspace().get_pointer(self.0, field::AVAILABILITY_SCHEDULE)?;
        model.get(handle)
    }

    /// Assigns the availability schedule through the compatibility check
    /// (the field requires `Availability` limits).
    pub fn set_availability_schedule(
        &self,
        model: &mut Model,
        schedule: &ScheduleConstant,
    ) -> Result<(), ModelError> {
        model.set_schedule(self.0, field::AVAILABILITY_SCHEDULE, schedule.handle())
    }

    pub fn rated_total_cooling_capacity(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::TOTAL_COOLING_CAPACITY)
    }

    pub fn is_rated_total_cooling_capacity_autosized(&self, model: &Model) -> bool {
        model.workspace().is_autosized(self.0, field::TOTAL_COOLING_CAPACITY)
    }

    pub fn set_rated_total_cooling_capacity(
        &self,
        model: &mut Model,
        value: f64,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::TOTAL_COOLING_CAPACITY, FieldValue::Real(value))?)
    }

    pub fn autosize_rated_total_cooling_capacity(&self, model: &mut Model) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::TOTAL_COOLING_CAPACITY, FieldValue::Autosize)?)
    }

    pub fn rated_sensible_heat_ratio(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::SENSIBLE_HEAT_RATIO)
    }

    pub fn is_rated_sensible_heat_ratio_autosized(&self, model: &Model) -> bool {
        model.workspace().is_autosized(self.0, field::SENSIBLE_HEAT_RATIO)
    }

    pub fn set_rated_sensible_heat_ratio(
        &self,
        model: &mut Model,
        value: f64,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::SENSIBLE_HEAT_RATIO, FieldValue::Real(value))?)
    }

    pub fn rated_cop(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::COP)
    }

    pub fn set_rated_cop(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::COP, FieldValue::Real(value))?)
    }

    pub fn rated_air_flow_rate(&self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.0, field::AIR_FLOW_RATE)
    }

    pub fn is_rated_air_flow_rate_autosized(&self, model: &Model) -> bool {
        model.workspace().is_autosized(self.0, field::AIR_FLOW_RATE)
    }

    pub fn set_rated_air_flow_rate(&self, model: &mut Model, value: f64) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_field(self.0, field::AIR_FLOW_RATE, FieldValue::Real(value))?)
    }

    pub fn total_cooling_capacity_curve(&self, model: &Model) -> Option<CurveBiquadratic> {
        let handle = model.workspace().get_pointer(self.0, field::CAPACITY_CURVE)?;
        model.get(handle)
    }

    pub fn set_total_cooling_capacity_curve(
        &self,
        model: &mut Model,
        curve: &CurveBiquadratic,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.0, field::CAPACITY_CURVE, Some(curve.handle()))?)
    }

    pub fn energy_input_ratio_curve(&self, model: &Model) -> Option<CurveBiquadratic> {
        let handle = model.workspace().get_pointer(self.0, field::EIR_CURVE)?;
        model.get(handle)
    }

    pub fn set_energy_input_ratio_curve(
        &self,
        model: &mut Model,
        curve: &CurveBiquadratic,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.0, field::EIR_CURVE, Some(curve.handle()))?)
    }

    pub fn part_load_fraction_curve(&self, model: &Model) -> Option<CurveQuadratic> {
        let handle = model.workspace().get_pointer(self.0, field::PLF_CURVE)?;
        model.get(handle)
    }

    pub fn set_part_load_fraction_curve(
        &self,
        model: &mut Model,
        curve: &CurveQuadratic,
    ) -> Result<(), ModelError> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.0, field::PLF_CURVE, Some(curve.handle()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_field_order_matches_catalog() -> Result<()> {
        let registry = catalog::builtin();
        let coil = catalog::COIL_COOLING_DX_SINGLE_SPEED;
        assert_eq!(
            registry.field_index(coil, "Availability Schedule Name")?,
            field::AVAILABILITY_SCHEDULE
        );
        assert_eq!(
            registry.field_index(coil, "Gross Rated Total Cooling Capacity")?,
            field::TOTAL_COOLING_CAPACITY
        );
        assert_eq!(registry.field_index(coil, "Gross Rated COP")?, field::COP);
        assert_eq!(
            registry.field_index(coil, "Total Cooling Capacity Function of Temperature Curve Name")?,
            field::CAPACITY_CURVE
        );
        assert_eq!(
            registry.field_index(coil, "Part Load Fraction Correlation Curve Name")?,
            field::PLF_CURVE
        );
        Ok(())
    }

    #[test]
    fn test_create_wires_default_curves() -> Result<()> {
        let mut model = Model::new();
        let coil = CoilCoolingDxSingleSpeed::create(&mut model)?;

        let cap = coil.total_cooling_capacity_curve(&model).unwrap();
        let eir = coil.energy_input_ratio_curve(&model).unwrap();
        let plf = coil.part_load_fraction_curve(&model).unwrap();
        assert_ne!(cap.handle(), eir.handle());
        assert_eq!(plf.coefficients(&model), Some([0.85, 0.15, 0.0]));

        // Rating conditions: the capacity curve is normalized near 1.
        let z = cap.evaluate(&model, 19.4, 35.0).unwrap();
        assert!((z - 1.0).abs() < 0.05, "cap-ft at rating was {z}");
        model.workspace().validate()
    }

    #[test]
    fn test_capacity_autosize_duality() -> Result<()> {
        let mut model = Model::new();
        let coil = CoilCoolingDxSingleSpeed::create(&mut model)?;

        // Default state is autosized: flag set, no numeric value.
        assert!(coil.is_rated_total_cooling_capacity_autosized(&model));
        assert_eq!(coil.rated_total_cooling_capacity(&model), None);

        coil.set_rated_total_cooling_capacity(&mut model, 12500.0)?;
        assert!(!coil.is_rated_total_cooling_capacity_autosized(&model));
        assert_eq!(coil.rated_total_cooling_capacity(&model), Some(12500.0));

        coil.autosize_rated_total_cooling_capacity(&mut model)?;
        assert!(coil.is_rated_total_cooling_capacity_autosized(&model));
        assert_eq!(coil.rated_total_cooling_capacity(&model), None);
        Ok(())
    }

    #[test]
    fn test_availability_schedule_bounds_are_enforced() -> Result<()> {
        use crate::model::ScheduleTypeLimits;

        let mut model = Model::new();
        let coil = CoilCoolingDxSingleSpeed::create(&mut model)?;

        // Availability limits must stay inside [0, 1].
        let schedule = ScheduleConstant::create(&mut model)?;
        let wide = ScheduleTypeLimits::create(&mut model)?;
        wide.set_unit_type(&mut model, "Availability")?;
        wide.set_lower_limit(&mut model, 0.0)?;
        wide.set_upper_limit(&mut model, 5.0)?;
        schedule.set_schedule_type_limits(&mut model, &wide)?;
        assert!(coil.set_availability_schedule(&mut model, &schedule).is_err());
        assert!(coil.availability_schedule(&model).is_none());

        // A schedule without limits is accepted and picks up bounded ones.
        let bare = ScheduleConstant::create(&mut model)?;
        bare.set_hourly_value(&mut model, 1.0)?;
        coil.set_availability_schedule(&mut model, &bare)?;
        let limits = bare.schedule_type_limits(&model).unwrap();
        assert_eq!(limits.unit_type(&model), Some("Availability"));
        assert_eq!(limits.lower_limit(&model), Some(0.0));
        assert_eq!(limits.upper_limit(&model), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_removing_coil_removes_owned_curves() -> Result<()> {
        let mut model = Model::new();
        let coil = CoilCoolingDxSingleSpeed::create(&mut model)?;
        let cap = coil.total_cooling_capacity_curve(&model).unwrap();

        let removed = model.workspace_mut().remove(coil.handle())?;
        assert_eq!(removed.len(), 4);
        assert!(!model.workspace().contains(cap.handle()));
        model.workspace().validate()
    }
}
