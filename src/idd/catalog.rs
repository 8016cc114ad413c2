//! Built-in schema table.
//!
//! The types the typed wrapper layer knows about. Field order here is the
//! emission order of the flat text format, so reordering fields is a
//! format change.

use super::{FieldSchema, IddRegistry, ObjectSchema};

pub const VERSION: &str = "Version";
pub const SCHEDULE_TYPE_LIMITS: &str = "ScheduleTypeLimits";
pub const SCHEDULE_CONSTANT: &str = "Schedule:Constant";
pub const CURVE_BIQUADRATIC: &str = "Curve:Biquadratic";
pub const CURVE_QUADRATIC: &str = "Curve:Quadratic";
pub const COIL_COOLING_DX_SINGLE_SPEED: &str = "Coil:Cooling:DX:SingleSpeed";
pub const WATER_HEATER_MIXED: &str = "WaterHeater:Mixed";
pub const ZONE: &str = "Zone";

/// Types acceptable wherever a schedule is referenced.
pub const SCHEDULE_TYPES: &[&str] = &[SCHEDULE_CONSTANT];

/// Current identifier emitted in `Version` records.
pub const VERSION_IDENTIFIER: &str = "1.0";

/// Legal values of `ScheduleTypeLimits` "Unit Type".
pub const UNIT_TYPES: &[&str] = &[
    "Dimensionless",
    "Temperature",
    "DeltaTemperature",
    "Power",
    "Availability",
    "Percent",
];

/// Builds the built-in schema table.
///
/// Infallible by construction: the table is validated in tests, so the
/// only way this panics is a programming error in this file.
pub fn builtin() -> IddRegistry {
    IddRegistry::new(builtin_objects()).expect("built-in schema table is consistent")
}

fn builtin_objects() -> Vec<ObjectSchema> {
    vec![
        ObjectSchema::new(
            VERSION,
            vec![FieldSchema::text("Version Identifier").default_text(VERSION_IDENTIFIER)],
        )
        .unnamed(),
        ObjectSchema::new(
            SCHEDULE_TYPE_LIMITS,
            vec![
                FieldSchema::real("Lower Limit Value"),
                FieldSchema::real("Upper Limit Value"),
                FieldSchema::choice("Numeric Type", &["Continuous", "Discrete"])
                    .default_text("Continuous"),
                FieldSchema::choice("Unit Type", UNIT_TYPES).default_text("Dimensionless"),
            ],
        ),
        ObjectSchema::new(
            SCHEDULE_CONSTANT,
            vec![
                FieldSchema::reference("Schedule Type Limits Name", &[SCHEDULE_TYPE_LIMITS]),
                FieldSchema::real("Hourly Value").default_real(0.0),
            ],
        ),
        ObjectSchema::new(
            CURVE_BIQUADRATIC,
            vec![
                FieldSchema::real("Coefficient1 Constant").required(),
                FieldSchema::real("Coefficient2 x").required(),
                FieldSchema::real("Coefficient3 x**2").required(),
                FieldSchema::real("Coefficient4 y").required(),
                FieldSchema::real("Coefficient5 y**2").required(),
                FieldSchema::real("Coefficient6 x*y").required(),
                FieldSchema::real("Minimum Value of x").required(),
                FieldSchema::real("Maximum Value of x").required(),
                FieldSchema::real("Minimum Value of y").required(),
                FieldSchema::real("Maximum Value of y").required(),
            ],
        ),
        ObjectSchema::new(
            CURVE_QUADRATIC,
            vec![
                FieldSchema::real("Coefficient1 Constant").required(),
                FieldSchema::real("Coefficient2 x").required(),
                FieldSchema::real("Coefficient3 x**2").required(),
                FieldSchema::real("Minimum Value of x").required(),
                FieldSchema::real("Maximum Value of x").required(),
            ],
        ),
        ObjectSchema::new(
            COIL_COOLING_DX_SINGLE_SPEED,
            vec![
                FieldSchema::reference("Availability Schedule Name", SCHEDULE_TYPES),
                FieldSchema::real("Gross Rated Total Cooling Capacity")
                    .units("W")
                    .autosizable()
                    .required()
                    .default_autosize(),
                FieldSchema::real("Gross Rated Sensible Heat Ratio")
                    .autosizable()
                    .default_autosize(),
                FieldSchema::real("Gross Rated COP").units("W/W").default_real(3.0),
                FieldSchema::real("Rated Air Flow Rate")
                    .units("m3/s")
                    .autosizable()
                    .default_autosize(),
                FieldSchema::reference(
                    "Total Cooling Capacity Function of Temperature Curve Name",
                    &[CURVE_BIQUADRATIC],
                )
                .owned()
                .required(),
                FieldSchema::reference(
                    "Energy Input Ratio Function of Temperature Curve Name",
                    &[CURVE_BIQUADRATIC],
                )
                .owned(),
                FieldSchema::reference(
                    "Part Load Fraction Correlation Curve Name",
                    &[CURVE_QUADRATIC],
                )
                .owned(),
            ],
        ),
        ObjectSchema::new(
            WATER_HEATER_MIXED,
            vec![
                FieldSchema::real("Tank Volume").units("m3").autosizable().default_autosize(),
                FieldSchema::reference("Setpoint Temperature Schedule Name", SCHEDULE_TYPES)
                    .required(),
                FieldSchema::real("Deadband Temperature Difference")
                    .units("deltaC")
                    .default_real(2.0),
                FieldSchema::real("Maximum Temperature Limit").units("C"),
                FieldSchema::real("Heater Capacity").units("W").autosizable().default_autosize(),
                FieldSchema::reference("Ambient Temperature Schedule Name", SCHEDULE_TYPES),
            ],
        ),
        ObjectSchema::new(
            ZONE,
            vec![
                FieldSchema::real("Direction of Relative North").units("deg").default_real(0.0),
                FieldSchema::real("X Origin").units("m").default_real(0.0),
                FieldSchema::real("Y Origin").units("m").default_real(0.0),
                FieldSchema::real("Z Origin").units("m").default_real(0.0),
                FieldSchema::integer("Multiplier").default_integer(1),
                FieldSchema::real("Ceiling Height")
                    .units("m")
                    .autocalculatable()
                    .default_autocalculate(),
                FieldSchema::real("Volume")
                    .units("m3")
                    .autocalculatable()
                    .default_autocalculate(),
                FieldSchema::real("Floor Area")
                    .units("m2")
                    .autocalculatable()
                    .default_autocalculate(),
            ],
        ),
    ]
}
