use anyhow::Result;
use epmodel::io::idf::to_idf_string;
use epmodel::model::{ScheduleConstant, WaterHeaterMixed, Zone};
use epmodel::{Model, catalog, translate_document, translate_model};
use std::sync::Arc;

fn main() -> Result<()> {
    let mut model = Model::new();

    let schedule = ScheduleConstant::create(&mut model)?;
    schedule.set_name(&mut model, "Always 60")?;
    schedule.set_hourly_value(&mut model, 60.0)?;

    let heater = WaterHeaterMixed::create(&mut model)?;
    heater.set_name(&mut model, "Service Water Heater")?;
    heater.set_tank_volume(&mut model, 0.3)?;
    heater.set_setpoint_temperature_schedule(&mut model, &schedule)?;

    let zone = Zone::create(&mut model)?;
    zone.set_name(&mut model, "Core Zone")?;
    zone.set_volume(&mut model, 250.0)?;

    let forward = translate_model(&model);
    for diagnostic in &forward.diagnostics {
        eprintln!("{diagnostic}");
    }
    println!("{}", to_idf_string(&forward.document));

    let reversed = translate_document(&forward.document, Arc::new(catalog::builtin()));
    println!(
        "! round trip: {} records back, {} diagnostics",
        reversed.model.workspace().len(),
        reversed.diagnostics.len()
    );
    Ok(())
}
