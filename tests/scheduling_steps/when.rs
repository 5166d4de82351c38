//! When steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, item_id, parse_day, run_async};
use eyre::WrapErr;
use montage::schedule::{
    domain::DelayJustification,
    services::{DragPayload, DropTarget},
};
use rstest_bdd_macros::when;

#[when(r#"task "{id}" is dropped on "{date}""#)]
fn drop_task(world: &mut SchedulingWorld, id: String, date: String) -> Result<(), eyre::Report> {
    let target = DropTarget::Date(parse_day(&date)?);
    let payload = DragPayload::new(item_id(&id)?);
    let calendar = world.calendar()?;
    let result = run_async(calendar.drop_item(payload, target));
    world.last_drop = Some(result);
    Ok(())
}

#[when(r#"the delay is justified with reason "{reason}" by "{person}""#)]
fn justify_delay(
    world: &mut SchedulingWorld,
    reason: String,
    person: String,
) -> Result<(), eyre::Report> {
    let form = DelayJustification::new(reason, person);
    let calendar = world.calendar()?;
    run_async(calendar.confirm_delay(&form)).wrap_err("confirm postponement")?;
    Ok(())
}

#[when(r#"task "{id}" is completed"#)]
fn complete_task(world: &mut SchedulingWorld, id: String) -> Result<(), eyre::Report> {
    let task_id = item_id(&id)?;
    let evidence = world.evidence.clone();
    let engine = world.engine()?;
    let result = run_async(engine.complete_task(&task_id, &evidence));
    world.last_completion = Some(result);
    Ok(())
}
