//! Given steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, parse_day, stage};
use eyre::WrapErr;
use montage::{
    assembly::domain::{CompletionEvidence, TaskStatus},
    calendar::PlannedAt,
    schedule::domain::TeamId,
};
use rstest_bdd_macros::given;

#[given(r#"a planned assembly task "{id}" of job "{job}" on "{date}""#)]
fn planned_task(
    world: &mut SchedulingWorld,
    id: String,
    job: String,
    date: String,
) -> Result<(), eyre::Report> {
    let planned_at = PlannedAt::on(parse_day(&date)?);
    world.seed(stage(&id, &job, 1)?.planned_at(planned_at))
}

#[given(r#"an unplanned assembly task "{id}" of job "{job}""#)]
fn unplanned_task(world: &mut SchedulingWorld, id: String, job: String) -> Result<(), eyre::Report> {
    world.seed(stage(&id, &job, 1)?)
}

#[given(r#"team "{team}" also has an unplanned task "{id}" of job "{job}""#)]
fn unplanned_team_task(
    world: &mut SchedulingWorld,
    team: String,
    id: String,
    job: String,
) -> Result<(), eyre::Report> {
    let team_id = TeamId::new(team).wrap_err("invalid team id in scenario")?;
    world.seed(stage(&id, &job, 1)?.with_team(team_id))
}

#[given(r#"an in-progress assembly task "{id}" of job "{job}" at stage {order:u32}"#)]
fn in_progress_task(
    world: &mut SchedulingWorld,
    id: String,
    job: String,
    order: u32,
) -> Result<(), eyre::Report> {
    world.seed(stage(&id, &job, order)?.with_status(TaskStatus::InProgress))
}

#[given(r#"a pending assembly task "{id}" of job "{job}" at stage {order:u32}"#)]
fn pending_task(
    world: &mut SchedulingWorld,
    id: String,
    job: String,
    order: u32,
) -> Result<(), eyre::Report> {
    world.seed(stage(&id, &job, order)?)
}

#[given(r#"team "{team}" has {count:usize} tasks planned on "{date}""#)]
fn busy_team(
    world: &mut SchedulingWorld,
    team: String,
    count: usize,
    date: String,
) -> Result<(), eyre::Report> {
    let team_id = TeamId::new(team.as_str()).wrap_err("invalid team id in scenario")?;
    let planned_at = PlannedAt::on(parse_day(&date)?);
    for index in 1..=count {
        let task = stage(&format!("{team}-{index}"), &format!("busy-{index}"), 1)?
            .planned_at(planned_at)
            .with_team(team_id.clone());
        world.seed(task)?;
    }
    Ok(())
}

#[given("completion photos are attached without a signature")]
fn photos_attached(world: &mut SchedulingWorld) {
    world.evidence = CompletionEvidence::with_photos("/uploads/before.jpg", "/uploads/after.jpg");
}
