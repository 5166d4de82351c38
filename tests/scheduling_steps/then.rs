//! Then steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, parse_day};
use eyre::{ensure, eyre};
use montage::{
    assembly::{
        domain::{EvidenceError, TaskStatus},
        services::WorkflowError,
    },
    calendar::PlannedAt,
    schedule::{adapters::memory::BackendOperation, domain::Schedulable, services::DropOutcome},
};
use rstest_bdd_macros::then;

#[then("the delay gate opens with {days:u32} delay days")]
fn gate_opens(world: &SchedulingWorld, days: u32) -> Result<(), eyre::Report> {
    let outcome = world
        .last_drop
        .as_ref()
        .ok_or_else(|| eyre!("missing drop result"))?;
    let Ok(DropOutcome::DelayGateOpened(pending)) = outcome else {
        return Err(eyre!("expected the delay gate to open, got {outcome:?}"));
    };
    ensure!(
        pending.delay_days() == days,
        "expected {days} delay days, found {}",
        pending.delay_days()
    );
    let calendar = world
        .calendar
        .as_ref()
        .ok_or_else(|| eyre!("calendar not loaded"))?;
    ensure!(calendar.gate().is_open(), "gate should stay open");
    Ok(())
}

#[then("the delay gate is closed")]
fn gate_closed(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let calendar = world
        .calendar
        .as_ref()
        .ok_or_else(|| eyre!("calendar not loaded"))?;
    ensure!(!calendar.gate().is_open(), "gate should be closed");
    ensure!(
        matches!(world.last_drop, Some(Ok(DropOutcome::Assigned { .. }))),
        "expected a direct assignment, got {:?}",
        world.last_drop
    );
    Ok(())
}

#[then(r#"task "{id}" is planned on "{date}""#)]
fn task_planned_on(world: &SchedulingWorld, id: String, date: String) -> Result<(), eyre::Report> {
    let expected = parse_day(&date)?;
    let stored = world.stored(&id)?;
    ensure!(
        stored.planned_date().map(PlannedAt::date) == Some(expected),
        "expected {id} on {expected}, found {:?}",
        stored.planned_date()
    );
    Ok(())
}

#[then(r#"task "{id}" has status "{status}""#)]
fn task_has_status(world: &SchedulingWorld, id: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre!("invalid expected status in scenario: {err}"))?;
    let stored = world.stored(&id)?;
    ensure!(
        stored.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then(r#"a delay record from "{old}" to "{new}" over {days:u32} days is stored"#)]
fn delay_record_stored(
    world: &SchedulingWorld,
    old: String,
    new: String,
    days: u32,
) -> Result<(), eyre::Report> {
    let records = world.backend.tasks().delay_records()?;
    let [record] = records.as_slice() else {
        return Err(eyre!("expected one delay record, found {}", records.len()));
    };
    ensure!(record.old_date() == parse_day(&old)?, "old date mismatch");
    ensure!(record.new_date() == parse_day(&new)?, "new date mismatch");
    ensure!(record.delay_days() == days, "delay days mismatch");
    ensure!(record.reason() == "malzeme eksik", "reason mismatch");
    ensure!(record.responsible_person_id().as_str() == "P1", "person mismatch");
    Ok(())
}

#[then("completion fails because the customer signature is missing")]
fn completion_needs_signature(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_completion
        .as_ref()
        .ok_or_else(|| eyre!("missing completion result"))?;
    ensure!(
        matches!(
            result,
            Err(WorkflowError::Evidence(EvidenceError::MissingCustomerSignature))
        ),
        "expected a missing signature error, got {result:?}"
    );
    Ok(())
}

#[then("no completion was sent to the backend")]
fn no_completion_sent(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let calls = world.backend.tasks().calls()?;
    ensure!(
        !calls.contains(&BackendOperation::CompleteTask),
        "unexpected backend calls: {calls:?}"
    );
    Ok(())
}

#[then(r#"the cell for "{date}" warns with {count:usize} tasks"#)]
fn cell_warns(world: &SchedulingWorld, date: String, count: usize) -> Result<(), eyre::Report> {
    let calendar = world
        .calendar
        .as_ref()
        .ok_or_else(|| eyre!("calendar not loaded"))?;
    let load = calendar.day_load(parse_day(&date)?);
    ensure!(load.count == count, "expected {count} tasks, found {}", load.count);
    ensure!(load.is_over_limit(), "cell should show the load warning");
    Ok(())
}
