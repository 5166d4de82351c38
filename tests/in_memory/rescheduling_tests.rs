//! In-memory integration tests for calendar rescheduling.

use super::helpers::{clock, config, day, item_id, job_id, role_id, stage, team_id};
use chrono::NaiveTime;
use mockable::DefaultClock;
use montage::{
    assembly::{
        adapters::memory::InMemoryAssemblyBackend,
        domain::{AssemblyTask, TaskStatus},
        services::StageWorkflowEngine,
    },
    calendar::PlannedAt,
    config::SchedulingConfig,
    schedule::{
        adapters::memory::InMemoryScheduleBackend,
        domain::{
            Appointment, AppointmentStatus, DelayJustification, ItemKind, ProductionOrder,
            ProductionOrderStatus, Schedulable,
        },
        services::{DragPayload, DragRescheduleController, DropOutcome, DropTarget, RescheduleError},
    },
};
use rstest::rstest;
use std::sync::Arc;

type OrderController =
    DragRescheduleController<ProductionOrder, InMemoryScheduleBackend<ProductionOrder>, DefaultClock>;
type AppointmentController =
    DragRescheduleController<Appointment, InMemoryScheduleBackend<Appointment>, DefaultClock>;
type TaskController = DragRescheduleController<AssemblyTask, InMemoryAssemblyBackend, DefaultClock>;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn production_order_postponement_is_audited(
    config: SchedulingConfig,
    clock: Arc<DefaultClock>,
) -> eyre::Result<()> {
    let backend = Arc::new(InMemoryScheduleBackend::with_items([ProductionOrder::new(
        item_id("P1"),
        job_id("J1"),
        role_id("pvc"),
    )
    .planned_on(day(2024, 3, 4))
    .with_assembly_date(day(2024, 3, 12))]));
    let mut controller: OrderController =
        DragRescheduleController::new(Arc::clone(&backend), clock, config);
    controller.load().await?;

    let outcome = controller
        .drop_item(DragPayload::new(item_id("P1")), DropTarget::Date(day(2024, 3, 8)))
        .await?;
    let DropOutcome::DelayGateOpened(pending) = &outcome else {
        eyre::bail!("expected the delay gate, got {outcome:?}");
    };
    eyre::ensure!(pending.delay_days() == 4);

    let record = controller
        .confirm_delay(&DelayJustification::new("malzeme eksik", "P1").with_note("profile late"))
        .await?;

    eyre::ensure!(record.entity_type() == ItemKind::ProductionOrder);
    eyre::ensure!(record.note() == Some("profile late"));
    let stored = backend.item(&item_id("P1"))?.ok_or_else(|| eyre::eyre!("order stored"))?;
    eyre::ensure!(stored.planned_date() == Some(PlannedAt::on(day(2024, 3, 8))));
    eyre::ensure!(stored.status() == ProductionOrderStatus::Planned);
    eyre::ensure!(backend.delay_records()? == vec![record]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn production_order_cannot_pass_assembly_date(
    config: SchedulingConfig,
    clock: Arc<DefaultClock>,
) -> eyre::Result<()> {
    let backend = Arc::new(InMemoryScheduleBackend::with_items([ProductionOrder::new(
        item_id("P1"),
        job_id("J1"),
        role_id("pvc"),
    )
    .with_assembly_date(day(2024, 3, 12))]));
    let mut controller: OrderController =
        DragRescheduleController::new(Arc::clone(&backend), clock, config);
    controller.load().await?;

    let result = controller
        .drop_item(DragPayload::new(item_id("P1")), DropTarget::Date(day(2024, 3, 13)))
        .await;

    eyre::ensure!(matches!(result, Err(RescheduleError::Validation(_))));
    eyre::ensure!(backend.item(&item_id("P1"))?.and_then(|o| o.planned_date()).is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appointment_first_placement_uses_default_time(
    config: SchedulingConfig,
    clock: Arc<DefaultClock>,
) -> eyre::Result<()> {
    let default_time = config.default_appointment_time;
    let backend = Arc::new(InMemoryScheduleBackend::with_items([Appointment::new(
        item_id("A1"),
        job_id("J1"),
        "Ayse Yilmaz",
    )]));
    let mut controller: AppointmentController =
        DragRescheduleController::new(Arc::clone(&backend), clock, config);
    controller.load().await?;
    eyre::ensure!(controller.unplanned().len() == 1);

    controller
        .drop_item(DragPayload::new(item_id("A1")), DropTarget::Date(day(2024, 3, 5)))
        .await?;

    let stored = backend.item(&item_id("A1"))?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(stored.appointment_at() == Some(PlannedAt::at(day(2024, 3, 5), default_time)));
    eyre::ensure!(stored.status() == AppointmentStatus::Scheduled);
    eyre::ensure!(controller.unplanned().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postponed_assembly_task_keeps_workflow_in_step(
    config: SchedulingConfig,
    clock: Arc<DefaultClock>,
) -> eyre::Result<()> {
    let backend = Arc::new(InMemoryAssemblyBackend::with_tasks([stage("T1", "J1", "pvc", 1)
        .planned_at(PlannedAt::at(
            day(2024, 3, 10),
            NaiveTime::from_hms_opt(9, 0, 0).ok_or_else(|| eyre::eyre!("time"))?,
        ))
        .with_team(team_id("team-1"))]));
    let mut controller: TaskController =
        DragRescheduleController::new(Arc::clone(&backend), clock, config);
    controller.load().await?;

    controller
        .drop_item(DragPayload::new(item_id("T1")), DropTarget::Date(day(2024, 3, 12)))
        .await?;
    controller
        .confirm_delay(&DelayJustification::new("musteri talebi", "P9"))
        .await?;

    let mut engine = StageWorkflowEngine::new(Arc::clone(&backend));
    engine.load().await?;
    let task = engine.task(&item_id("T1")).ok_or_else(|| eyre::eyre!("task loaded"))?;
    eyre::ensure!(task.planned_date().map(PlannedAt::date) == Some(day(2024, 3, 12)));
    eyre::ensure!(task.team() == Some(&team_id("team-1")));
    eyre::ensure!(task.status() == TaskStatus::Planned);
    let records = backend.tasks().delay_records()?;
    eyre::ensure!(records.len() == 1);
    eyre::ensure!(records.iter().all(|r| r.entity_type() == ItemKind::AssemblyTask));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_assembly_task_moves_without_status_change(
    config: SchedulingConfig,
    clock: Arc<DefaultClock>,
) -> eyre::Result<()> {
    let backend = Arc::new(InMemoryAssemblyBackend::with_tasks([stage("T1", "J1", "pvc", 1)
        .planned_at(PlannedAt::on(day(2024, 3, 10)))
        .with_status(TaskStatus::InProgress)]));
    let mut controller: TaskController =
        DragRescheduleController::new(Arc::clone(&backend), clock, config);
    controller.load().await?;

    controller
        .drop_item(DragPayload::new(item_id("T1")), DropTarget::Date(day(2024, 3, 9)))
        .await?;
    let pool = controller
        .drop_item(DragPayload::new(item_id("T1")), DropTarget::UnplannedPool)
        .await?;

    let stored = backend.tasks().item(&item_id("T1"))?.ok_or_else(|| eyre::eyre!("stored"))?;
    eyre::ensure!(stored.status() == TaskStatus::InProgress);
    eyre::ensure!(stored.planned_date() == Some(PlannedAt::on(day(2024, 3, 9))));
    eyre::ensure!(matches!(pool, DropOutcome::Ignored(_)), "started task stays on the calendar");
    Ok(())
}
