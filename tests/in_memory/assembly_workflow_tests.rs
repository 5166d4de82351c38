//! In-memory integration tests for the assembly stage workflow.

use super::helpers::{config, day, item_id, job_id, stage, team_id};
use montage::{
    assembly::{
        adapters::memory::{InMemoryAssemblyBackend, InMemoryDocumentStore},
        domain::{EvidenceDraft, EvidenceError, EvidenceKind, IssueReport, TaskStatus},
        services::{EvidenceUploader, IssueLedger, StageWorkflowEngine, WorkflowError},
    },
    calendar::PlannedAt,
    config::SchedulingConfig,
    schedule::{
        domain::Schedulable,
        services::{AvailabilityAdvisor, PlanningDraft},
    },
};
use rstest::{fixture, rstest};
use std::sync::Arc;

type Engine = StageWorkflowEngine<InMemoryAssemblyBackend>;

#[fixture]
fn backend() -> Arc<InMemoryAssemblyBackend> {
    Arc::new(InMemoryAssemblyBackend::with_tasks([
        stage("pvc-1", "J1", "pvc", 1),
        stage("pvc-2", "J1", "pvc", 2),
    ]))
}

async fn upload_photos(
    uploader: &EvidenceUploader<InMemoryDocumentStore>,
    draft: &mut EvidenceDraft,
) -> eyre::Result<()> {
    let job = job_id("J1");
    uploader
        .upload(draft, &job, EvidenceKind::Before, "before.jpg", vec![1])
        .await?;
    uploader
        .upload(draft, &job, EvidenceKind::After, "after.jpg", vec![2])
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn job_role_is_installed_stage_by_stage(
    backend: Arc<InMemoryAssemblyBackend>,
    config: SchedulingConfig,
) -> eyre::Result<()> {
    let mut engine: Engine = StageWorkflowEngine::new(Arc::clone(&backend));
    engine.load().await?;
    let ledger = IssueLedger::new(&config);
    let store = Arc::new(InMemoryDocumentStore::new());
    let uploader = EvidenceUploader::new(Arc::clone(&store));

    for (id, date) in [("pvc-1", day(2024, 3, 11)), ("pvc-2", day(2024, 3, 12))] {
        engine
            .plan_task(&item_id(id), PlannedAt::on(date), Some(team_id("team-1")))
            .await?;
    }

    let first = item_id("pvc-1");
    engine.start_task(&first).await?;
    let issue_photo = uploader
        .upload(
            &mut EvidenceDraft::new(),
            &job_id("J1"),
            EvidenceKind::Issue,
            "crack.jpg",
            vec![9],
        )
        .await?;
    let reported = ledger
        .report_issue(
            &mut engine,
            &first,
            &IssueReport::new("broken", "frame", "production", issue_photo).with_replacement(),
        )
        .await?;
    let order_id = reported
        .replacement_order_id
        .clone()
        .ok_or_else(|| eyre::eyre!("replacement order requested"))?;
    eyre::ensure!(backend.production_orders().item(&order_id)?.is_some());
    ledger
        .resolve_issue(&mut engine, &first, reported.issue.id())
        .await?;
    engine.start_task(&first).await?;

    let mut draft = EvidenceDraft::new();
    upload_photos(&uploader, &mut draft).await?;
    engine.complete_task(&first, draft.evidence()).await?;

    let last = item_id("pvc-2");
    engine.start_task(&last).await?;
    let unsigned = engine.complete_task(&last, draft.evidence()).await;
    eyre::ensure!(matches!(
        unsigned,
        Err(WorkflowError::Evidence(EvidenceError::MissingCustomerSignature))
    ));
    uploader
        .upload(&mut draft, &job_id("J1"), EvidenceKind::Signature, "sig.png", vec![3])
        .await?;
    engine.complete_task(&last, &draft.into_evidence()).await?;

    eyre::ensure!(
        engine
            .job_tasks(&job_id("J1"))
            .iter()
            .all(|task| task.status() == TaskStatus::Completed)
    );
    eyre::ensure!(store.documents()?.len() == 4);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planning_draft_warns_about_busy_team(
    backend: Arc<InMemoryAssemblyBackend>,
) -> eyre::Result<()> {
    let mut engine: Engine = StageWorkflowEngine::new(Arc::clone(&backend));
    engine.load().await?;
    engine
        .plan_task(
            &item_id("pvc-1"),
            PlannedAt::on(day(2024, 3, 15)),
            Some(team_id("team-1")),
        )
        .await?;
    let advisor = AvailabilityAdvisor::new(Arc::clone(&backend));
    let mut draft = PlanningDraft::new();

    draft.set_team(&advisor, Some(team_id("team-1"))).await;
    eyre::ensure!(draft.warning().is_none(), "no date chosen yet");
    draft.set_date(&advisor, Some(day(2024, 3, 15))).await;
    eyre::ensure!(
        draft
            .warning()
            .is_some_and(|warning| warning.contains("1 other task"))
    );
    draft.set_date(&advisor, Some(day(2024, 3, 16))).await;
    eyre::ensure!(draft.warning().is_none());

    engine
        .plan_task(
            &item_id("pvc-2"),
            PlannedAt::on(day(2024, 3, 15)),
            Some(team_id("team-1")),
        )
        .await?;
    let task = engine
        .task(&item_id("pvc-2"))
        .ok_or_else(|| eyre::eyre!("task loaded"))?;
    eyre::ensure!(task.planned_date() == Some(PlannedAt::on(day(2024, 3, 15))));
    Ok(())
}
