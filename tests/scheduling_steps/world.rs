//! Shared world state for scheduling BDD scenarios.

use std::sync::Arc;

use chrono::NaiveDate;
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use montage::{
    assembly::{
        adapters::memory::InMemoryAssemblyBackend,
        domain::{AssemblyTask, CompletionEvidence, StageOrder, TaskStatus},
        services::{StageWorkflowEngine, WorkflowResult},
    },
    config::{CatalogEntry, SchedulingConfig},
    schedule::{
        domain::{ItemId, JobId, RoleId},
        services::{DragRescheduleController, DropOutcome, RescheduleResult},
    },
};
use rstest::fixture;

/// Calendar controller used by the BDD world.
pub type TaskCalendar = DragRescheduleController<AssemblyTask, InMemoryAssemblyBackend, DefaultClock>;

/// Workflow engine used by the BDD world.
pub type TaskEngine = StageWorkflowEngine<InMemoryAssemblyBackend>;

/// Scenario world for scheduling behaviour tests.
pub struct SchedulingWorld {
    pub backend: Arc<InMemoryAssemblyBackend>,
    pub config: SchedulingConfig,
    pub calendar: Option<TaskCalendar>,
    pub engine: Option<TaskEngine>,
    pub evidence: CompletionEvidence,
    pub last_drop: Option<RescheduleResult<DropOutcome<TaskStatus>>>,
    pub last_completion: Option<WorkflowResult<()>>,
}

impl SchedulingWorld {
    /// Creates a world over an empty backend.
    #[must_use]
    pub fn new() -> Self {
        let config = SchedulingConfig {
            delay_reasons: vec![CatalogEntry::new("malzeme eksik", "Missing material")],
            ..SchedulingConfig::default()
        };
        Self {
            backend: Arc::new(InMemoryAssemblyBackend::with_tasks(Vec::new())),
            config,
            calendar: None,
            engine: None,
            evidence: CompletionEvidence::default(),
            last_drop: None,
            last_completion: None,
        }
    }

    /// Stores a task in the backend.
    pub fn seed(&self, task: AssemblyTask) -> Result<(), eyre::Report> {
        self.backend
            .tasks()
            .insert(task)
            .wrap_err("seed assembly task")
    }

    /// Returns the calendar, loading it on first use.
    pub fn calendar(&mut self) -> Result<&mut TaskCalendar, eyre::Report> {
        if self.calendar.is_none() {
            let mut calendar = DragRescheduleController::new(
                Arc::clone(&self.backend),
                Arc::new(DefaultClock),
                self.config.clone(),
            );
            run_async(calendar.load()).wrap_err("load calendar")?;
            self.calendar = Some(calendar);
        }
        self.calendar
            .as_mut()
            .ok_or_else(|| eyre!("calendar not loaded"))
    }

    /// Returns the workflow engine, loading it on first use.
    pub fn engine(&mut self) -> Result<&mut TaskEngine, eyre::Report> {
        if self.engine.is_none() {
            let mut engine = StageWorkflowEngine::new(Arc::clone(&self.backend));
            run_async(engine.load()).wrap_err("load assembly tasks")?;
            self.engine = Some(engine);
        }
        self.engine
            .as_mut()
            .ok_or_else(|| eyre!("workflow engine not loaded"))
    }

    /// Returns the stored copy of a task.
    pub fn stored(&self, id: &str) -> Result<AssemblyTask, eyre::Report> {
        self.backend
            .tasks()
            .item(&item_id(id)?)?
            .ok_or_else(|| eyre!("task {id} not stored"))
    }
}

impl Default for SchedulingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SchedulingWorld {
    SchedulingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a `YYYY-MM-DD` date from a step.
pub fn parse_day(value: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .wrap_err_with(|| format!("invalid date in scenario: {value}"))
}

/// Parses an item identifier from a step.
pub fn item_id(value: &str) -> Result<ItemId, eyre::Report> {
    ItemId::new(value).wrap_err("invalid item id in scenario")
}

/// Builds a pending single-role stage of `job`.
pub fn stage(id: &str, job: &str, order: u32) -> Result<AssemblyTask, eyre::Report> {
    Ok(AssemblyTask::new(
        item_id(id)?,
        JobId::new(job).wrap_err("invalid job id in scenario")?,
        RoleId::new("pvc").wrap_err("invalid role id in scenario")?,
        format!("pvc stage {order}"),
        StageOrder::new(order).wrap_err("invalid stage order in scenario")?,
    ))
}
