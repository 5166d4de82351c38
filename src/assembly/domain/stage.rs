//! Stage ordering queries over a task collection.
//!
//! Tasks are grouped by job and role and ordered by stage order. First and
//! last stage are answered from the collection passed in, so they follow
//! stage insertions and removals without any stored flag.

use super::{AssemblyDomainError, AssemblyTask};
use crate::schedule::domain::{JobId, RoleId, Schedulable};

/// Tasks of one job role, ascending by stage order.
pub fn stage_group<'a>(
    tasks: impl IntoIterator<Item = &'a AssemblyTask>,
    job_id: &JobId,
    role_id: &RoleId,
) -> Vec<&'a AssemblyTask> {
    let mut group: Vec<_> = tasks
        .into_iter()
        .filter(|task| task.job() == job_id && task.role() == role_id)
        .collect();
    group.sort_by_key(|task| task.stage_order());
    group
}

/// Returns whether `task` is the first stage of its group in `tasks`.
#[must_use]
pub fn is_first_stage(tasks: &[AssemblyTask], task: &AssemblyTask) -> bool {
    stage_group(tasks, task.job(), task.role())
        .first()
        .is_some_and(|first| first.id() == task.id())
}

/// Returns whether `task` is the last stage of its group in `tasks`.
#[must_use]
pub fn is_last_stage(tasks: &[AssemblyTask], task: &AssemblyTask) -> bool {
    stage_group(tasks, task.job(), task.role())
        .last()
        .is_some_and(|last| last.id() == task.id())
}

/// Checks that stage orders of a group run `1..=n` without gaps or
/// duplicates.
///
/// # Errors
///
/// Returns [`AssemblyDomainError::BrokenStageSequence`] listing the orders
/// found.
pub fn check_stage_sequence(
    tasks: &[AssemblyTask],
    job_id: &JobId,
    role_id: &RoleId,
) -> Result<(), AssemblyDomainError> {
    let orders: Vec<u32> = stage_group(tasks, job_id, role_id)
        .into_iter()
        .map(|task| task.stage_order().value())
        .collect();
    let contiguous = orders
        .iter()
        .zip(1_u32..)
        .all(|(order, expected)| *order == expected);
    if contiguous {
        Ok(())
    } else {
        Err(AssemblyDomainError::BrokenStageSequence {
            job_id: job_id.clone(),
            role_id: role_id.clone(),
            orders,
        })
    }
}
