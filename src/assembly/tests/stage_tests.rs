//! Tests for derived first and last stage queries.

use super::stage;
use crate::{
    assembly::domain::{
        AssemblyDomainError, AssemblyTask, check_stage_sequence, is_first_stage, is_last_stage,
        stage_group,
    },
    schedule::domain::{JobId, RoleId, Schedulable},
};
use rstest::{fixture, rstest};

#[fixture]
fn tasks() -> Vec<AssemblyTask> {
    vec![
        stage("pvc-3", "J1", "pvc", 3),
        stage("pvc-1", "J1", "pvc", 1),
        stage("glass-1", "J1", "glass", 1),
        stage("pvc-2", "J1", "pvc", 2),
        stage("other", "J2", "pvc", 1),
    ]
}

fn job(value: &str) -> JobId {
    JobId::new(value).expect("valid job id")
}

fn role(value: &str) -> RoleId {
    RoleId::new(value).expect("valid role id")
}

fn find<'a>(tasks: &'a [AssemblyTask], id: &str) -> &'a AssemblyTask {
    tasks
        .iter()
        .find(|task| task.id().as_str() == id)
        .expect("task exists")
}

#[rstest]
fn group_is_sorted_by_stage_order(tasks: Vec<AssemblyTask>) {
    let ids: Vec<_> = stage_group(&tasks, &job("J1"), &role("pvc"))
        .into_iter()
        .map(|task| task.id().as_str())
        .collect();

    assert_eq!(ids, vec!["pvc-1", "pvc-2", "pvc-3"]);
}

#[rstest]
#[case("pvc-1", true, false)]
#[case("pvc-2", false, false)]
#[case("pvc-3", false, true)]
#[case("glass-1", true, true)]
#[case("other", true, true)]
fn first_and_last_are_derived(
    tasks: Vec<AssemblyTask>,
    #[case] id: &str,
    #[case] first: bool,
    #[case] last: bool,
) {
    let task = find(&tasks, id);

    assert_eq!(is_first_stage(&tasks, task), first);
    assert_eq!(is_last_stage(&tasks, task), last);
}

#[rstest]
fn every_group_has_exactly_one_first_and_one_last(tasks: Vec<AssemblyTask>) {
    for (job_id, role_id) in [("J1", "pvc"), ("J1", "glass"), ("J2", "pvc")] {
        let group = stage_group(&tasks, &job(job_id), &role(role_id));
        let firsts = group.iter().filter(|task| is_first_stage(&tasks, task)).count();
        let lasts = group.iter().filter(|task| is_last_stage(&tasks, task)).count();
        assert_eq!((firsts, lasts), (1, 1), "group {job_id}/{role_id}");
    }
}

#[rstest]
fn last_stage_follows_stage_insertion(mut tasks: Vec<AssemblyTask>) {
    assert!(is_last_stage(&tasks, find(&tasks, "pvc-3")));

    tasks.push(stage("pvc-4", "J1", "pvc", 4));

    assert!(!is_last_stage(&tasks, find(&tasks, "pvc-3")));
    assert!(is_last_stage(&tasks, find(&tasks, "pvc-4")));
}

#[rstest]
fn last_stage_follows_stage_removal(mut tasks: Vec<AssemblyTask>) {
    tasks.retain(|task| task.id().as_str() != "pvc-3");

    assert!(is_last_stage(&tasks, find(&tasks, "pvc-2")));
}

#[rstest]
fn contiguous_orders_pass_sequence_check(tasks: Vec<AssemblyTask>) {
    assert_eq!(check_stage_sequence(&tasks, &job("J1"), &role("pvc")), Ok(()));
}

#[rstest]
#[case(vec![1, 3])]
#[case(vec![1, 1])]
#[case(vec![2])]
fn gaps_and_duplicates_fail_sequence_check(#[case] orders: Vec<u32>) {
    let tasks: Vec<_> = orders
        .iter()
        .enumerate()
        .map(|(index, order)| stage(&format!("t{index}"), "J9", "pvc", *order))
        .collect();

    let result = check_stage_sequence(&tasks, &job("J9"), &role("pvc"));

    assert_eq!(
        result,
        Err(AssemblyDomainError::BrokenStageSequence {
            job_id: job("J9"),
            role_id: role("pvc"),
            orders,
        })
    );
}
