//! Rollback of multi-write rank mutations under induced store faults.

use std::sync::Arc;

use super::helpers::{FaultyStore, ranks, seed};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tasklist::task::{
    adapters::memory::InMemoryTaskStore,
    services::{MoveTaskRequest, ReorderTasksRequest, TaskErrorKind, TaskService},
};

type FaultyService = TaskService<FaultyStore, DefaultClock>;

#[fixture]
fn healthy_store() -> FaultyStore {
    FaultyStore::new(InMemoryTaskStore::new())
}

fn service_over(store: FaultyStore) -> FaultyService {
    TaskService::new(Arc::new(store), Arc::new(DefaultClock))
}

#[rstest]
#[case::first_temporary(1)]
#[case::last_temporary(4)]
#[case::first_final(5)]
#[case::last_final(8)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_reorder_leaves_ranks_untouched(
    healthy_store: FaultyStore,
    #[case] fail_at: usize,
) -> Result<(), eyre::Report> {
    let healthy = service_over(healthy_store.clone());
    let ids = seed(&healthy, &["w", "x", "y", "z"]).await?;
    let before = ranks(&healthy).await?;
    let reversed = ids.iter().rev().copied().collect::<Vec<_>>();

    let faulty = service_over(healthy_store.failing_at(fail_at));
    let err = faulty
        .reorder(ReorderTasksRequest::from(reversed.as_slice()))
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("reorder must fail"))?;

    eyre::ensure!(err.kind() == TaskErrorKind::StoreUnavailable);
    eyre::ensure!(ranks(&healthy).await? == before);
    Ok(())
}

#[rstest]
#[case::sentinel(1)]
#[case::neighbour(2)]
#[case::target(3)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_swap_leaves_ranks_untouched(
    healthy_store: FaultyStore,
    #[case] fail_at: usize,
) -> Result<(), eyre::Report> {
    let healthy = service_over(healthy_store.clone());
    let ids = seed(&healthy, &["first", "second"]).await?;
    let before = ranks(&healthy).await?;
    let second = *ids.last().ok_or_else(|| eyre::eyre!("seeded ids"))?;

    let faulty = service_over(healthy_store.failing_at(fail_at));
    let result = faulty
        .move_adjacent(MoveTaskRequest::new(second, "up"))
        .await;

    eyre::ensure!(result.is_err(), "swap must fail");
    eyre::ensure!(ranks(&healthy).await? == before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_recovers_after_failed_transaction(
    healthy_store: FaultyStore,
) -> Result<(), eyre::Report> {
    let healthy = service_over(healthy_store.clone());
    let ids = seed(&healthy, &["left", "right"]).await?;
    let reversed = ids.iter().rev().copied().collect::<Vec<_>>();

    let faulty = service_over(healthy_store.failing_at(3));
    eyre::ensure!(
        faulty
            .reorder(ReorderTasksRequest::from(reversed.as_slice()))
            .await
            .is_err()
    );

    healthy
        .reorder(ReorderTasksRequest::from(reversed.as_slice()))
        .await?;
    let expected = reversed.iter().copied().zip(1_i64..).collect::<Vec<_>>();
    eyre::ensure!(ranks(&healthy).await? == expected);
    Ok(())
}
