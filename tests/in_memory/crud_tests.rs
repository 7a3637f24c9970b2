//! Create, edit, remove and list behaviour through the task service.

use super::helpers::{FAR_DUE_DATE, MemoryService, ranks, seed, service};
use rstest::rstest;
use serde_json::json;
use tasklist::task::{
    domain::TaskId,
    services::{CreateTaskRequest, TaskErrorKind, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_serialises_with_display_values(
    service: MemoryService,
) -> Result<(), eyre::Report> {
    let task = service
        .create(CreateTaskRequest::new(" Groceries ", "7,5", "2999-01-02"))
        .await?;

    let value = serde_json::to_value(&task)?;

    eyre::ensure!(
        value
            == json!({
                "id": task.id().value(),
                "name": "Groceries",
                "cost": "7.50",
                "due_date": "2999-01-02",
                "rank": 1,
            }),
        "unexpected JSON: {value}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_then_find_returns_new_fields(service: MemoryService) -> Result<(), eyre::Report> {
    let ids = seed(&service, &["draft"]).await?;
    let id = *ids.first().ok_or_else(|| eyre::eyre!("seeded id"))?;

    service
        .update(UpdateTaskRequest::new(id, "final", "3", FAR_DUE_DATE))
        .await?;
    let found = service
        .find(id)
        .await?
        .ok_or_else(|| eyre::eyre!("edited task should exist"))?;

    eyre::ensure!(found.name().as_str() == "final");
    eyre::ensure!(found.cost().to_string() == "3.00");
    eyre::ensure!(found.rank().value() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_edit_changes_nothing(service: MemoryService) -> Result<(), eyre::Report> {
    let ids = seed(&service, &["keep", "other"]).await?;
    let id = *ids.first().ok_or_else(|| eyre::eyre!("seeded id"))?;
    let before = service.find(id).await?;

    let err = service
        .update(UpdateTaskRequest::new(id, "other", "3", FAR_DUE_DATE))
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("name clash must be rejected"))?;

    eyre::ensure!(err.kind() == TaskErrorKind::Conflict);
    eyre::ensure!(service.find(id).await? == before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_keeps_other_ranks_and_frees_the_name(
    service: MemoryService,
) -> Result<(), eyre::Report> {
    let ids = seed(&service, &["a", "b", "c"]).await?;
    let [a, b, c] = <[TaskId; 3]>::try_from(ids).map_err(|_| eyre::eyre!("three ids"))?;

    service.delete(b).await?;
    eyre::ensure!(ranks(&service).await? == vec![(a, 1), (c, 3)]);
    eyre::ensure!(service.find(b).await?.is_none());

    let again = service
        .create(CreateTaskRequest::new("b", "1", FAR_DUE_DATE))
        .await?;
    eyre::ensure!(again.rank().value() == 4);
    eyre::ensure!(again.id() != b);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_list_has_zero_total(service: MemoryService) -> Result<(), eyre::Report> {
    let list = service.list().await?;

    eyre::ensure!(list.is_empty());
    eyre::ensure!(list.total_cost().to_string() == "0.00");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_total_sums_every_task(service: MemoryService) -> Result<(), eyre::Report> {
    for (name, cost) in [("rent", "950"), ("power", "80.25"), ("water", "19,9")] {
        service
            .create(CreateTaskRequest::new(name, cost, FAR_DUE_DATE))
            .await?;
    }

    let list = service.list().await?;

    eyre::ensure!(list.len() == 3);
    eyre::ensure!(list.total_cost().to_string() == "1050.15");
    Ok(())
}
