//! Then steps for task ordering BDD scenarios.

use super::world::{OrderingWorld, run_async, split_list};
use rstest_bdd_macros::then;
use tasklist::task::{domain::TaskId, services::MoveOutcome};

fn expected_ranks(
    world: &OrderingWorld,
    spec: &str,
) -> Result<Vec<(TaskId, i64)>, eyre::Report> {
    split_list(spec)
        .map(|entry| {
            let (name, rank) = entry
                .split_once(':')
                .ok_or_else(|| eyre::eyre!("expected NAME:RANK, got '{entry}'"))?;
            Ok((world.id_of(name.trim())?, rank.trim().parse::<i64>()?))
        })
        .collect()
}

#[then(r#"the ranks are "{ranks}""#)]
fn ranks_are(world: &OrderingWorld, ranks: String) -> Result<(), eyre::Report> {
    let expected = expected_ranks(world, &ranks)?;
    let list = run_async(world.service.list()).map_err(|err| eyre::eyre!("list failed: {err}"))?;
    let actual = list
        .tasks()
        .iter()
        .map(|task| (task.id(), task.rank().value()))
        .collect::<Vec<_>>();

    if actual != expected {
        return Err(eyre::eyre!("expected ranks {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the move swapped task "{name}" with task "{neighbour}""#)]
fn move_swapped(
    world: &OrderingWorld,
    name: String,
    neighbour: String,
) -> Result<(), eyre::Report> {
    let task_id = world.id_of(&name)?;
    let neighbour_id = world.id_of(&neighbour)?;
    match world.last_move {
        Some(MoveOutcome::Swapped {
            task,
            neighbour: other,
        }) if task.id == task_id && other.id == neighbour_id => Ok(()),
        ref outcome => Err(eyre::eyre!(
            "expected swap of {name} with {neighbour}, got {outcome:?} (error {:?})",
            world.last_error
        )),
    }
}

#[then(r#"the move left task "{name}" at the list boundary"#)]
fn move_at_boundary(world: &OrderingWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world.id_of(&name)?;
    match world.last_move {
        Some(MoveOutcome::AtBoundary { task }) if task.id == task_id => Ok(()),
        ref outcome => Err(eyre::eyre!(
            "expected boundary no-op for {name}, got {outcome:?} (error {:?})",
            world.last_error
        )),
    }
}

#[then(r#"the request is rejected as "{kind}""#)]
fn request_rejected(world: &OrderingWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last request to fail"))?;
    if err.kind().as_str() != kind {
        return Err(eyre::eyre!("expected {kind} rejection, got {}", err.kind()));
    }
    Ok(())
}
