//! Checklist upkeep for an offer's task list.
//!
//! Tasks are kept sorted by `position`, then creation time. New tasks go to the end.

use chrono::{DateTime, Utc};

use super::domain::{Task, TaskId, TaskUpdate};

/// Append a task after the current last position and return a copy of it.
pub fn add_task(
    tasks: &mut Vec<Task>,
    id: TaskId,
    title: String,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Task {
    let position = tasks
        .iter()
        .map(|task| task.position + 1)
        .max()
        .unwrap_or(0);

    let task = Task {
        id,
        title,
        description: description.filter(|text| !text.is_empty()),
        completed: false,
        position,
        created_at: now,
        updated_at: now,
    };
    tasks.push(task.clone());
    sort_tasks(tasks);
    task
}

/// Apply a partial edit; `None` when no task has `id`.
pub fn update_task(
    tasks: &mut [Task],
    id: &TaskId,
    update: TaskUpdate,
    now: DateTime<Utc>,
) -> Option<Task> {
    let task = tasks.iter_mut().find(|task| &task.id == id)?;

    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = Some(description).filter(|text| !text.is_empty());
    }
    if let Some(completed) = update.completed {
        task.completed = completed;
    }
    task.updated_at = now;

    Some(task.clone())
}

pub fn delete_task(tasks: &mut Vec<Task>, id: &TaskId) -> Option<Task> {
    let index = tasks.iter().position(|task| &task.id == id)?;
    Some(tasks.remove(index))
}

/// Renumber positions so `order` comes first, in the given order.
///
/// Unknown and repeated ids are skipped. Tasks missing from `order` follow in their
/// previous order.
pub fn reorder_tasks(tasks: &mut Vec<Task>, order: &[TaskId]) {
    let mut remaining = std::mem::take(tasks);
    let mut reordered = Vec::with_capacity(remaining.len());

    for id in order {
        if let Some(index) = remaining.iter().position(|task| &task.id == id) {
            reordered.push(remaining.remove(index));
        }
    }
    reordered.append(&mut remaining);

    for (position, task) in reordered.iter_mut().enumerate() {
        task.position = position as u32;
    }
    *tasks = reordered;
}

fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
