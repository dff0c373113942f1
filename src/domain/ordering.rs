//! Display ordering for tasks
//!
//! Tasks are never stored in order. Every listing derives its order here:
//! priority first, then creation time, then title, then ID so that the
//! order is total even for identical titles.

use std::cmp::Ordering;

use super::task::Task;

/// Compares two tasks by display order
pub fn compare(a: &Task, b: &Task) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.created.cmp(&b.created))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// Returns tasks in display order
pub fn sorted_tasks<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}

/// Keeps only tasks that are not done, preserving the given order
pub fn pending_tasks<'a>(tasks: &[&'a Task]) -> Vec<&'a Task> {
    tasks.iter().copied().filter(|t| !t.done).collect()
}
