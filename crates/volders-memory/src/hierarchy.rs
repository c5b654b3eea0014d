//! Breadth-first folder traversal over `parent_id` links.

use std::collections::{HashMap, HashSet, VecDeque};

use tokio_util::sync::CancellationToken;

use volders_core::error::AppError;
use volders_core::result::AppResult;
use volders_core::types::ObjectId;
use volders_entity::Folder;

/// Collect `root_id` and all of its descendants from `folders`.
///
/// Folders are emitted level by level; siblings are ordered by creation
/// date, then ID. A folder is emitted at most once even if the stored
/// `parent_id` links form a cycle.
pub fn collect(
    folders: &HashMap<ObjectId, Folder>,
    root_id: &ObjectId,
    cancel: &CancellationToken,
) -> AppResult<Vec<Folder>> {
    if cancel.is_cancelled() {
        return Err(AppError::cancelled("Folder hierarchy traversal cancelled"));
    }

    let root = folders
        .get(root_id)
        .ok_or_else(|| AppError::not_found(format!("Folder {root_id} not found")))?;

    let mut children: HashMap<&ObjectId, Vec<&Folder>> = HashMap::new();
    for folder in folders.values() {
        if let Some(parent_id) = &folder.parent_id {
            children.entry(parent_id).or_default().push(folder);
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| {
            (a.common.creation_date, a.id()).cmp(&(b.common.creation_date, b.id()))
        });
    }

    let mut result = Vec::new();
    let mut visited: HashSet<&ObjectId> = HashSet::new();
    let mut queue = VecDeque::from([root]);
    visited.insert(root.id());

    while let Some(folder) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Folder hierarchy traversal cancelled"));
        }
        result.push(folder.clone());

        if let Some(kids) = children.get(folder.id()) {
            for &child in kids {
                if visited.insert(child.id()) {
                    queue.push_back(child);
                }
            }
        }
    }

    Ok(result)
}
