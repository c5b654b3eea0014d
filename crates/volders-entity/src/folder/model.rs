//! Folder entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use volders_core::types::{ObjectId, UserId};

use crate::common::Common;

/// A folder in the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Identity, owner and timestamps.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub common: Common,
    /// Parent folder ID (None for root folders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
    /// Display name. Not required to be unique.
    pub name: String,
}

impl Folder {
    /// Build an unsaved folder.
    pub fn new(user: UserId, parent_id: Option<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            common: Common::for_user(user),
            parent_id,
            name: name.into(),
        }
    }

    /// The folder's identifier.
    pub fn id(&self) -> &ObjectId {
        &self.common.id
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_folder_omits_parent_in_json() {
        let folder = Folder::new(UserId::from("alice"), None, "docs");
        assert!(folder.is_root());
        assert!(folder.id().is_empty());

        let json = serde_json::to_value(&folder).expect("serialize");
        assert!(json.get("parent_id").is_none());
        assert_eq!(json["name"], "docs");
        assert_eq!(json["user"], "alice");
        assert!(json.get("creation_date").is_some());
    }

    #[test]
    fn test_child_folder_roundtrips_parent() {
        let folder = Folder::new(UserId::from("alice"), Some(ObjectId::from("root")), "reports");
        let json = serde_json::to_string(&folder).expect("serialize");
        let parsed: Folder = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, folder);
        assert!(!parsed.is_root());
    }
}
