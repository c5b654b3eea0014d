//! Fields shared by every stored entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use volders_core::types::{ObjectId, UserId};

/// Identity, ownership and timestamps embedded in folders and files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Common {
    /// Backend-assigned identifier. Empty until the entity is created.
    pub id: ObjectId,
    /// Owner of the entity.
    #[sqlx(rename = "owner")]
    pub user: UserId,
    /// Set once at creation.
    pub creation_date: DateTime<Utc>,
    /// Equal to `creation_date` at creation, refreshed on every update.
    pub modified_date: DateTime<Utc>,
}

impl Common {
    /// Unsaved fields for a new entity owned by `user`.
    pub fn for_user(user: UserId) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    /// Stamp creation: both dates become `now`.
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.creation_date = now;
        self.modified_date = now;
    }

    /// Stamp an update over `previous`, keeping its identity and creation date.
    ///
    /// The modification date never moves backwards.
    pub fn stamp_updated(&mut self, previous: &Common, now: DateTime<Utc>) {
        self.creation_date = previous.creation_date;
        self.modified_date = now.max(previous.modified_date);
    }
}
