//! File entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use volders_core::types::{ObjectId, UserId};

use crate::common::Common;

/// A binary payload stored inside exactly one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Identity, owner and timestamps.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub common: Common,
    /// The folder containing this file.
    pub folder_id: ObjectId,
    /// The file name (including extension).
    pub name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Payload length in bytes.
    pub size: i64,
    /// Raw content. Omitted from serialized output when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

impl File {
    /// Build an unsaved file; `size` is taken from the payload.
    pub fn new(
        user: UserId,
        folder_id: ObjectId,
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            common: Common::for_user(user),
            folder_id,
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as i64,
            data,
        }
    }

    /// The file's identifier.
    pub fn id(&self) -> &ObjectId {
        &self.common.id
    }
}
