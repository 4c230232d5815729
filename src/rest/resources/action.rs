//! Action resource.
//!
//! An [`ActionRecord`] describes the asynchronous progress of a mutating
//! operation. `completed` and `errored` are terminal; every other status
//! string (`in-progress`, `new`, ...) is treated as still running.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of an action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Errored,
    /// Still running. Any unrecognized status decodes to this variant.
    #[serde(other)]
    InProgress,
}

impl ActionStatus {
    /// Returns `true` for `Completed` and `Errored`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored)
    }
}

/// An action (event) record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRecord {
    /// The unique identifier of the action.
    pub id: u64,

    /// Current status.
    pub status: ActionStatus,

    /// Action type, e.g. `create`, `power_off`, `resize`.
    #[serde(rename = "type")]
    pub action_type: String,

    /// When the action started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the action reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Identifier of the resource the action targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u64>,

    /// Type of the targeted resource, e.g. `droplet`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Region the action ran in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_slug: Option<String>,
}

impl ActionRecord {
    /// Returns `true` while the action may still change state.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.status.is_terminal()
    }
}
