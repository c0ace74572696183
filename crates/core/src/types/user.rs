//! Store users of the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{id::UserId, role::Role};

/// A store staff member who has opened the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    /// Unix timestamp in seconds.
    #[serde(rename = "lastLogin")]
    pub last_login_epoch_seconds: i64,
}

impl StoreUser {
    /// Last login as a UTC timestamp, if the epoch value is representable.
    #[must_use]
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_login_epoch_seconds, 0)
    }
}
