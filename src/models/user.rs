use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user. `id` and both timestamps are assigned by the repository on creation.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
