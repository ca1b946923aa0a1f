//! Order value assembled when the user shares a contact.

use chrono::{DateTime, Utc};

/// A submitted order, rendered into the administrator notification and then dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub name: Option<String>,
    pub user_id: Option<i64>,
    pub phone_number: String,
    pub username: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        name: impl Into<String>,
        user_id: i64,
        phone_number: impl Into<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            user_id: Some(user_id),
            phone_number: phone_number.into(),
            username: username.filter(|u| !u.is_empty()),
            received_at: Utc::now(),
        }
    }
}
