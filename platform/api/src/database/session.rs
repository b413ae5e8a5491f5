use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Session {
	/// The unique identifier for the session.
	pub id: Ulid,
	/// Foreign key to the user table.
	pub user_id: Ulid,
	/// The time the session stops being valid.
	pub expires_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

impl Session {
	pub fn is_valid(&self) -> bool {
		self.expires_at > Utc::now()
	}
}
