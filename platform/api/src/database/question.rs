use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct Question {
	/// The unique identifier for the question.
	pub id: Ulid,
	/// What was asked.
	pub content: String,
	/// The user who asked, absent for anonymous questions.
	pub author_id: Option<Ulid>,
	/// The user the question was asked to.
	pub recipient_id: Ulid,
	/// Set by the asker to hide their name even when the author is known.
	pub is_anonymous: bool,
	/// The time the question was asked.
	pub created_at: DateTime<Utc>,
}
