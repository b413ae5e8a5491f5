use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct Answer {
	/// The unique identifier for the answer.
	pub id: Ulid,
	pub content: String,
	/// The question this answers.
	pub question_id: Ulid,
	/// The user who answered.
	pub user_id: Ulid,
	pub created_at: DateTime<Utc>,
}

/// An answer joined with the name and avatar of the user who wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct AnswerWithUser {
	#[sqlx(flatten)]
	pub answer: Answer,
	pub user_name: String,
	pub user_profile_picture: Option<String>,
}
