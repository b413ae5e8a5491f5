use futures::future::try_join_all;

use crate::api::auth::Viewer;
use crate::database::{AnswerWithUser, Question, Ulid, User};
use crate::global::ApiState;

/// Who asked a question, stored nulls shown as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
	pub name: String,
	pub profile_picture: String,
}

impl From<User> for Sender {
	fn from(user: User) -> Self {
		Self {
			name: user.name,
			profile_picture: user.profile_picture.unwrap_or_default(),
		}
	}
}

/// An answer as shown under its question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedAnswer {
	pub id: Ulid,
	pub content: String,
	pub question_id: Ulid,
	/// Display name of the user who answered.
	pub username: String,
	pub profile_picture: String,
}

impl From<AnswerWithUser> for FeedAnswer {
	fn from(row: AnswerWithUser) -> Self {
		Self {
			id: row.answer.id,
			content: row.answer.content,
			question_id: row.answer.question_id,
			username: row.user_name,
			profile_picture: row.user_profile_picture.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuestion {
	pub question: Question,
	pub sender: Option<Sender>,
	pub answers: Vec<FeedAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFeed {
	pub questions: Vec<FeedQuestion>,
	/// The viewer owns the profile the feed belongs to.
	pub owner: bool,
}

/// Joins every question with its sender and its answers, keeping the order of
/// `questions` and of `answers`.
///
/// A sender is looked up only when the question has an author. The lookups
/// run concurrently and a dangling author yields no sender.
pub async fn compose<G: ApiState>(
	global: &G,
	recipient: Option<&User>,
	questions: Vec<Question>,
	answers: &[FeedAnswer],
	viewer: Option<&Viewer>,
) -> Result<QuestionFeed, sqlx::Error> {
	let senders = try_join_all(questions.iter().map(|question| async move {
		match question.author_id {
			Some(author_id) => global.user_by_id(author_id).await.map(|user| user.map(Sender::from)),
			None => Ok(None),
		}
	}))
	.await?;

	let questions = questions
		.into_iter()
		.zip(senders)
		.map(|(question, sender)| {
			let answers = answers
				.iter()
				.filter(|answer| answer.question_id == question.id)
				.cloned()
				.collect();

			FeedQuestion {
				question,
				sender,
				answers,
			}
		})
		.collect();

	Ok(QuestionFeed {
		questions,
		owner: is_owner(recipient, viewer),
	})
}

pub fn is_owner(recipient: Option<&User>, viewer: Option<&Viewer>) -> bool {
	matches!((recipient, viewer), (Some(user), Some(viewer)) if user.id == viewer.user_id)
}
