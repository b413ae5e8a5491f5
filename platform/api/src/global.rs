use std::future::Future;
use std::sync::Arc;

use common::context::Context;
use common::global::GlobalDb;

use crate::config::{ApiConfig, AppConfig, SessionConfig, SiteConfig};
use crate::database::{AnswerWithUser, FollowRow, FollowerRecord, FollowingRecord, Question, Session, Ulid, User};

/// Read access to the data the API serves.
pub trait ApiState {
	fn user_by_username(&self, username: &str) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

	fn user_by_id(&self, id: Ulid) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

	fn session_by_id(&self, id: Ulid) -> impl Future<Output = Result<Option<Session>, sqlx::Error>> + Send;

	/// Questions asked to the user, newest first.
	fn questions_for_recipient(&self, recipient_id: Ulid) -> impl Future<Output = Result<Vec<Question>, sqlx::Error>> + Send;

	fn question_by_id(&self, id: Ulid) -> impl Future<Output = Result<Option<Question>, sqlx::Error>> + Send;

	/// Answers to the questions asked to the user, joined with who answered.
	fn answers_for_recipient(
		&self,
		recipient_id: Ulid,
	) -> impl Future<Output = Result<Vec<AnswerWithUser>, sqlx::Error>> + Send;

	/// The users `user_id` follows.
	fn following(&self, user_id: Ulid) -> impl Future<Output = Result<Vec<FollowingRecord>, sqlx::Error>> + Send;

	/// The users following `user_id`.
	fn followers(&self, user_id: Ulid) -> impl Future<Output = Result<Vec<FollowerRecord>, sqlx::Error>> + Send;
}

pub trait ApiGlobal:
	common::global::GlobalCtx
	+ common::global::GlobalConfigProvider<ApiConfig>
	+ common::global::GlobalConfigProvider<SessionConfig>
	+ common::global::GlobalConfigProvider<SiteConfig>
	+ common::global::GlobalHttp
	+ common::global::GlobalConfig
	+ ApiState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> ApiGlobal for T where
	T: common::global::GlobalCtx
		+ common::global::GlobalConfigProvider<ApiConfig>
		+ common::global::GlobalConfigProvider<SessionConfig>
		+ common::global::GlobalConfigProvider<SiteConfig>
		+ common::global::GlobalHttp
		+ common::global::GlobalConfig
		+ ApiState
		+ Send
		+ Sync
		+ 'static
{
}

pub struct GlobalState {
	ctx: Context,
	config: AppConfig,
	db: Arc<common::database::Pool>,
	http_client: reqwest::Client,
}

impl GlobalState {
	pub fn new(config: AppConfig, db: Arc<common::database::Pool>, http_client: reqwest::Client, ctx: Context) -> Self {
		Self {
			ctx,
			config,
			db,
			http_client,
		}
	}
}

impl common::global::GlobalCtx for GlobalState {
	fn ctx(&self) -> &Context {
		&self.ctx
	}
}

impl common::global::GlobalConfigProvider<AppConfig> for GlobalState {
	fn provide_config(&self) -> &AppConfig {
		&self.config
	}
}

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	fn provide_config(&self) -> &ApiConfig {
		&self.config.api
	}
}

impl common::global::GlobalConfigProvider<SessionConfig> for GlobalState {
	fn provide_config(&self) -> &SessionConfig {
		&self.config.session
	}
}

impl common::global::GlobalConfigProvider<SiteConfig> for GlobalState {
	fn provide_config(&self) -> &SiteConfig {
		&self.config.app
	}
}

impl common::global::GlobalDb for GlobalState {
	fn db(&self) -> &Arc<common::database::Pool> {
		&self.db
	}
}

impl common::global::GlobalHttp for GlobalState {
	fn http_client(&self) -> &reqwest::Client {
		&self.http_client
	}
}

impl common::global::GlobalConfig for GlobalState {}

const FOLLOW_USER_COLUMNS: &str = "u.id AS user_id, u.name AS user_name, u.username AS user_username, u.bio AS user_bio, \
	 u.profile_picture AS user_profile_picture, u.socials AS user_socials";

impl ApiState for GlobalState {
	async fn user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM users WHERE username = $1")
			.bind(username)
			.fetch_optional(self.db().as_ref())
			.await
	}

	async fn user_by_id(&self, id: Ulid) -> Result<Option<User>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(self.db().as_ref())
			.await
	}

	async fn session_by_id(&self, id: Ulid) -> Result<Option<Session>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM sessions WHERE id = $1")
			.bind(id)
			.fetch_optional(self.db().as_ref())
			.await
	}

	async fn questions_for_recipient(&self, recipient_id: Ulid) -> Result<Vec<Question>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM questions WHERE recipient_id = $1 ORDER BY created_at DESC")
			.bind(recipient_id)
			.fetch_all(self.db().as_ref())
			.await
	}

	async fn question_by_id(&self, id: Ulid) -> Result<Option<Question>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM questions WHERE id = $1")
			.bind(id)
			.fetch_optional(self.db().as_ref())
			.await
	}

	async fn answers_for_recipient(&self, recipient_id: Ulid) -> Result<Vec<AnswerWithUser>, sqlx::Error> {
		sqlx::query_as(
			"SELECT a.*, u.name AS user_name, u.profile_picture AS user_profile_picture FROM answers a \
			 JOIN questions q ON q.id = a.question_id JOIN users u ON u.id = a.user_id \
			 WHERE q.recipient_id = $1 ORDER BY a.created_at",
		)
		.bind(recipient_id)
		.fetch_all(self.db().as_ref())
		.await
	}

	async fn following(&self, user_id: Ulid) -> Result<Vec<FollowingRecord>, sqlx::Error> {
		let rows: Vec<FollowRow> = sqlx::query_as(&format!(
			"SELECT f.*, {FOLLOW_USER_COLUMNS} FROM follows f JOIN users u ON u.id = f.following_id \
			 WHERE f.follower_id = $1 ORDER BY f.created_at"
		))
		.bind(user_id)
		.fetch_all(self.db().as_ref())
		.await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}

	async fn followers(&self, user_id: Ulid) -> Result<Vec<FollowerRecord>, sqlx::Error> {
		let rows: Vec<FollowRow> = sqlx::query_as(&format!(
			"SELECT f.*, {FOLLOW_USER_COLUMNS} FROM follows f JOIN users u ON u.id = f.follower_id \
			 WHERE f.following_id = $1 ORDER BY f.created_at"
		))
		.bind(user_id)
		.fetch_all(self.db().as_ref())
		.await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}
}

