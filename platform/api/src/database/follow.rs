use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{PublicUser, Social, Ulid};

/// A directed edge, `follower_id` follows `following_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
	pub id: Ulid,
	pub follower_id: Ulid,
	pub following_id: Ulid,
	pub created_at: DateTime<Utc>,
}

/// A follow edge joined with the user on its other end. The user columns are
/// selected with a `user_` prefix.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowRow {
	#[sqlx(flatten)]
	pub follow: Follow,
	pub user_id: Ulid,
	pub user_name: String,
	pub user_username: String,
	pub user_bio: Option<String>,
	pub user_profile_picture: Option<String>,
	pub user_socials: Json<Vec<Social>>,
}

impl FollowRow {
	pub fn into_parts(self) -> (Follow, PublicUser) {
		(
			self.follow,
			PublicUser {
				id: self.user_id,
				name: self.user_name,
				username: self.user_username,
				bio: self.user_bio,
				profile_picture: self.user_profile_picture,
				socials: self.user_socials.0,
			},
		)
	}
}

/// A user the profile owner follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowingRecord {
	#[serde(flatten)]
	pub edge: Follow,
	pub following: PublicUser,
}

/// A user following the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRecord {
	#[serde(flatten)]
	pub edge: Follow,
	pub follower: PublicUser,
}

impl From<FollowRow> for FollowingRecord {
	fn from(row: FollowRow) -> Self {
		let (edge, following) = row.into_parts();
		Self { edge, following }
	}
}

impl From<FollowRow> for FollowerRecord {
	fn from(row: FollowRow) -> Self {
		let (edge, follower) = row.into_parts();
		Self { edge, follower }
	}
}
