use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
	/// The unique identifier for the user.
	pub id: Ulid,
	/// The display name of the user.
	pub name: String,
	/// The unique handle of the user, used in profile URLs.
	pub username: String,
	/// Free text shown on the profile.
	pub bio: Option<String>,
	/// URL of the avatar image.
	pub profile_picture: Option<String>,
	/// Links to the user's accounts elsewhere.
	pub socials: Json<Vec<Social>>,
	/// The time the user was created.
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
	pub platform: String,
	pub url: String,
}

/// The part of a user that is shown to everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
	pub id: Ulid,
	pub name: String,
	pub username: String,
	pub bio: Option<String>,
	pub profile_picture: Option<String>,
	#[serde(default)]
	pub socials: Vec<Social>,
}

impl From<User> for PublicUser {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			name: user.name,
			username: user.username,
			bio: user.bio,
			profile_picture: user.profile_picture,
			socials: user.socials.0,
		}
	}
}
