use std::sync::Arc;

use crate::api::auth::Viewer;
use crate::config::SiteConfig;
use crate::database::{FollowerRecord, FollowingRecord, Question, Ulid, User};
use crate::global::ApiGlobal;

pub mod feed;
pub mod render;
pub mod social_graph;

use self::feed::{FeedAnswer, QuestionFeed};
use self::social_graph::GraphList;

pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;
pub const DEFAULT_DESCRIPTION: &str = "Check out this question!";

#[derive(Debug)]
pub enum ProfilePage {
	NotFound,
	Found(Box<Profile>),
}

/// Everything the profile page shows.
#[derive(Debug)]
pub struct Profile {
	pub user: User,
	pub viewer: Option<Viewer>,
	pub following: GraphList<FollowingRecord>,
	pub followers: GraphList<FollowerRecord>,
	pub feed: QuestionFeed,
	/// The question named by `?highlight=`, when it exists.
	pub highlight: Option<Question>,
	pub metadata: PageMetadata,
}

impl Profile {
	pub fn owner(&self) -> bool {
		self.feed.owner
	}
}

/// Link preview tags of the page head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
	pub title: String,
	pub description: String,
	pub image_url: String,
	pub image_width: u32,
	pub image_height: u32,
	pub twitter_card: &'static str,
}

impl PageMetadata {
	/// Builds the preview of `question`, or the generic one without it.
	pub fn for_question(site: &SiteConfig, question: Option<&Question>) -> Self {
		let content = question.map(|q| q.content.as_str()).filter(|c| !c.is_empty());

		Self {
			title: "question".to_string(),
			description: content.unwrap_or(DEFAULT_DESCRIPTION).to_string(),
			image_url: og_image_url(site, content.unwrap_or_default()),
			image_width: OG_IMAGE_WIDTH,
			image_height: OG_IMAGE_HEIGHT,
			twitter_card: "summary_large_image",
		}
	}
}

fn og_image_url(site: &SiteConfig, content: &str) -> String {
	let mut url = format!("{}/api/og", site.base_url());

	match reqwest::Url::parse_with_params(&url, [("q", content)]) {
		Ok(parsed) => parsed.to_string(),
		Err(err) => {
			tracing::warn!(error = %err, "invalid site url, preview image left without query");
			url.push_str("?q=");
			url
		}
	}
}

/// Loads the profile of `username`.
///
/// Once the user exists its questions, the answers to them, both social graph
/// lists and the highlighted question are loaded concurrently. Social graph
/// failures only degrade their list, database failures fail the page.
pub async fn assemble<G: ApiGlobal>(
	global: &Arc<G>,
	username: &str,
	viewer: Option<&Viewer>,
	highlight: Option<&str>,
) -> Result<ProfilePage, sqlx::Error> {
	let Some(user) = global.user_by_username(username).await? else {
		tracing::debug!(username, "profile not found");
		return Ok(ProfilePage::NotFound);
	};

	let highlight = highlight.and_then(|id| id.parse::<Ulid>().ok());

	let (questions, answers, highlight, following, followers) = tokio::join!(
		global.questions_for_recipient(user.id),
		global.answers_for_recipient(user.id),
		async {
			match highlight {
				Some(id) => global.question_by_id(id).await,
				None => Ok(None),
			}
		},
		social_graph::following(global, &user.username),
		social_graph::followers(global, &user.username),
	);

	let answers = answers?.into_iter().map(FeedAnswer::from).collect::<Vec<_>>();
	let highlight = highlight?;

	let feed = feed::compose(global.as_ref(), Some(&user), questions?, &answers, viewer).await?;

	let metadata = PageMetadata::for_question(global.config::<SiteConfig>(), highlight.as_ref());

	Ok(ProfilePage::Found(Box::new(Profile {
		user,
		viewer: viewer.copied(),
		following,
		followers,
		feed,
		highlight,
		metadata,
	})))
}
