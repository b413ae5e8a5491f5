use chrono::Duration;

use crate::api::auth::Viewer;
use crate::config::SiteConfig;
use crate::profile::{assemble, PageMetadata, ProfilePage, DEFAULT_DESCRIPTION};
use crate::tests::api::TestServer;
use crate::tests::global::{mock_config, mock_global_state, MockData};

#[tokio::test]
async fn test_unknown_user() {
	let (global, _handler) = mock_global_state(mock_config(0), MockData::default());

	let page = assemble(&global, "nobody", None, None).await.expect("failed to assemble");
	assert!(matches!(page, ProfilePage::NotFound));
}

#[tokio::test]
async fn test_degraded_graph_keeps_the_page() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let question = data.question(&alice, None, "still here?", Duration::minutes(1));

	// Nothing listens on this port, so both social graph calls fail.
	let port = portpicker::pick_unused_port().expect("failed to pick port");
	let (global, _handler) = mock_global_state(mock_config(port), data);

	let viewer = Viewer {
		user_id: alice.id,
		session_id: crate::database::Ulid::new(),
	};
	let highlight = question.id.to_string();

	let ProfilePage::Found(profile) = assemble(&global, "alice", Some(&viewer), Some(&highlight))
		.await
		.expect("failed to assemble")
	else {
		panic!("alice should exist");
	};

	assert!(profile.following.is_degraded());
	assert!(profile.followers.is_degraded());
	assert_eq!(profile.feed.questions.len(), 1);
	assert!(profile.owner());
	assert_eq!(profile.viewer, Some(viewer));
	assert_eq!(profile.highlight.as_ref(), Some(&question));
	assert_eq!(profile.metadata.description, "still here?");
}

#[tokio::test]
async fn test_everything_loaded() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	data.follow(&bob, &alice);
	let question = data.question(&alice, Some(&bob), "hi alice", Duration::minutes(1));
	data.answer(&question, &alice, "hi bob");

	let server = TestServer::start(data).await;

	let ProfilePage::Found(profile) = assemble(&server.global, "alice", None, Some("not-a-ulid"))
		.await
		.expect("failed to assemble")
	else {
		panic!("alice should exist");
	};

	assert_eq!(profile.followers.len(), 1);
	assert_eq!(profile.following, crate::profile::social_graph::GraphList::Loaded(Vec::new()));
	assert_eq!(profile.feed.questions[0].answers.len(), 1);
	assert!(!profile.owner());
	assert_eq!(profile.highlight, None);
	assert_eq!(profile.metadata.description, DEFAULT_DESCRIPTION);

	drop(profile);
	server.shutdown().await;
}

#[tokio::test]
async fn test_database_failure() {
	let mut data = MockData::default();
	data.user("alice");
	data.failure = Some("connection refused".to_string());

	let (global, _handler) = mock_global_state(mock_config(0), data);

	assert!(assemble(&global, "alice", None, None).await.is_err());
}

#[test]
fn test_page_metadata() {
	let site = SiteConfig {
		url: "https://curiously.example/".to_string(),
	};

	let generic = PageMetadata::for_question(&site, None);
	assert_eq!(generic.title, "question");
	assert_eq!(generic.description, DEFAULT_DESCRIPTION);
	assert_eq!(generic.image_url, "https://curiously.example/api/og?q=");
	assert_eq!((generic.image_width, generic.image_height), (1200, 630));
	assert_eq!(generic.twitter_card, "summary_large_image");

	let mut data = MockData::default();
	let alice = data.user("alice");
	let question = data.question(&alice, None, "Cats & dogs?", Duration::minutes(1));

	let meta = PageMetadata::for_question(&site, Some(&question));
	assert_eq!(meta.description, "Cats & dogs?");
	assert_eq!(meta.image_url, "https://curiously.example/api/og?q=Cats+%26+dogs%3F");

	let mut empty = question;
	empty.content = String::new();
	assert_eq!(PageMetadata::for_question(&site, Some(&empty)), generic);
}
