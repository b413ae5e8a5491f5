use chrono::Duration;
use hyper::header;

use super::TestServer;
use crate::api::jwt::{JwtState, SessionToken};
use crate::tests::global::MockData;

#[tokio::test]
async fn test_unknown_profile() {
	let server = TestServer::start(MockData::default()).await;

	let resp = server
		.client
		.get(server.url("/nobody"))
		.send()
		.await
		.expect("failed to get page");

	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
	assert_eq!(
		resp.headers().get(header::CONTENT_TYPE.as_str()).and_then(|v| v.to_str().ok()),
		Some("text/html; charset=utf-8")
	);
	let html = resp.text().await.expect("failed to read body");
	assert!(html.contains("User not found"));
	assert!(html.contains("@nobody"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_profile_page() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	let carol = data.user("carol");
	data.follow(&bob, &alice);
	data.follow(&carol, &alice);
	data.follow(&alice, &bob);

	let named = data.question(&alice, Some(&bob), "Favourite <b>crate</b>?", Duration::hours(2));
	let anonymous = data.question(&alice, None, "Tabs or spaces?", Duration::minutes(5));
	data.answer(&named, &alice, "serde, obviously");
	// Questions to other users stay off alice's page.
	data.question(&bob, Some(&alice), "Somebody else's question", Duration::minutes(1));

	let server = TestServer::start(data).await;

	let resp = server
		.client
		.get(server.url("/alice"))
		.send()
		.await
		.expect("failed to get page");

	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	let html = resp.text().await.expect("failed to read body");

	assert!(html.contains("<title>alice display (@alice)</title>"));
	assert!(html.contains("hi, I am alice"));

	// Newest question first.
	let anonymous_at = html.find(&format!("question-{}", anonymous.id)).expect("anonymous question rendered");
	let named_at = html.find(&format!("question-{}", named.id)).expect("named question rendered");
	assert!(anonymous_at < named_at);

	assert!(html.contains("Favourite &lt;b&gt;crate&lt;/b&gt;?"));
	assert!(html.contains("<span class=\"sender\">bob display</span>"));
	assert!(html.contains("<span class=\"sender anonymous\">Anonymous</span>"));
	assert!(html.contains("serde, obviously"));
	assert!(html.contains("1 answer<"));
	assert!(html.contains("0 answers<"));
	assert!(!html.contains("Somebody else&#39;s question"));

	// Both lists come back from the social graph endpoints.
	assert!(html.contains("Followers <span class=\"count\">2</span>"));
	assert!(html.contains("Following <span class=\"count\">1</span>"));

	// Anonymous visitor.
	assert!(html.contains("Login"));
	assert!(!html.contains("Settings"));
	assert!(!html.contains("class=\"answer\" data-question-id"));
	assert!(html.contains(&format!("data-receiver-id=\"{}\" data-logged-user-id=\"\"", alice.id)));

	// Without a highlight the generic preview is used.
	assert!(html.contains("<meta name=\"description\" content=\"Check out this question!\">"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_profile_as_owner_and_visitor() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	data.question(&alice, Some(&bob), "Hello?", Duration::minutes(3));
	let alice_session = data.session(&alice, Duration::minutes(10));
	let bob_session = data.session(&bob, Duration::minutes(10));

	let server = TestServer::start(data).await;

	let alice_token = SessionToken::from(&alice_session)
		.serialize(&server.global)
		.expect("failed to create token");
	let bob_token = SessionToken::from(&bob_session)
		.serialize(&server.global)
		.expect("failed to create token");

	let html = server
		.client
		.get(server.url("/alice"))
		.header(header::AUTHORIZATION.as_str(), format!("Bearer {alice_token}"))
		.send()
		.await
		.expect("failed to get page")
		.text()
		.await
		.expect("failed to read body");

	assert!(html.contains("Settings"));
	assert!(!html.contains("Login"));
	assert!(html.contains("class=\"answer\" data-question-id"));
	assert!(html.contains(&format!("data-logged-user-id=\"{}\"", alice.id)));

	// The cookie works as well as the header.
	let html = server
		.client
		.get(server.url("/alice"))
		.header(header::COOKIE.as_str(), format!("curiously_session={bob_token}"))
		.send()
		.await
		.expect("failed to get page")
		.text()
		.await
		.expect("failed to read body");

	assert!(!html.contains("Settings"));
	assert!(!html.contains("Login"));
	assert!(!html.contains("class=\"answer\" data-question-id"));
	assert!(html.contains(&format!("data-logged-user-id=\"{}\"", bob.id)));
	assert!(html.contains("Ask anonymously"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_highlight_preview() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let question = data.question(&alice, None, "What is Rust?", Duration::minutes(1));

	let server = TestServer::start(data).await;

	let html = server
		.client
		.get(server.url(&format!("/alice?highlight={}", question.id)))
		.send()
		.await
		.expect("failed to get page")
		.text()
		.await
		.expect("failed to read body");

	assert!(html.contains("<meta name=\"description\" content=\"What is Rust?\">"));
	assert!(html.contains("<meta property=\"og:title\" content=\"question\">"));
	assert!(html.contains(&format!(
		"<meta property=\"og:image\" content=\"{}/api/og?q=What+is+Rust%3F\">",
		server.base
	)));
	assert!(html.contains("<meta property=\"og:image:width\" content=\"1200\">"));
	assert!(html.contains("<meta name=\"twitter:card\" content=\"summary_large_image\">"));
	assert!(html.contains("question-card highlighted"));

	// The query value is decoded before it is parsed.
	let encoded = question
		.id
		.to_string()
		.bytes()
		.map(|b| format!("%{b:02X}"))
		.collect::<String>();
	let html = server
		.client
		.get(server.url(&format!("/alice?highlight={encoded}")))
		.send()
		.await
		.expect("failed to get page")
		.text()
		.await
		.expect("failed to read body");

	assert!(html.contains("<meta name=\"description\" content=\"What is Rust?\">"));
	assert!(html.contains("question-card highlighted"));

	// An id that is not a question falls back to the generic preview.
	let html = server
		.client
		.get(server.url("/alice?highlight=not-an-id"))
		.send()
		.await
		.expect("failed to get page")
		.text()
		.await
		.expect("failed to read body");

	assert!(html.contains("<meta name=\"description\" content=\"Check out this question!\">"));
	assert!(!html.contains("question-card highlighted"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_database_failure_is_a_server_error() {
	let mut data = MockData::default();
	data.user("alice");

	let server = TestServer::start(data).await;
	server.global.data.lock().expect("failed to lock mock data").failure = Some("pool timed out".to_string());

	let resp = server
		.client
		.get(server.url("/alice"))
		.send()
		.await
		.expect("failed to get page");

	assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

	server.shutdown().await;
}
