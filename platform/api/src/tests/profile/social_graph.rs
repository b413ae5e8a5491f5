use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::database::{FollowerRecord, FollowingRecord};
use crate::profile::social_graph::{self, fetch, GraphFetchError, GraphList, Relation};
use crate::tests::api::TestServer;
use crate::tests::global::{mock_config, mock_global_state, MockData};

/// Answers a single request with a canned JSON body.
async fn serve_once(body: &'static str) -> u16 {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
	let port = listener.local_addr().expect("failed to get address").port();

	tokio::spawn(async move {
		let (mut socket, _) = listener.accept().await.expect("failed to accept");
		let mut buf = [0; 4096];
		let _ = socket.read(&mut buf).await;

		let resp = format!(
			"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
			body.len()
		);
		socket.write_all(resp.as_bytes()).await.expect("failed to write");
	});

	port
}

#[tokio::test]
async fn test_loaded_from_the_api() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	data.follow(&alice, &bob);

	let server = TestServer::start(data).await;

	let following = social_graph::following(&server.global, "alice").await;
	assert!(!following.is_degraded());
	assert_eq!(following.len(), 1);
	assert_eq!(following.items()[0].following.username, "bob");

	let followers = social_graph::followers(&server.global, "alice").await;
	assert_eq!(followers, GraphList::Loaded(Vec::new()));

	server.shutdown().await;
}

#[tokio::test]
async fn test_error_status_degrades() {
	let server = TestServer::start(MockData::default()).await;

	let err = fetch::<_, FollowingRecord>(&server.global, "ghost", Relation::Following)
		.await
		.expect_err("unknown user must fail");
	assert!(matches!(err, GraphFetchError::Status(status) if status == reqwest::StatusCode::NOT_FOUND));

	let followers = social_graph::followers(&server.global, "ghost").await;
	assert!(followers.is_degraded());
	assert!(followers.is_empty());

	server.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_api_degrades() {
	let port = portpicker::pick_unused_port().expect("failed to pick port");
	let (global, _handler) = mock_global_state(mock_config(port), MockData::default());

	let following = social_graph::following(&global, "alice").await;
	assert!(following.is_degraded());
	assert_eq!(following.len(), 0);
}

#[tokio::test]
async fn test_missing_or_null_list_is_empty() {
	let port = serve_once(r#"{"following":null}"#).await;
	let (global, _handler) = mock_global_state(mock_config(port), MockData::default());

	let items = fetch::<_, FollowingRecord>(&global, "alice", Relation::Following)
		.await
		.expect("null list is fine");
	assert!(items.is_empty());

	let port = serve_once(r#"{"somethingElse":[]}"#).await;
	let (global, _handler) = mock_global_state(mock_config(port), MockData::default());

	let items = fetch::<_, FollowerRecord>(&global, "alice", Relation::Followers)
		.await
		.expect("missing list is fine");
	assert!(items.is_empty());
}

#[tokio::test]
async fn test_malformed_body_fails_to_decode() {
	let port = serve_once(r#"{"followers":[{"id":42}]}"#).await;
	let (global, _handler) = mock_global_state(mock_config(port), MockData::default());

	let err = fetch::<_, FollowerRecord>(&global, "alice", Relation::Followers)
		.await
		.expect_err("malformed record must fail");
	assert!(matches!(err, GraphFetchError::Decode(_)));
}

#[test]
fn test_degraded_list_reads_as_empty() {
	let list = GraphList::<FollowingRecord>::Degraded("boom".to_string());
	assert!(list.is_degraded());
	assert!(list.is_empty());
	assert!(list.items().is_empty());
}
