use chrono::Duration;

use crate::api::auth::Viewer;
use crate::database::{AnswerWithUser, Ulid};
use crate::profile::feed::{compose, is_owner, FeedAnswer, Sender};
use crate::tests::global::{mock_config, mock_global_state, MockData};

#[tokio::test]
async fn test_senders_are_looked_up_only_for_authored_questions() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let mut bob = data.user("bob");
	let anonymous = data.question(&alice, None, "who am I?", Duration::minutes(1));
	let named = data.question(&alice, Some(&bob), "hello", Duration::minutes(2));

	// A stored null picture shows as an empty string.
	bob.profile_picture = None;
	data.users.retain(|u| u.id != bob.id);
	data.users.push(bob.clone());

	let (global, _handler) = mock_global_state(mock_config(0), data);

	let feed = compose(global.as_ref(), Some(&alice), vec![anonymous.clone(), named.clone()], &[], None)
		.await
		.expect("failed to compose feed");

	assert_eq!(
		*global.user_by_id_calls.lock().expect("failed to lock calls"),
		vec![bob.id],
		"only the authored question triggers a lookup"
	);

	assert_eq!(feed.questions.len(), 2);
	assert_eq!(feed.questions[0].question, anonymous);
	assert_eq!(feed.questions[0].sender, None);
	assert_eq!(feed.questions[1].question, named);
	assert_eq!(
		feed.questions[1].sender,
		Some(Sender {
			name: "bob display".to_string(),
			profile_picture: String::new(),
		})
	);
	assert!(!feed.owner);
}

#[tokio::test]
async fn test_dangling_author_has_no_sender() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let mut question = data.question(&alice, None, "from a deleted account", Duration::minutes(1));
	question.author_id = Some(Ulid::new());
	question.is_anonymous = false;

	let (global, _handler) = mock_global_state(mock_config(0), data);

	let feed = compose(global.as_ref(), Some(&alice), vec![question.clone()], &[], None)
		.await
		.expect("failed to compose feed");

	assert_eq!(feed.questions[0].sender, None);
	assert_eq!(global.user_by_id_calls.lock().expect("failed to lock calls").len(), 1);
}

#[tokio::test]
async fn test_answers_follow_their_question_in_order() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	let first = data.question(&alice, None, "first", Duration::minutes(1));
	let second = data.question(&alice, None, "second", Duration::minutes(2));
	let a1 = data.answer(&first, &alice, "one");
	let a2 = data.answer(&second, &bob, "two");
	let a3 = data.answer(&first, &bob, "three");

	let answers = [&a1, &a2, &a3]
		.into_iter()
		.map(|answer| {
			let user = if answer.user_id == alice.id { &alice } else { &bob };
			FeedAnswer::from(AnswerWithUser {
				answer: answer.clone(),
				user_name: user.name.clone(),
				user_profile_picture: None,
			})
		})
		.collect::<Vec<_>>();

	let (global, _handler) = mock_global_state(mock_config(0), data);

	let feed = compose(global.as_ref(), Some(&alice), vec![first, second], &answers, None)
		.await
		.expect("failed to compose feed");

	let contents = |idx: usize| {
		feed.questions[idx]
			.answers
			.iter()
			.map(|a| a.content.as_str())
			.collect::<Vec<_>>()
	};

	assert_eq!(contents(0), vec!["one", "three"]);
	assert_eq!(contents(1), vec!["two"]);
	assert_eq!(feed.questions[0].answers[1].username, "bob display");
	assert_eq!(feed.questions[0].answers[1].profile_picture, "");
}

#[tokio::test]
async fn test_lookup_failure_fails_the_feed() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	let question = data.question(&alice, Some(&bob), "hello", Duration::minutes(1));
	data.failure = Some("gone".to_string());

	let (global, _handler) = mock_global_state(mock_config(0), data);

	let result = compose(global.as_ref(), Some(&alice), vec![question], &[], None).await;
	assert!(result.is_err());
}

#[test]
fn test_is_owner() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");

	let viewer = |user_id| Viewer {
		user_id,
		session_id: Ulid::new(),
	};

	assert!(is_owner(Some(&alice), Some(&viewer(alice.id))));
	assert!(!is_owner(Some(&alice), Some(&viewer(bob.id))));
	assert!(!is_owner(Some(&alice), None));
	assert!(!is_owner(None, Some(&viewer(alice.id))));
	assert!(!is_owner(None, None));
}
