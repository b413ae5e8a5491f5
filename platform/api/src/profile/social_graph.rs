use std::sync::Arc;

use hyper::header;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::SiteConfig;
use crate::database::{FollowerRecord, FollowingRecord};
use crate::global::ApiGlobal;

/// A social graph list as seen by the page. A failed fetch is kept apart from
/// an empty list so it can be told apart, but renders like one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphList<T> {
	Loaded(Vec<T>),
	Degraded(String),
}

impl<T> GraphList<T> {
	pub fn items(&self) -> &[T] {
		match self {
			Self::Loaded(items) => items,
			Self::Degraded(_) => &[],
		}
	}

	pub fn len(&self) -> usize {
		self.items().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items().is_empty()
	}

	pub fn is_degraded(&self) -> bool {
		matches!(self, Self::Degraded(_))
	}
}

#[derive(thiserror::Error, Debug)]
pub enum GraphFetchError {
	#[error("invalid url: {0}")]
	Url(String),
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("unexpected status: {0}")]
	Status(reqwest::StatusCode),
	#[error("failed to decode body: {0}")]
	Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
	Following,
	Followers,
}

impl Relation {
	/// Both the last path segment of the endpoint and the key of the list in
	/// its response body.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Following => "following",
			Self::Followers => "followers",
		}
	}
}

pub async fn following<G: ApiGlobal>(global: &Arc<G>, username: &str) -> GraphList<FollowingRecord> {
	load(global, username, Relation::Following).await
}

pub async fn followers<G: ApiGlobal>(global: &Arc<G>, username: &str) -> GraphList<FollowerRecord> {
	load(global, username, Relation::Followers).await
}

async fn load<G: ApiGlobal, T: DeserializeOwned>(global: &Arc<G>, username: &str, relation: Relation) -> GraphList<T> {
	match fetch(global, username, relation).await {
		Ok(items) => GraphList::Loaded(items),
		Err(err) => {
			tracing::warn!(username, relation = relation.as_str(), error = %err, "failed to fetch social graph");
			GraphList::Degraded(err.to_string())
		}
	}
}

/// Calls `GET {app.url}/api/{username}/{relation}`. A body without the list
/// (or with `null`) counts as an empty list.
pub async fn fetch<G: ApiGlobal, T: DeserializeOwned>(
	global: &Arc<G>,
	username: &str,
	relation: Relation,
) -> Result<Vec<T>, GraphFetchError> {
	let base = global.config::<SiteConfig>().base_url();

	let mut url = reqwest::Url::parse(base).map_err(|err| GraphFetchError::Url(err.to_string()))?;
	url.path_segments_mut()
		.map_err(|_| GraphFetchError::Url(base.to_string()))?
		.pop_if_empty()
		.extend(["api", username, relation.as_str()]);

	let resp = global
		.http_client()
		.get(url)
		.header(header::CONTENT_TYPE.as_str(), "application/json")
		.send()
		.await?;

	if !resp.status().is_success() {
		return Err(GraphFetchError::Status(resp.status()));
	}

	let mut body: serde_json::Map<String, Value> = resp.json().await?;

	match body.remove(relation.as_str()) {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(list) => Ok(serde_json::from_value(list)?),
	}
}
