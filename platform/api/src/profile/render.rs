use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use super::feed::{FeedAnswer, FeedQuestion};
use super::social_graph::GraphList;
use super::{PageMetadata, Profile};
use crate::database::{PublicUser, User};

/// Escapes text for use in HTML content and quoted attribute values.
pub struct Escape<'a>(pub &'a str);

impl fmt::Display for Escape<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut last = 0;

		for (idx, c) in self.0.char_indices() {
			let replacement = match c {
				'&' => "&amp;",
				'<' => "&lt;",
				'>' => "&gt;",
				'"' => "&quot;",
				'\'' => "&#39;",
				_ => continue,
			};

			f.write_str(&self.0[last..idx])?;
			f.write_str(replacement)?;
			last = idx + c.len_utf8();
		}

		f.write_str(&self.0[last..])
	}
}

/// How long ago `then` was, in the largest whole unit.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
	let secs = (now - then).num_seconds().max(0);

	let (amount, unit) = match secs {
		0..=59 => return "just now".to_string(),
		60..=3_599 => (secs / 60, "minute"),
		3_600..=86_399 => (secs / 3_600, "hour"),
		86_400..=2_591_999 => (secs / 86_400, "day"),
		2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
		_ => (secs / 31_536_000, "year"),
	};

	if amount == 1 {
		format!("1 {unit} ago")
	} else {
		format!("{amount} {unit}s ago")
	}
}

pub fn render_profile(profile: &Profile, now: DateTime<Utc>) -> Result<String, fmt::Error> {
	let mut out = String::new();

	write_head(&mut out, &format!("{} (@{})", profile.user.name, profile.user.username), &profile.metadata)?;

	out.push_str("<body><main class=\"profile\">");
	write_nav(&mut out, profile)?;
	write_sidebar(&mut out, &profile.user, &profile.followers, &profile.following)?;

	let highlight = profile.highlight.as_ref().map(|q| q.id);

	out.push_str("<section class=\"question-feed\">");
	if profile.feed.questions.is_empty() {
		out.push_str("<p class=\"empty\">No questions yet.</p>");
	}
	for question in &profile.feed.questions {
		write_question(&mut out, question, profile.owner(), highlight == Some(question.question.id), now)?;
	}
	out.push_str("</section>");

	write_floating_card(&mut out, &profile.user, profile.viewer.as_ref().map(|v| v.user_id.to_string()))?;

	out.push_str("</main></body></html>");

	Ok(out)
}

pub fn render_not_found(username: &str) -> Result<String, fmt::Error> {
	let mut out = String::new();

	out.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>User not found</title></head>");
	write!(
		out,
		"<body><main class=\"not-found\"><h1>User not found</h1><p>There is no user called @{}.</p><a \
		 href=\"/\">Go back home</a></main></body></html>",
		Escape(username)
	)?;

	Ok(out)
}

fn write_head(out: &mut String, title: &str, meta: &PageMetadata) -> fmt::Result {
	let description = Escape(&meta.description);
	let image = Escape(&meta.image_url);
	let meta_title = Escape(&meta.title);

	write!(
		out,
		"<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" \
		 content=\"width=device-width, initial-scale=1\"><title>{}</title>",
		Escape(title)
	)?;
	write!(out, "<meta name=\"description\" content=\"{description}\">")?;

	write!(out, "<meta property=\"og:title\" content=\"{meta_title}\">")?;
	write!(out, "<meta property=\"og:description\" content=\"{description}\">")?;
	write!(out, "<meta property=\"og:image\" content=\"{image}\">")?;
	write!(out, "<meta property=\"og:image:width\" content=\"{}\">", meta.image_width)?;
	write!(out, "<meta property=\"og:image:height\" content=\"{}\">", meta.image_height)?;
	write!(out, "<meta property=\"og:image:alt\" content=\"{meta_title}\">")?;

	write!(out, "<meta name=\"twitter:card\" content=\"{}\">", meta.twitter_card)?;
	write!(out, "<meta name=\"twitter:title\" content=\"{meta_title}\">")?;
	write!(out, "<meta name=\"twitter:description\" content=\"{description}\">")?;
	write!(out, "<meta name=\"twitter:image\" content=\"{image}\">")?;

	out.push_str("</head>");

	Ok(())
}

fn write_nav(out: &mut String, profile: &Profile) -> fmt::Result {
	out.push_str("<nav class=\"profile-nav\"><a class=\"back\" href=\"/\">Back</a>");

	if profile.owner() {
		out.push_str("<a class=\"settings\" href=\"/settings\">Settings</a>");
	} else if profile.viewer.is_none() {
		out.push_str("<a class=\"login\" href=\"/auth/signin\">Login</a>");
	}

	out.push_str("</nav>");

	Ok(())
}

fn write_avatar(out: &mut String, src: &str, alt: &str) -> fmt::Result {
	write!(
		out,
		"<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
		Escape(src),
		Escape(alt)
	)
}

fn write_sidebar<F, G>(out: &mut String, user: &User, followers: &GraphList<F>, following: &GraphList<G>) -> fmt::Result
where
	F: GraphEntry,
	G: GraphEntry,
{
	out.push_str("<aside class=\"user-sidebar\">");

	write_avatar(out, user.profile_picture.as_deref().unwrap_or_default(), &user.name)?;
	write!(
		out,
		"<h1 class=\"name\">{}</h1><p class=\"username\">@{}</p>",
		Escape(&user.name),
		Escape(&user.username)
	)?;

	if let Some(bio) = user.bio.as_deref().filter(|bio| !bio.is_empty()) {
		write!(out, "<p class=\"bio\">{}</p>", Escape(bio))?;
	}

	if !user.socials.0.is_empty() {
		out.push_str("<ul class=\"socials\">");
		for social in &user.socials.0 {
			match web_link(&social.url) {
				Some(href) => write!(
					out,
					"<li><a href=\"{}\" rel=\"noopener noreferrer\">{}</a></li>",
					Escape(href.as_str()),
					Escape(&social.platform)
				)?,
				None => write!(out, "<li>{}</li>", Escape(&social.platform))?,
			}
		}
		out.push_str("</ul>");
	}

	write_graph_list(out, "followers", "Followers", followers)?;
	write_graph_list(out, "following", "Following", following)?;

	out.push_str("</aside>");

	Ok(())
}

/// Only `http` and `https` links are rendered as links.
fn web_link(raw: &str) -> Option<url::Url> {
	url::Url::parse(raw.trim())
		.ok()
		.filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// A social graph record, reduced to the user on the other end.
pub trait GraphEntry {
	fn user(&self) -> &PublicUser;
}

impl GraphEntry for crate::database::FollowingRecord {
	fn user(&self) -> &PublicUser {
		&self.following
	}
}

impl GraphEntry for crate::database::FollowerRecord {
	fn user(&self) -> &PublicUser {
		&self.follower
	}
}

fn write_graph_list<T: GraphEntry>(out: &mut String, class: &str, label: &str, list: &GraphList<T>) -> fmt::Result {
	write!(
		out,
		"<section class=\"{class}\"><h2>{label} <span class=\"count\">{}</span></h2><ul>",
		list.len()
	)?;

	for entry in list.items() {
		let user = entry.user();
		out.push_str("<li>");
		write!(out, "<a href=\"/{}\">", Escape(&user.username))?;
		write_avatar(out, user.profile_picture.as_deref().unwrap_or_default(), &user.name)?;
		write!(out, "<span>{}</span></a></li>", Escape(&user.name))?;
	}

	out.push_str("</ul></section>");

	Ok(())
}

fn write_question(
	out: &mut String,
	item: &FeedQuestion,
	owner: bool,
	highlighted: bool,
	now: DateTime<Utc>,
) -> fmt::Result {
	let question = &item.question;

	write!(
		out,
		"<article class=\"question-card{}\" id=\"question-{}\">",
		if highlighted { " highlighted" } else { "" },
		question.id
	)?;

	out.push_str("<header>");
	match item.sender.as_ref().filter(|_| !question.is_anonymous) {
		Some(sender) => {
			write_avatar(out, &sender.profile_picture, &sender.name)?;
			write!(out, "<span class=\"sender\">{}</span>", Escape(&sender.name))?;
		}
		None => out.push_str("<span class=\"sender anonymous\">Anonymous</span>"),
	}
	write!(
		out,
		"<time datetime=\"{}\">{}</time></header>",
		question.created_at.to_rfc3339(),
		relative_time(question.created_at, now)
	)?;

	write!(out, "<p class=\"content\">{}</p>", Escape(&question.content))?;

	let count = item.answers.len();
	write!(
		out,
		"<footer><span class=\"answer-count\">{count} {}</span>",
		if count == 1 { "answer" } else { "answers" }
	)?;
	if owner {
		write!(
			out,
			"<button class=\"answer\" data-question-id=\"{}\">Answer</button>",
			question.id
		)?;
	}
	out.push_str("</footer>");

	for answer in &item.answers {
		write_answer(out, answer)?;
	}

	out.push_str("</article>");

	Ok(())
}

fn write_answer(out: &mut String, answer: &FeedAnswer) -> fmt::Result {
	write!(out, "<div class=\"answer-card\" id=\"answer-{}\">", answer.id)?;
	write_avatar(out, &answer.profile_picture, &answer.username)?;
	write!(
		out,
		"<div><h4>{}</h4><p>{}</p></div></div>",
		Escape(&answer.username),
		Escape(&answer.content)
	)
}

fn write_floating_card(out: &mut String, receiver: &User, logged_user_id: Option<String>) -> fmt::Result {
	write!(
		out,
		"<aside class=\"floating-card\" data-receiver-id=\"{}\" data-logged-user-id=\"{}\"><form method=\"post\" \
		 action=\"/api/questions\"><input type=\"hidden\" name=\"recipientId\" value=\"{}\"><textarea name=\"content\" \
		 placeholder=\"Ask @{} a question\"></textarea>",
		receiver.id,
		logged_user_id.as_deref().unwrap_or_default(),
		receiver.id,
		Escape(&receiver.username)
	)?;

	if logged_user_id.is_some() {
		out.push_str("<label><input type=\"checkbox\" name=\"isAnonymous\"> Ask anonymously</label>");
	}

	out.push_str("<button type=\"submit\">Send</button></form></aside>");

	Ok(())
}
