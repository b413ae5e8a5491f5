pub mod auth;
pub mod cors;
pub mod response_headers;
