pub mod auth;
pub mod completions;
