//! Content API: quest wire types and the HTTP client the editor talks to.

mod client;
mod error;
mod types;

pub use client::{ApiClient, QuestStore};
pub use error::ApiError;
pub use types::Quest;
