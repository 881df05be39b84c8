use log::{debug, warn};
use reqwest::header::AUTHORIZATION;

use super::error::ApiError;
use super::types::{Quest, QuestList};
use crate::config::ConsoleConfig;

/// The slice of the content API the chain editor depends on.
#[allow(async_fn_in_trait)]
pub trait QuestStore {
	/// Fetches the full quest collection.
	async fn fetch_quests(&self) -> Result<Vec<Quest>, ApiError>;

	/// Replaces the stored quest addressed by `quest.id`.
	async fn update_quest(&self, quest: &Quest) -> Result<(), ApiError>;
}

/// HTTP client for `/api/quests`.
#[derive(Clone, Debug)]
pub struct ApiClient {
	http: reqwest::Client,
	base: String,
	token: Option<String>,
}

impl ApiClient {
	pub fn new(config: &ConsoleConfig) -> Self {
		Self {
			http: reqwest::Client::new(),
			base: config.api_base.trim_end_matches('/').to_owned(),
			token: config.token.clone(),
		}
	}

	fn url(&self, path: &str) -> Result<reqwest::Url, ApiError> {
		let raw = format!("{}{}", self.base, path);
		reqwest::Url::parse(&raw).map_err(|_| ApiError::BaseUrl(raw))
	}

	fn quest_url(&self, id: &str) -> Result<reqwest::Url, ApiError> {
		let mut url = self.url("/api/quests")?;
		url.path_segments_mut()
			.map_err(|_| ApiError::BaseUrl(self.base.clone()))?
			.push(id);
		Ok(url)
	}

	fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
		match &self.token {
			Some(token) => req.header(AUTHORIZATION, token),
			None => req,
		}
	}

	async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
		let status = resp.status();
		if status.is_success() {
			return Ok(resp);
		}
		let body = resp.text().await.unwrap_or_default();
		let err = ApiError::from_status(status.as_u16(), &body);
		warn!("{err}");
		Err(err)
	}
}

impl QuestStore for ApiClient {
	async fn fetch_quests(&self) -> Result<Vec<Quest>, ApiError> {
		let req = self.authorize(self.http.get(self.url("/api/quests")?));
		let resp = Self::check(req.send().await?).await?;
		let text = resp.text().await?;
		let list: QuestList = serde_json::from_str(&text)?;
		debug!("Fetched {} quests", list.quests.len());
		Ok(list.quests)
	}

	async fn update_quest(&self, quest: &Quest) -> Result<(), ApiError> {
		let req = self.authorize(self.http.put(self.quest_url(&quest.id)?).json(quest));
		Self::check(req.send().await?).await?;
		debug!("Updated quest {}", quest.id);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ConsoleConfig;

	fn client(base: &str) -> ApiClient {
		ApiClient::new(&ConsoleConfig {
			api_base: base.to_owned(),
			..ConsoleConfig::default()
		})
	}

	#[test]
	fn quest_url_escapes_the_id_segment() {
		let url = client("http://localhost:8080/").quest_url("a b/c").unwrap();
		assert_eq!(url.as_str(), "http://localhost:8080/api/quests/a%20b%2Fc");
	}

	#[test]
	fn relative_base_is_rejected() {
		let err = client("/panel").url("/api/quests").unwrap_err();
		assert!(matches!(err, ApiError::BaseUrl(_)));
	}
}
