//! Console configuration, read from browser storage at startup.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::quest_chain::SyncPolicy;

const API_BASE_KEY: &str = "apiBase";
const TOKEN_KEY: &str = "authToken";
const SYNC_POLICY_KEY: &str = "chainSyncPolicy";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
	/// Absolute origin of the content API, e.g. `http://localhost:8080`.
	pub api_base: String,
	/// Session token written by the login flow; sent as `Authorization`.
	pub token: Option<String>,
	pub sync_policy: SyncPolicy,
}

impl Default for ConsoleConfig {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:8080".into(),
			token: None,
			sync_policy: SyncPolicy::default(),
		}
	}
}

impl ConsoleConfig {
	/// Reads overrides from `localStorage`, falling back to the page origin
	/// for the API base.
	pub fn from_browser() -> Self {
		let mut config = Self::default();
		let Some(window) = web_sys::window() else {
			return config;
		};
		if let Ok(origin) = window.location().origin() {
			config.api_base = origin;
		}
		let storage = window.local_storage().ok().flatten();
		let get = |key: &str| storage.as_ref().and_then(|s| s.get_item(key).ok().flatten());

		if let Some(base) = get(API_BASE_KEY).filter(|b| !b.is_empty()) {
			config.api_base = base;
		}
		config.token = get(TOKEN_KEY).filter(|t| !t.is_empty());
		if let Some(raw) = get(SYNC_POLICY_KEY) {
			config.sync_policy = parse_sync_policy(&raw).unwrap_or_else(|| {
				warn!("Ignoring unknown {SYNC_POLICY_KEY} `{raw}`");
				SyncPolicy::default()
			});
		}
		config
	}
}

fn parse_sync_policy(raw: &str) -> Option<SyncPolicy> {
	serde_json::from_value(serde_json::Value::String(raw.trim().to_owned())).ok()
}
