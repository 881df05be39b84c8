use std::cell::Cell;

use log::{error, info, warn};
use thiserror::Error;

use crate::api::{ApiError, Quest, QuestStore};

#[derive(Debug, Error)]
pub enum SaveError {
	#[error("a chain save is already in progress")]
	AlreadyRunning,

	#[error("failed to save quest `{quest_id}` ({saved} saved before it): {source}")]
	Failed {
		quest_id: String,
		saved: usize,
		#[source]
		source: ApiError,
	},
}

/// Outcome of a completed save.
#[derive(Debug)]
pub struct SaveReport {
	pub saved: usize,
	/// Collection refetched after the flush; `None` if the refetch failed.
	pub quests: Option<Vec<Quest>>,
}

/// Flushes chain quests to the content API, one request at a time.
///
/// At most one save runs per saver; a second call while one is awaiting the
/// server fails with [`SaveError::AlreadyRunning`].
#[derive(Debug, Default)]
pub struct ChainSaver {
	in_flight: Cell<bool>,
}

struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl ChainSaver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_saving(&self) -> bool {
		self.in_flight.get()
	}

	/// PUTs every quest in order, stopping at the first failure.
	///
	/// Quests already written stay written. The quest list is an owned
	/// snapshot, so chain edits made while requests are pending do not leak
	/// into this flush.
	pub async fn save<S: QuestStore>(
		&self,
		store: &S,
		quests: Vec<Quest>,
	) -> Result<SaveReport, SaveError> {
		if self.in_flight.replace(true) {
			warn!("Chain save requested while another is in flight");
			return Err(SaveError::AlreadyRunning);
		}
		let _guard = InFlight(&self.in_flight);

		for (saved, quest) in quests.iter().enumerate() {
			if let Err(source) = store.update_quest(quest).await {
				error!("Saving quest {} failed after {saved} saved: {source}", quest.id);
				return Err(SaveError::Failed {
					quest_id: quest.id.clone(),
					saved,
					source,
				});
			}
		}
		info!("Saved {} chain quests", quests.len());

		let refreshed = match store.fetch_quests().await {
			Ok(all) => Some(all),
			Err(err) => {
				warn!("Chain saved but refreshing quests failed: {err}");
				None
			}
		};
		Ok(SaveReport {
			saved: quests.len(),
			quests: refreshed,
		})
	}
}
