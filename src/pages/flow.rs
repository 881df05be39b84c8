use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::ChainSession;
use crate::api::{ApiClient, Quest, QuestStore};
use crate::components::quest_chain::{QuestChainCanvas, SaveError};
use crate::config::ConsoleConfig;

#[derive(Clone, Debug, PartialEq)]
enum Status {
	Info(String),
	Error(String),
}

fn load_quests(config: &ConsoleConfig, session: ChainSession, status: RwSignal<Option<Status>>) {
	let client = ApiClient::new(config);
	spawn_local(async move {
		match client.fetch_quests().await {
			Ok(quests) => {
				info!("Loaded {} quests", quests.len());
				session.quests.set(quests);
			}
			Err(err) => {
				error!("Failed to load quests: {err}");
				status.set(Some(Status::Error(format!("Failed to load quests: {err}"))));
			}
		}
	});
}

/// Quest chain flow view: pick quests, wire prerequisites, save.
#[component]
pub fn Flow() -> impl IntoView {
	let config = expect_context::<ConsoleConfig>();
	let session = expect_context::<ChainSession>();
	let status = RwSignal::new(None::<Status>);
	let selected = RwSignal::new(String::new());
	let saving = RwSignal::new(false);

	load_quests(&config, session, status);

	let candidates = Memo::new(move |_| {
		let quests = session.quests.get();
		session
			.graph
			.with(|g| g.candidates(&quests).into_iter().cloned().collect::<Vec<Quest>>())
	});

	let add_selected = move |_| {
		let id = selected.get_untracked();
		let Some(quest) = session
			.quests
			.with_untracked(|qs| qs.iter().find(|q| q.id == id).cloned())
		else {
			return;
		};
		session.graph.update(|g| {
			if !g.contains(&quest.id) {
				g.add_node(&quest);
			}
		});
		selected.set(String::new());
	};

	let clear_chain = move |_| {
		session.graph.update(|g| g.clear());
		status.set(None);
	};

	let save_config = config.clone();
	let save_chain = move |_| {
		let quests = session.graph.with_untracked(|g| g.quests());
		let saver = session.saver.get_value();
		let client = ApiClient::new(&save_config);
		saving.set(true);
		status.set(Some(Status::Info(format!("Saving {} quests...", quests.len()))));
		spawn_local(async move {
			let outcome = saver.save(&client, quests).await;
			saving.set(saver.is_saving());
			match outcome {
				Ok(report) => {
					if let Some(all) = report.quests {
						session.quests.set(all);
					}
					status.set(Some(Status::Info(format!(
						"Saved {} quests in the chain",
						report.saved
					))));
				}
				Err(SaveError::AlreadyRunning) => {
					status.set(Some(Status::Info("A save is already running".into())));
				}
				Err(err @ SaveError::Failed { .. }) => {
					status.set(Some(Status::Error(err.to_string())));
				}
			}
		});
	};

	let summary = move || {
		session
			.graph
			.with(|g| format!("{} quests, {} prerequisite links", g.len(), g.edges().len()))
	};

	view! {
		<div class="flow-view">
			<div class="flow-toolbar">
				<select
					prop:value=move || selected.get()
					on:change=move |ev| selected.set(event_target_value(&ev))
				>
					<option value="">"Select a quest to add"</option>
					<For
						each=move || candidates.get()
						key=|q: &Quest| q.id.clone()
						children=move |q: Quest| {
							let label = format!("{} ({})", q.title, q.id);
							view! { <option value=q.id>{label}</option> }
						}
					/>
				</select>
				<button
					on:click=add_selected
					disabled=move || selected.with(|s| s.is_empty())
				>
					"Add to chain"
				</button>
				<button on:click=clear_chain>"Clear chain"</button>
				<button on:click=save_chain disabled=move || saving.get()>
					"Save chain"
				</button>
				<span class="flow-summary">{summary}</span>
			</div>
			{move || {
				status
					.get()
					.map(|s| match s {
						Status::Info(msg) => view! { <p class="status">{msg}</p> }.into_any(),
						Status::Error(msg) => view! { <p class="status error">{msg}</p> }.into_any(),
					})
			}}
			<div class="flow-canvas">
				<QuestChainCanvas graph=session.graph />
			</div>
		</div>
	}
}
