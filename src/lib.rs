//! Leptos client-side quest chain editor: wiring, session state and routes.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod pages;

use crate::api::Quest;
use crate::components::quest_chain::{ChainGraph, ChainSaver};
use crate::config::ConsoleConfig;

// Top-Level pages
use crate::pages::flow::Flow;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Chain editing state that lives for the whole browser session.
#[derive(Clone, Copy)]
struct ChainSession {
	/// The chain being edited; starts empty.
	graph: RwSignal<ChainGraph>,
	/// The broader quest collection candidates are drawn from.
	quests: RwSignal<Vec<Quest>>,
	/// Single saver so at most one flush is ever in flight.
	saver: StoredValue<Rc<ChainSaver>, LocalStorage>,
}

impl ChainSession {
	fn new(config: &ConsoleConfig) -> Self {
		Self {
			graph: RwSignal::new(ChainGraph::with_policy(config.sync_policy)),
			quests: RwSignal::new(Vec::new()),
			saver: StoredValue::new_local(Rc::new(ChainSaver::new())),
		}
	}
}

/// An app router which renders the chain editor and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = ConsoleConfig::from_browser();
	info!("Content API at {}", config.api_base);
	provide_context(ChainSession::new(&config));
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Quest Chain Editor" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Flow />
			</Routes>
		</Router>
	}
}
