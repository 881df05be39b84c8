mod component;
mod graph;
mod layout;
mod persist;
mod render;
mod sync;
mod types;

pub use component::QuestChainCanvas;
pub use graph::ChainGraph;
pub use persist::{ChainSaver, SaveError};
pub use sync::SyncPolicy;
