pub mod quest_chain;
