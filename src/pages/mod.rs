pub mod flow;
pub mod not_found;
