pub mod ai;
pub mod fetch;
pub mod search;
