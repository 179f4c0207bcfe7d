pub mod content;
pub mod help;
pub mod query;
pub mod status_bar;
pub mod tags;
pub mod tree;
