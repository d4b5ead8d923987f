//! Small utilities shared across the stock-charter workspace.

pub mod env;
