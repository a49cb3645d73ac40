//! plugin-vtab - pushdown-aware virtual tables over a streaming plugin
//!
//! The engine plans with `table::VirtualTable::best_index`, opens a cursor,
//! and pulls rows the plugin streams back. Predicates and limits the plugin
//! can use are pushed down; everything else is re-checked by the engine.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod observability;
pub mod planner;
pub mod remote;
pub mod schema;
pub mod table;
pub mod value;
