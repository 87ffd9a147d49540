//! pocketlinks: a personal link-bookmarking store.
//!
//! The [`managers::bookmark_store::BookmarkStore`] owns the link collection
//! and writes full snapshots through a [`gateway::PersistenceGateway`]
//! (local SQLite slot, remote links endpoint, or memory).

pub mod app;
pub mod config;
pub mod database;
pub mod gateway;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod types;
