//! Local slot database.
//!
//! A SQLite file holding named slots, each slot one opaque text value.
//! The local persistence gateway keeps the serialized link collection in
//! a single slot.
//!
//! # Usage
//!
//! ```no_run
//! use pocketlinks::database::Database;
//!
//! let db = Database::open("pocketlinks.db").expect("failed to open database");
//! db.write_slot("pocket-links", "[]").expect("write failed");
//! assert_eq!(db.read_slot("pocket-links").unwrap().as_deref(), Some("[]"));
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
