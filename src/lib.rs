//! Single-month event calendar with a capped, write-through event store.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::EventStore`]:
//! ```
//! use monthcal::{
//!     core::store::{AddOutcome, EventStore},
//!     event::EventDraft,
//!     persist::memory::MemorySlot,
//! };
//!
//! let mut store = EventStore::open(MemorySlot::new());
//! let outcome = store.add_event(15, EventDraft::new("Standup", "9:00 AM", ["a@b.com"]));
//! assert!(matches!(outcome, AddOutcome::Added { index: 0, .. }));
//! assert_eq!(store.day(15)[0].name, "Standup");
//! ```
//!
//! Persisting to SQLite:
//! ```no_run
//! use monthcal::{
//!     core::store::EventStore,
//!     persist::sqlite::SqliteSlot,
//!     validate::EventForm,
//! };
//!
//! let slot = SqliteSlot::open("monthcal.db").expect("open sqlite");
//! let mut store = EventStore::open(slot);
//! store
//!     .add_form(10, &EventForm::new("Lunch", "12:30 PM", "x@y.com, z@y.com"))
//!     .expect("valid form");
//! ```
#![deny(missing_docs)]

/// Slot configuration.
pub mod config;
/// Event store and id index.
pub mod core;
/// Event records and the calendar mapping.
pub mod event;
/// Persistent slot abstraction, codec, and backends.
pub mod persist;
/// Shared primitive types and limits.
pub mod types;
/// Entry-form validation.
pub mod validate;
