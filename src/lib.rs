//! Catalog browsing and admin analytics over an in-memory media catalog.
//!
//! The [`data`] module holds the query engine (normalize → filter →
//! sort/dedupe → aggregate | paginate); [`screen`] fixes per-screen settings
//! and [`state`] keeps the UI-independent selection state.

pub mod auth;
pub mod data;
pub mod error;
pub mod screen;
pub mod state;
