//! Trait definitions for PDS Registry operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! endpoint differences in the implementations.

mod get;
mod search;

pub use get::Get;
pub use search::{Search, DEFAULT_PAGE_SIZE};
pub(crate) use search::MAX_PAGES;
