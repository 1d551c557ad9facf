//! Omnivore API client
//!
//! A thin client for the Omnivore GraphQL API. Only the `search` operation is
//! implemented; it is the single remote call the exporter makes per run.

mod client;
mod types;

pub use client::{Client, ClientOpts, SearchOpts};
pub use types::{Label, SearchItem};
