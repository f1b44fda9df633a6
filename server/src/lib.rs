//! Temperature/humidity ingestion and query service.
//!
//! A sensor POSTs readings to `/data`; browsers read the latest value from
//! `/data`, the full history from `/history`, and a rendered page from `/`.
//! All state lives in a [`store::ReadingStore`].

pub mod config;
pub mod db;
pub mod errors;
pub mod ingest;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod query;
pub mod rest;
pub mod store;
pub mod validate;
pub mod view;
