// SQLite module - the only engine this crate drives
//
// - config: pool options and the bb8 connection manager
// - params: conversion from row values to rusqlite values
// - query: result extraction
// - connection: blocking execution on a pooled connection

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteManager, SqliteOptions, SqliteOptionsBuilder, build_pool};
pub use connection::SqliteConnection;
pub use params::Params;
pub use query::build_result_set;
