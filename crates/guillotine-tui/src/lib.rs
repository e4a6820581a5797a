// Library root: re-exports all modules so integration tests and the binary
// can reach the crate's public API.

pub mod app;
pub mod config;
pub mod db;
pub mod export;
pub mod protocol;
pub mod repository;
pub mod selection;
pub mod sleeper;
pub mod tui;
