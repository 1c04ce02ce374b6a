pub mod cli;
pub mod commands;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod snapshot;
