//! Event recommender - nearest-neighbour event recommendations
//!
//! Builds a binary users × events registration matrix from the entity
//! store, fits a cosine nearest-neighbour index over its rows, and serves
//! recommendations drawn from the registrations of similar users.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod di;
pub mod error;
pub mod models;
pub mod recommender;
pub mod services;

// Re-export FromRef at crate root for the DI macros
pub use di::FromRef;
