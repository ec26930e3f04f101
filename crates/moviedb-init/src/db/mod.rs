//! Database integration for the initialization run.
//!
//! The [`Seeder`] owns the database handle and performs the three setup
//! steps in order: collection, indexes, seed records.

mod seeder;

pub use seeder::{InsertPolicy, SeedError, SeedReport, Seeder};
