//! One-shot database initialization for the movie recommender.
//!
//! Ensures the movies collection exists, declares its indexes, and seeds the
//! sample catalog. Safe to re-run: collection and index setup are idempotent,
//! and the default insert policy upserts by title.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use moviedb_init::prelude::*;
//!
//! let config = MongoConfig::from_env();
//! let report = Seeder::connect(&config).await?.run().await?;
//! println!("{} movies in catalog", report.movie_count);
//! ```

pub mod config;
pub mod db;
pub mod indexes;
pub mod movies;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::MongoConfig;
    pub use crate::db::{InsertPolicy, SeedError, SeedReport, Seeder};
    pub use crate::indexes::{IndexOrder, IndexSpec, MOVIE_INDEXES};
    pub use crate::movies::{MOVIES_COLLECTION, MovieRecord, sample_movies};
}
