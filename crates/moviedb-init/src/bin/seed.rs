//! Default initialization binary - sets up the movie database
//!
//! Run with:
//! ```
//! cargo run -p moviedb-init --bin seed
//! ```

use moviedb_init::config::MongoConfig;
use moviedb_init::db::Seeder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MongoConfig::from_env();
    tracing::info!("Connecting to {}", config.display_target());

    let seeder = Seeder::connect(&config).await?;
    tracing::info!("Connected to database");

    let report = seeder.run().await?;

    // Summary output
    tracing::info!("Database initialization complete!");
    tracing::info!("  Collection created: {}", report.collection_created);
    tracing::info!("  Indexes ensured: {}", report.indexes.len());
    tracing::info!("  Movies inserted: {}", report.movies_inserted);
    tracing::info!("  Movies already present: {}", report.movies_skipped);
    tracing::info!("  Movies: {}", report.movie_count);

    Ok(())
}
