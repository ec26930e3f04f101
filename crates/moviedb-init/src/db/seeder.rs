//! Database seeding for the movie catalog.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MongoConfig;
use crate::indexes::{self, MOVIE_INDEXES};
use crate::movies::{self, MOVIES_COLLECTION, MovieRecord};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot reach MongoDB: {0}")]
    Connection(#[source] mongodb::error::Error),
    #[error("index {name} already exists with a different specification: {source}")]
    IndexConflict {
        name: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("seeding movies failed: {0}")]
    Insert(#[source] mongodb::error::Error),
    #[error("seed record {title:?} is invalid: {reason}")]
    InvalidRecord { title: String, reason: String },
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("BSON encoding error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),
}

/// How seed records are written into a collection that may already hold
/// data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Insert each record only if no document with its title exists yet.
    /// Re-running the initialization is a no-op for the data.
    #[default]
    UpsertByTitle,
    /// Unconditional batch insert. Re-running duplicates the catalog; kept
    /// as an explicit opt-in because some deployments reset the database
    /// on every start and want the cheapest possible write path.
    InsertAlways,
}

/// What a completed run did, for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Whether this run created the collection (false if it already existed).
    pub collection_created: bool,
    /// Names of the indexes ensured, in declaration order.
    pub indexes: Vec<String>,
    /// Records written by this run.
    pub movies_inserted: u64,
    /// Records skipped because a document with the same title existed.
    pub movies_skipped: u64,
    /// Total documents in the collection after the run.
    pub movie_count: u64,
}

/// One-shot initializer for the movie database.
pub struct Seeder {
    db: Database,
    policy: InsertPolicy,
}

impl Seeder {
    /// Creates a seeder over an existing database handle.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            policy: InsertPolicy::default(),
        }
    }

    /// Connects to the configured instance and verifies it is reachable.
    ///
    /// The driver connects lazily, so this pings the target once; auth and
    /// reachability problems surface here rather than halfway through
    /// seeding.
    pub async fn connect(config: &MongoConfig) -> Result<Self, SeedError> {
        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(SeedError::Connection)?;
        options.app_name = Some("moviedb-init".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(options).map_err(SeedError::Connection)?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(SeedError::Connection)?;

        Ok(Self::new(db))
    }

    /// Sets the insert policy for seed records.
    pub fn with_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn movies(&self) -> Collection<MovieRecord> {
        self.db.collection(MOVIES_COLLECTION)
    }

    /// Runs the whole initialization: validates the catalog, ensures the
    /// collection and its indexes, writes the seed records, and counts the
    /// result.
    ///
    /// The first error aborts the run; a failed run can simply be rerun
    /// once the cause is fixed, since every step tolerates partial state
    /// from an earlier attempt.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        let catalog = movies::sample_movies();
        for movie in &catalog {
            let problems = movie.validate();
            if !problems.is_empty() {
                return Err(SeedError::InvalidRecord {
                    title: movie.title.clone(),
                    reason: problems.join("; "),
                });
            }
        }

        let collection_created = self.ensure_collection().await?;

        for (index, field) in indexes::unknown_fields(MOVIE_INDEXES, &MovieRecord::FIELDS) {
            warn!("index {index} targets field {field:?}, which no seeded document carries");
        }

        let index_names = self.ensure_indexes().await?;
        let (movies_inserted, movies_skipped) = self.seed_movies(&catalog).await?;
        let movie_count = self.movies().count_documents(doc! {}).await?;

        Ok(SeedReport {
            collection_created,
            indexes: index_names,
            movies_inserted,
            movies_skipped,
            movie_count,
        })
    }

    /// Creates the movies collection if it does not exist yet.
    ///
    /// Returns whether this run created it.
    pub async fn ensure_collection(&self) -> Result<bool, SeedError> {
        let existing = self.db.list_collection_names().await?;
        if existing.iter().any(|name| name == MOVIES_COLLECTION) {
            info!("Collection {MOVIES_COLLECTION} already exists");
            return Ok(false);
        }

        self.db.create_collection(MOVIES_COLLECTION).await?;
        info!("Created collection {MOVIES_COLLECTION}");
        Ok(true)
    }

    /// Creates every declared index, returning their names.
    ///
    /// Re-creating an index with an identical specification is a server-side
    /// no-op. An existing index with the same name but a different
    /// specification fails the run; it is never dropped and recreated.
    pub async fn ensure_indexes(&self) -> Result<Vec<String>, SeedError> {
        info!("Ensuring {} indexes...", MOVIE_INDEXES.len());
        let collection = self.movies();
        let mut names = Vec::with_capacity(MOVIE_INDEXES.len());

        for spec in MOVIE_INDEXES {
            let name = spec.name();
            collection
                .create_index(spec.to_model())
                .await
                .map_err(|err| classify_index_error(name.clone(), err))?;
            names.push(name);
        }

        info!("Ensured {} indexes", names.len());
        Ok(names)
    }

    /// Writes the seed records according to the configured policy.
    ///
    /// Returns `(inserted, skipped)` counts.
    pub async fn seed_movies(&self, catalog: &[MovieRecord]) -> Result<(u64, u64), SeedError> {
        info!("Seeding {} movies...", catalog.len());
        let collection = self.movies();

        let (inserted, skipped) = match self.policy {
            InsertPolicy::InsertAlways => {
                let result = collection
                    .insert_many(catalog)
                    .await
                    .map_err(SeedError::Insert)?;
                (result.inserted_ids.len() as u64, 0)
            }
            InsertPolicy::UpsertByTitle => {
                let mut inserted = 0;
                let mut skipped = 0;
                for movie in catalog {
                    let document = mongodb::bson::to_document(movie)?;
                    let result = collection
                        .update_one(
                            doc! { "title": &movie.title },
                            doc! { "$setOnInsert": document },
                        )
                        .upsert(true)
                        .await
                        .map_err(SeedError::Insert)?;
                    if result.upserted_id.is_some() {
                        inserted += 1;
                    } else {
                        skipped += 1;
                    }
                }
                (inserted, skipped)
            }
        };

        info!("Seeded {inserted} movies ({skipped} already present)");
        Ok((inserted, skipped))
    }

    /// Returns a reference to the database handle for advanced usage.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Index creation against an existing name with a different specification
/// comes back as a command error (IndexOptionsConflict or
/// IndexKeySpecsConflict); everything else stays a plain database error.
fn classify_index_error(name: String, err: mongodb::error::Error) -> SeedError {
    let conflict = matches!(
        *err.kind,
        ErrorKind::Command(ref command) if command.code == 85 || command.code == 86
    );
    if conflict {
        SeedError::IndexConflict { name, source: err }
    } else {
        SeedError::Database(err)
    }
}
