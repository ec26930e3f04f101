//! Integration tests for the initialization run.
//!
//! These tests verify end-to-end behavior against a real MongoDB instance:
//! - collection, index, and seed setup on an empty database
//! - idempotence of a second run under the default policy
//! - the declared index catalog, including a working text index
//! - the opt-in unconditional insert policy
//! - index conflict surfacing
//!
//! To run these tests, you need a reachable MongoDB and the MONGODB_URL
//! environment variable set:
//!
//! Run with: `MONGODB_URL=mongodb://localhost:27017 cargo test -p moviedb-init`
//!
//! Note: each test works in its own scratch database and drops it when done,
//! so they can safely run against a development instance.

use std::env;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use moviedb_init::db::{InsertPolicy, SeedError, Seeder};
use moviedb_init::movies::{MOVIES_COLLECTION, MovieRecord};

/// Get a client, skipping tests if MONGODB_URL is not set or unreachable.
async fn get_test_client() -> Option<Client> {
    let url = match env::var("MONGODB_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: MONGODB_URL not set");
            return None;
        }
    };

    let client = match Client::with_uri_str(&url).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Skipping test: invalid MONGODB_URL: {e}");
            return None;
        }
    };

    // The client connects lazily; ping so an unreachable instance skips
    // instead of timing out inside every assertion.
    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => Some(client),
        Err(e) => {
            eprintln!("Skipping test: MongoDB not reachable: {e}");
            None
        }
    }
}

/// Returns an empty scratch database with the given name.
async fn scratch_db(client: &Client, name: &str) -> Database {
    let db = client.database(name);
    db.drop().await.expect("Failed to reset scratch database");
    db
}

fn movies(db: &Database) -> Collection<MovieRecord> {
    db.collection(MOVIES_COLLECTION)
}

#[tokio::test]
async fn first_run_seeds_six_movies() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_first_run").await;

    let report = Seeder::new(db.clone()).run().await.expect("Seeding failed");

    assert!(report.collection_created);
    assert_eq!(report.movies_inserted, 6);
    assert_eq!(report.movies_skipped, 0);
    assert_eq!(report.movie_count, 6);

    let count = movies(&db)
        .count_documents(doc! {})
        .await
        .expect("Failed to count movies");
    assert_eq!(count, 6);

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn second_run_is_a_no_op_by_default() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_rerun").await;
    let seeder = Seeder::new(db.clone());

    seeder.run().await.expect("First run failed");
    let indexes_after_first = movies(&db)
        .list_index_names()
        .await
        .expect("Failed to list indexes");

    let second = seeder.run().await.expect("Second run failed");

    assert!(!second.collection_created);
    assert_eq!(second.movies_inserted, 0);
    assert_eq!(second.movies_skipped, 6);
    assert_eq!(second.movie_count, 6);

    let indexes_after_second = movies(&db)
        .list_index_names()
        .await
        .expect("Failed to list indexes");
    assert_eq!(indexes_after_first, indexes_after_second);

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn declared_indexes_are_present() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_indexes").await;

    Seeder::new(db.clone()).run().await.expect("Seeding failed");

    let names = movies(&db)
        .list_index_names()
        .await
        .expect("Failed to list indexes");
    for expected in [
        "title_1",
        "genre_1",
        "year_1",
        "rating_-1",
        "title_text_description_text",
    ] {
        assert!(
            names.iter().any(|name| name == expected),
            "missing index {expected}, got {names:?}"
        );
    }

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn exact_title_lookup_finds_one_matrix() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_title_lookup").await;

    Seeder::new(db.clone()).run().await.expect("Seeding failed");

    let collection = movies(&db);
    let count = collection
        .count_documents(doc! { "title": "The Matrix" })
        .await
        .expect("Failed to count by title");
    assert_eq!(count, 1);

    let movie = collection
        .find_one(doc! { "title": "The Matrix" })
        .await
        .expect("Lookup failed")
        .expect("The Matrix not found");
    assert_eq!(movie.release_year, 1999);
    assert!((movie.rating - 8.7).abs() < f64::EPSILON);

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn text_search_finds_inception() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_text_search").await;

    Seeder::new(db.clone()).run().await.expect("Seeding failed");

    let movie = movies(&db)
        .find_one(doc! { "$text": { "$search": "dream-sharing" } })
        .await
        .expect("Text search failed")
        .expect("No text match for dream-sharing");
    assert_eq!(movie.title, "Inception");

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn insert_always_duplicates_on_rerun() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_insert_always").await;
    let seeder = Seeder::new(db.clone()).with_policy(InsertPolicy::InsertAlways);

    seeder.run().await.expect("First run failed");
    let second = seeder.run().await.expect("Second run failed");

    assert_eq!(second.movies_inserted, 6);
    assert_eq!(second.movie_count, 12);

    db.drop().await.expect("Failed to drop scratch database");
}

#[tokio::test]
async fn conflicting_index_spec_fails_the_run() {
    let Some(client) = get_test_client().await else {
        return;
    };
    let db = scratch_db(&client, "moviedb_test_index_conflict").await;

    // Pre-create "title_1" with a descending key so the declared ascending
    // spec conflicts under the same name.
    movies(&db)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "title": -1 })
                .options(IndexOptions::builder().name("title_1".to_string()).build())
                .build(),
        )
        .await
        .expect("Failed to pre-create conflicting index");

    let err = Seeder::new(db.clone())
        .run()
        .await
        .expect_err("Conflicting index spec should fail the run");
    match err {
        SeedError::IndexConflict { name, .. } => assert_eq!(name, "title_1"),
        other => panic!("expected IndexConflict, got {other:?}"),
    }

    db.drop().await.expect("Failed to drop scratch database");
}
