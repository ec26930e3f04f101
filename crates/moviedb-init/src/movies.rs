//! Movie record model and the sample catalog.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// Name of the collection the catalog is seeded into.
pub const MOVIES_COLLECTION: &str = "movies";

/// A movie document exactly as stored.
///
/// The store assigns `_id` on insert; it is deliberately not part of this
/// struct so the wire schema stays the declared field set and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    /// Comma-separated category labels, kept as one free-text field.
    pub genre: String,
    pub director: String,
    /// Expected range 0.0-10.0.
    pub rating: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl MovieRecord {
    /// Field names of the stored document, in declaration order.
    ///
    /// Used to cross-check index declarations against what is actually
    /// written.
    pub const FIELDS: [&'static str; 8] = [
        "title",
        "description",
        "release_year",
        "genre",
        "director",
        "rating",
        "created_at",
        "updated_at",
    ];

    /// Creates a record with both timestamps set to now.
    pub fn new(
        title: &str,
        description: &str,
        release_year: i32,
        genre: &str,
        director: &str,
        rating: f64,
    ) -> Self {
        let now = DateTime::now();
        Self {
            title: title.to_string(),
            description: description.to_string(),
            release_year,
            genre: genre.to_string(),
            director: director.to_string(),
            rating,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the record against the catalog's field rules.
    ///
    /// Returns one message per problem; an empty vec means the record is
    /// acceptable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description is required".to_string());
        }
        if self.release_year <= 1800 {
            problems.push(format!("invalid release year {}", self.release_year));
        }
        if self.genre.trim().is_empty() {
            problems.push("genre is required".to_string());
        }
        if !(0.0..=10.0).contains(&self.rating) {
            problems.push(format!("rating {} must be between 0 and 10", self.rating));
        }

        problems
    }
}

/// The six movies every fresh deployment starts with.
pub fn sample_movies() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years, finding solace and eventual \
             redemption through acts of common decency.",
            1994,
            "Drama",
            "Frank Darabont",
            9.3,
        ),
        MovieRecord::new(
            "The Godfather",
            "The aging patriarch of an organized crime dynasty transfers control of his \
             clandestine empire to his reluctant son.",
            1972,
            "Crime, Drama",
            "Francis Ford Coppola",
            9.2,
        ),
        MovieRecord::new(
            "The Dark Knight",
            "When the menace known as The Joker wreaks havoc and chaos on the people of \
             Gotham, Batman must accept one of the greatest psychological and physical tests.",
            2008,
            "Action, Crime, Drama",
            "Christopher Nolan",
            9.0,
        ),
        MovieRecord::new(
            "Pulp Fiction",
            "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in \
             four tales of violence and redemption.",
            1994,
            "Crime, Drama",
            "Quentin Tarantino",
            8.9,
        ),
        MovieRecord::new(
            "Inception",
            "A thief who steals corporate secrets through dream-sharing technology is given \
             the inverse task of planting an idea.",
            2010,
            "Action, Sci-Fi, Thriller",
            "Christopher Nolan",
            8.8,
        ),
        MovieRecord::new(
            "The Matrix",
            "A computer hacker learns from mysterious rebels about the true nature of his \
             reality and his role in the war against its controllers.",
            1999,
            "Action, Sci-Fi",
            "Lana Wachowski",
            8.7,
        ),
    ]
}
