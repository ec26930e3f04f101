//! Declarative index set for the movies collection.
//!
//! The specs here are data, not behavior: each one names the fields it
//! covers and the order (or text) of each field, derives the same index
//! name the server would, and can be turned into a driver [`IndexModel`].

use mongodb::IndexModel;
use mongodb::bson::{Bson, Document};
use mongodb::options::IndexOptions;

/// Per-field index direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    Ascending,
    Descending,
    Text,
}

impl IndexOrder {
    /// The key value the server expects for this order.
    fn key_value(self) -> Bson {
        match self {
            Self::Ascending => Bson::Int32(1),
            Self::Descending => Bson::Int32(-1),
            Self::Text => Bson::String("text".to_string()),
        }
    }

    /// The suffix the server appends when deriving the index name.
    fn name_suffix(self) -> &'static str {
        match self {
            Self::Ascending => "1",
            Self::Descending => "-1",
            Self::Text => "text",
        }
    }
}

/// One index declaration: ordered (field, order) pairs.
#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    pub fields: &'static [(&'static str, IndexOrder)],
}

impl IndexSpec {
    /// Derives the name the server would assign, e.g. `rating_-1` or
    /// `title_text_description_text`.
    pub fn name(&self) -> String {
        self.fields
            .iter()
            .map(|(field, order)| format!("{field}_{}", order.name_suffix()))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The key document for index creation.
    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        for (field, order) in self.fields {
            keys.insert(*field, order.key_value());
        }
        keys
    }

    /// Builds the driver-side model, with the derived name set explicitly
    /// so conflicts are always conflicts by that name.
    pub fn to_model(&self) -> IndexModel {
        IndexModel::builder()
            .keys(self.keys())
            .options(IndexOptions::builder().name(self.name()).build())
            .build()
    }
}

/// The five indexes declared on the movies collection.
///
/// The `year` entry is kept exactly as the deployment has always declared
/// it, even though seeded documents store `release_year`; the seeder warns
/// about the mismatch at startup instead of guessing which name is right.
pub const MOVIE_INDEXES: &[IndexSpec] = &[
    IndexSpec { fields: &[("title", IndexOrder::Ascending)] },
    IndexSpec { fields: &[("genre", IndexOrder::Ascending)] },
    IndexSpec { fields: &[("year", IndexOrder::Ascending)] },
    IndexSpec { fields: &[("rating", IndexOrder::Descending)] },
    IndexSpec {
        fields: &[
            ("title", IndexOrder::Text),
            ("description", IndexOrder::Text),
        ],
    },
];

/// Returns `(index name, field)` for every indexed field that does not
/// appear in `known_fields`.
pub fn unknown_fields(specs: &[IndexSpec], known_fields: &[&str]) -> Vec<(String, String)> {
    let mut mismatches = Vec::new();
    for spec in specs {
        for (field, _) in spec.fields {
            if !known_fields.contains(field) {
                mismatches.push((spec.name(), field.to_string()));
            }
        }
    }
    mismatches
}
