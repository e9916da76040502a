use std::fmt;

use serde::{Deserialize, Serialize};

/// A single movie in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    /// Display title of the movie
    pub title: String,
    /// Genre used for recommendations
    pub genre: String,
}

impl CatalogItem {
    /// Create a new catalog item
    pub fn new(title: impl Into<String>, genre: impl Into<String>) -> Self {
        Self { title: title.into(), genre: genre.into() }
    }
}

/// Error type for catalog lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested index is outside the valid 1-based range
    OutOfRange {
        /// The index that was requested
        index: usize,
        /// Number of items in the catalog
        len: usize,
    },
}

impl std::error::Error for CatalogError {}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "Catalog index {index} is outside the valid range 1..={len}")
            }
        }
    }
}

/// Fixed, immutable list of movies, indexed 1-based to match the numbering
/// shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    /// The catalog entries, in listing order
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from an arbitrary list of items
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The standard ten-movie catalog
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            CatalogItem::new("Avengers: Endgame", "Action"),
            CatalogItem::new("Titanic", "Romance"),
            CatalogItem::new("Jurassic Park", "Science Fiction"),
            CatalogItem::new("The Lion King", "Animation"),
            CatalogItem::new("The Dark Knight", "Action"),
            CatalogItem::new("Forrest Gump", "Drama"),
            CatalogItem::new("Finding Nemo", "Animation"),
            CatalogItem::new("Inception", "Science Fiction"),
            CatalogItem::new("The Godfather", "Drama"),
            CatalogItem::new("Toy Story", "Animation"),
        ])
    }

    /// Number of movies in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no movies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by 1-based index
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OutOfRange` if `index` is outside `[1, len()]`
    pub fn item_at(&self, index: usize) -> Result<&CatalogItem, CatalogError> {
        index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .ok_or(CatalogError::OutOfRange { index, len: self.items.len() })
    }

    /// Title of the movie at the given 1-based index
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OutOfRange` if `index` is outside `[1, len()]`
    pub fn title_at(&self, index: usize) -> Result<&str, CatalogError> {
        self.item_at(index).map(|item| item.title.as_str())
    }

    /// Genre of the movie at the given 1-based index
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OutOfRange` if `index` is outside `[1, len()]`
    pub fn genre_at(&self, index: usize) -> Result<&str, CatalogError> {
        self.item_at(index).map(|item| item.genre.as_str())
    }

    /// Iterate over the catalog as (1-based index, item) pairs
    #[allow(clippy::arithmetic_side_effects)]
    pub fn entries(&self) -> impl Iterator<Item = (usize, &CatalogItem)> {
        self.items.iter().enumerate().map(|(i, item)| (i + 1, item))
    }

    /// Movies sharing the given genre whose index is not in `exclude`, as
    /// (1-based index, title) pairs in catalog order
    #[must_use]
    pub fn recommendations(&self, genre: &str, exclude: &[usize]) -> Vec<(usize, &str)> {
        self.entries()
            .filter(|(index, item)| item.genre == genre && !exclude.contains(index))
            .map(|(index, item)| (index, item.title.as_str()))
            .collect()
    }
}
