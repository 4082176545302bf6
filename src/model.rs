// Core structs: Product, Category, FilterQuery and the error enums
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Electronics,
    Food,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Clothing,
        Category::Electronics,
        Category::Food,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "clothing",
            Category::Electronics => "electronics",
            Category::Food => "food",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// A product record as it appears in the data file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// A validated catalog entry. `category` is always set once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub image: String,
    pub category: Category,
}

/// Arguments of a `filter_products` call. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

#[cfg(test)]
impl FilterQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Malformed product data in {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Model API responded [{status}]: {body}")]
    Api { status: u16, body: String },
    #[error("Model returned no usable candidate")]
    EmptyResponse,
    #[error("Gave up after {0} tool rounds")]
    ToolRoundsExceeded(usize),
    #[error("Model request timed out")]
    Timeout,
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AgentError::Timeout
        } else {
            AgentError::Http(e.to_string())
        }
    }
}
