// Reads the product data file and turns it into validated products
use crate::categorizer::assign_category;
use crate::model::{CatalogError, Category, Product, RawProduct};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads all products from a JSON array file, in file order.
///
/// Records without a category get one from the categorizer; an explicit
/// category is kept as is.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_catalog(&content).map_err(|reason| CatalogError::Malformed {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parses and validates a whole document. Errors carry a readable reason.
pub fn parse_catalog(content: &str) -> Result<Vec<Product>, String> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;

    let records = match document {
        Value::Array(records) => records,
        other => {
            return Err(format!(
                "expected an array of products, found {}",
                json_kind(&other)
            ));
        }
    };

    let mut seen_ids = HashSet::new();
    let mut products = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let raw: RawProduct = serde_json::from_value(record)
            .map_err(|e| format!("record #{}: {}", index, e))?;

        if !seen_ids.insert(raw.id) {
            return Err(format!("record #{}: duplicate id {}", index, raw.id));
        }

        let product = normalize_product(raw).map_err(|e| format!("record #{}: {}", index, e))?;
        products.push(product);
    }

    Ok(products)
}

fn normalize_product(raw: RawProduct) -> Result<Product, String> {
    if let Some(price) = raw.price {
        if !price.is_finite() || price < 0.0 {
            return Err(format!("product {} has invalid price {}", raw.id, price));
        }
    }

    let category = match raw.category.as_deref() {
        Some(explicit) => explicit
            .parse::<Category>()
            .map_err(|e| format!("product {}: {}", raw.id, e))?,
        None => {
            let assigned = assign_category(&raw.name, &raw.description);
            debug!("Assigned category {} to product {}", assigned, raw.id);
            assigned
        }
    };

    Ok(Product {
        id: raw.id,
        name: raw.name,
        description: raw.description,
        price: raw.price,
        image: raw.image,
        category,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
