use crate::model::{FilterQuery, Product};

/// Returns the products matching every given criterion, in catalog order.
///
/// Category matching is a case-insensitive comparison against the
/// category name. Price bounds are inclusive. A product without a price
/// never satisfies a price bound.
pub fn filter_products(products: &[Product], query: &FilterQuery) -> Vec<Product> {
    let category = query
        .category
        .as_deref()
        .map(|c| c.trim().to_lowercase());

    products
        .iter()
        .filter(|p| match &category {
            Some(wanted) => p.category.as_str() == wanted,
            None => true,
        })
        .filter(|p| match query.min_price {
            Some(min) => p.price.is_some_and(|price| price >= min),
            None => true,
        })
        .filter(|p| match query.max_price {
            Some(max) => p.price.is_some_and(|price| price <= max),
            None => true,
        })
        .cloned()
        .collect()
}
