use crate::model::Category;

/// Keyword tables in priority order. The first table with a hit wins.
const KEYWORDS: [(Category, &[&str]); 3] = [
    (
        Category::Clothing,
        &["hoodie", "jacket", "shirt", "t-shirt", "shoes", "running shoes", "denim"],
    ),
    (
        Category::Electronics,
        &["macbook", "laptop", "bluetooth", "headphones", "smartwatch", "usb", "hub", "watch"],
    ),
    (
        Category::Food,
        &["apples", "bread", "milk", "rice", "almond"],
    ),
];

/// Picks a category from the product's name and description.
///
/// Plain substring matching on the lower-cased text, so "hub" also hits
/// inside longer words. Falls back to `Category::Other`.
pub fn assign_category(name: &str, description: &str) -> Category {
    let text = format!("{} {}", name, description).to_lowercase();

    for (category, keywords) in KEYWORDS.iter() {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *category;
        }
    }

    Category::Other
}
