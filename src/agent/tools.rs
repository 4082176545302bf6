// Tool table exposed to the model
use crate::agent::wire::{FunctionCall, Part};
use crate::catalog::CatalogStore;
use crate::model::FilterQuery;
use serde_json::{Value, json};
use tracing::{info, warn};

pub const FILTER_PRODUCTS: &str = "filter_products";

/// Function declarations sent with every model request.
pub fn declarations() -> Vec<Value> {
    vec![json!({
        "name": FILTER_PRODUCTS,
        "description": "Filter products based on category and price constraints. \
                        Returns the matching products with id, name, description, price, image and category.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "description": "Category name to filter by (clothing, electronics, food, other). Case-insensitive.",
                    "nullable": true
                },
                "min_price": {
                    "type": "NUMBER",
                    "description": "Minimum price (inclusive)",
                    "nullable": true
                },
                "max_price": {
                    "type": "NUMBER",
                    "description": "Maximum price (inclusive)",
                    "nullable": true
                }
            }
        }
    })]
}

/// Runs one function call and builds the part that answers it.
///
/// Unknown tools are reported back to the model instead of failing the chat.
pub fn call_tool(store: &CatalogStore, call: &FunctionCall) -> Part {
    let response = match call.name.as_str() {
        FILTER_PRODUCTS => {
            let query = parse_filter_args(&call.args);
            let products = store.filter_products(&query);
            info!(
                "Tool {} called with {:?} -> {} products",
                call.name,
                query,
                products.len()
            );
            json!({ "products": products })
        }
        other => {
            warn!("Model requested unknown tool: {}", other);
            json!({ "error": format!("unknown function '{}'", other) })
        }
    };

    Part::function_response(&call.name, response)
}

/// Reads tool arguments leniently: numbers may arrive as strings and
/// "none"/"null"/empty mean the argument was not given.
pub fn parse_filter_args(args: &Value) -> FilterQuery {
    FilterQuery {
        category: string_arg(args, "category"),
        min_price: number_arg(args, "min_price"),
        max_price: number_arg(args, "max_price"),
    }
}

fn string_arg(args: &Value, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !is_unset(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn number_arg(args: &Value, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !is_unset(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        _ => None,
    }
}

fn is_unset(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::{Category, Product};

    fn store() -> CatalogStore {
        let product = |id, category, price| Product {
            id,
            name: format!("P{}", id),
            description: String::new(),
            price: Some(price),
            image: format!("/img/{}.png", id),
            category,
        };
        CatalogStore::with_catalog(Catalog {
            products: vec![
                product(1, Category::Clothing, 25.0),
                product(2, Category::Clothing, 70.0),
                product(3, Category::Food, 3.0),
            ],
            source: None,
            loaded_at: None,
        })
    }

    #[test]
    fn parses_typed_and_stringly_arguments() {
        let query = parse_filter_args(&json!({"category": "Clothing", "min_price": "10", "max_price": 50}));
        assert_eq!(
            query,
            FilterQuery::default().category("Clothing").min_price(10.0).max_price(50.0)
        );

        let query = parse_filter_args(&json!({"category": "None", "max_price": "$1,200"}));
        assert_eq!(query, FilterQuery::default().max_price(1200.0));

        assert_eq!(parse_filter_args(&Value::Null), FilterQuery::default());
        assert_eq!(
            parse_filter_args(&json!({"category": null, "min_price": "cheap"})),
            FilterQuery::default()
        );
    }

    #[test]
    fn filter_call_returns_matching_products() {
        let call = FunctionCall {
            name: FILTER_PRODUCTS.into(),
            args: json!({"category": "clothing", "max_price": 50}),
        };
        let part = call_tool(&store(), &call);
        let response = part.function_response.unwrap();
        assert_eq!(response.name, FILTER_PRODUCTS);
        let products = response.response["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], 1);
        assert_eq!(products[0]["category"], "clothing");
        assert_eq!(products[0]["image"], "/img/1.png");
    }

    #[test]
    fn unknown_tool_reports_an_error_payload() {
        let call = FunctionCall {
            name: "delete_everything".into(),
            args: json!({}),
        };
        let part = call_tool(&store(), &call);
        let response = part.function_response.unwrap();
        assert!(response.response["error"].as_str().unwrap().contains("delete_everything"));
    }

    #[test]
    fn declaration_names_the_filter_tool() {
        let decls = declarations();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0]["name"], FILTER_PRODUCTS);
        let props = &decls[0]["parameters"]["properties"];
        for key in ["category", "min_price", "max_price"] {
            assert!(props.get(key).is_some());
        }
    }
}
