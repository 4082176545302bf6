// Turns the agent's final text into the chat response envelope
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub products: Vec<Value>,
}

/// A JSON object with a `products` key becomes `{reply: explanation, products}`.
/// Anything else is passed through as plain text with no products.
pub fn parse_agent_reply(raw: &str) -> ChatResponse {
    let body = strip_code_fence(raw.trim());

    if let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(body) {
        if let Some(products) = object.remove("products") {
            let reply = match object.remove("explanation") {
                Some(Value::String(s)) => s,
                _ => String::new(),
            };
            let products = match products {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            return ChatResponse { reply, products };
        }
    }

    ChatResponse {
        reply: raw.to_string(),
        products: Vec::new(),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence line.
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}
