//! `GET /bfhl`: static description of the `POST /bfhl` operation.

use axum::Json;
use serde_json::{Value, json};

/// GET /bfhl
pub(super) async fn describe() -> Json<Value> {
    Json(description())
}

fn description() -> Value {
    json!({
        "endpoint": "/bfhl",
        "method": "POST",
        "request": { "data": ["<token>", "..."] },
        "rules": {
            "odd_numbers": "integer tokens with odd value, original text",
            "even_numbers": "integer tokens with even value, original text",
            "alphabets": "tokens made only of letters, uppercased",
            "special_characters": "non-empty tokens with no letters or digits, unchanged",
            "sum": "sum of all integer tokens, as a string",
            "concat_string": "letters of all alphabet tokens, reversed, upper case at even positions and lower case at odd positions",
            "dropped": "tokens mixing letters and digits appear in no output",
        },
        "errors": {
            "400": "Data array is required",
            "500": "Internal server error: <detail>",
        },
        "example": {
            "request": { "data": ["a", "1", "334", "4", "R", "$"] },
            "response": {
                "odd_numbers": ["1"],
                "even_numbers": ["334", "4"],
                "alphabets": ["A", "R"],
                "special_characters": ["$"],
                "sum": "339",
                "concat_string": "Ra",
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    #[test]
    fn worked_example_matches_classifier() {
        let doc = description();
        let example = &doc["example"];
        let tokens: Vec<String> =
            serde_json::from_value(example["request"]["data"].clone()).unwrap();
        let r = classify(&tokens).unwrap();
        let expected = &example["response"];
        assert_eq!(json!(r.odd_numbers), expected["odd_numbers"]);
        assert_eq!(json!(r.even_numbers), expected["even_numbers"]);
        assert_eq!(json!(r.alphabets), expected["alphabets"]);
        assert_eq!(json!(r.special_characters), expected["special_characters"]);
        assert_eq!(json!(r.sum.to_string()), expected["sum"]);
        assert_eq!(json!(r.concat_string), expected["concat_string"]);
    }
}
