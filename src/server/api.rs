//! Axum handlers for the BFHL routes.
//!
//! `POST /bfhl` is the only handler with behaviour; the rest are static.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::classifier::{self, Classification};
use crate::config::IdentityConfig;
use crate::error::ApiError;

use super::ApiState;

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BfhlRequest {
    /// Kept loose so that every empty shape maps to the same 400.
    pub data: Option<Value>,
}

impl BfhlRequest {
    /// Extract the token list.
    ///
    /// Missing, `null`, `false`, `0`, `""`, `[]` and `{}` mean "no data" (400).
    /// Any other non-array value, or an array holding a non-string, is a
    /// malformed body (500).
    pub fn into_tokens(self) -> Result<Vec<String>, ApiError> {
        let data = self.data.unwrap_or(Value::Null);
        if is_empty_value(&data) {
            return Err(ApiError::data_required());
        }
        let items = match data {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::Internal(format!(
                    "data must be an array of strings, got {}",
                    type_name(&other)
                )));
            }
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s),
                other => Err(ApiError::Internal(format!(
                    "data[{i}] must be a string, got {}",
                    type_name(&other)
                ))),
            })
            .collect()
    }
}

fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BfhlResponse {
    pub is_success: bool,
    pub user_id: String,
    pub email: String,
    pub roll_number: String,
    pub odd_numbers: Vec<String>,
    pub even_numbers: Vec<String>,
    pub alphabets: Vec<String>,
    pub special_characters: Vec<String>,
    pub sum: String,
    pub concat_string: String,
}

impl BfhlResponse {
    pub fn new(identity: &IdentityConfig, result: Classification) -> Self {
        Self {
            is_success: true,
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            roll_number: identity.roll_number.clone(),
            odd_numbers: result.odd_numbers,
            even_numbers: result.even_numbers,
            alphabets: result.alphabets,
            special_characters: result.special_characters,
            sum: result.sum.to_string(),
            concat_string: result.concat_string,
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /bfhl
pub(super) async fn bfhl(
    State(state): State<ApiState>,
    body: Result<Json<BfhlRequest>, JsonRejection>,
) -> Result<Json<BfhlResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        warn!(status = %e.status(), "bfhl request body rejected: {e}");
        ApiError::Internal(e.body_text())
    })?;

    let data = req
        .into_tokens()
        .inspect_err(|e| debug!("bfhl request without usable data: {e}"))?;

    let result = classifier::classify(&data).map_err(|e| {
        warn!(tokens = data.len(), "bfhl classification failed: {e}");
        ApiError::from(e)
    })?;

    debug!(
        tokens = data.len(),
        odd = result.odd_numbers.len(),
        even = result.even_numbers.len(),
        alphabets = result.alphabets.len(),
        special = result.special_characters.len(),
        "bfhl request classified"
    );

    Ok(Json(BfhlResponse::new(&state.identity, result)))
}

/// GET /
pub(super) async fn root() -> Json<Value> {
    Json(json!({ "message": "BFHL API is running", "endpoint": "/bfhl" }))
}

/// GET /health
pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
