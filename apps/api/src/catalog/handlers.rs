use axum::{extract::State, Json};

use crate::models::Character;
use crate::state::AppState;

/// GET /api/chars
///
/// Returns the full catalog as a JSON array of single-character strings, in catalog order.
pub async fn handle_list_chars(State(state): State<AppState>) -> Json<Vec<Character>> {
    Json(state.catalog.chars().to_vec())
}
