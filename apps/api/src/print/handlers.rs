//! Axum handler for the print endpoint.

use axum::{extract::rejection::JsonRejection, response::Html, Json};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{Character, GridSizeTier, PrintLayoutConfig, SelectedEntry};
use crate::print::render_sheet;
use crate::selection::{SelectionState, MAX_LINES};

const MISSING_CHARS_MESSAGE: &str = "缺少需要打印的汉字";

/// Body of `POST /print`. Parsed leniently: malformed entries are skipped
/// rather than failing the whole request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPayload {
    #[serde(default)]
    pub selected_chars: Option<Value>,
    #[serde(default)]
    pub grid_size: Option<String>,
    #[serde(default)]
    pub use_animals: Option<Value>,
}

impl PrintPayload {
    /// Missing means on; otherwise JSON truthiness (`null`, `false`, `0`, `""`,
    /// `[]` and `{}` are off).
    fn decorative_header(&self) -> bool {
        match &self.use_animals {
            None => true,
            Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

/// POST /print
///
/// Renders the practice sheet for the submitted selection as an HTML document.
/// Every rejection, including an unparseable body, is a 400 in the error
/// envelope and is logged at warn level.
pub async fn handle_print(
    payload: Result<Json<PrintPayload>, JsonRejection>,
) -> Result<Html<String>, AppError> {
    let rendered = match payload {
        Ok(Json(payload)) => render_payload(&payload),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    };

    rendered
        .map(Html)
        .inspect_err(|e| warn!("Rejected print request: {e}"))
}

fn render_payload(payload: &PrintPayload) -> Result<String, AppError> {
    let items = match &payload.selected_chars {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(AppError::Validation(MISSING_CHARS_MESSAGE.to_string())),
    };

    let entries = normalize_entries(items);
    if entries.is_empty() {
        return Err(AppError::Validation(MISSING_CHARS_MESSAGE.to_string()));
    }

    let selection = SelectionState::replay(&entries)?;

    let grid_size = match payload.grid_size.as_deref() {
        Some(s) => s.parse::<GridSizeTier>()?,
        None => GridSizeTier::default(),
    };
    let layout = PrintLayoutConfig {
        grid_size,
        decorative_header: payload.decorative_header(),
    };

    let html = render_sheet(&selection, &layout, Local::now().date_naive())?;

    info!(
        "Rendered practice sheet: {} characters, grid {}",
        selection.len(),
        grid_size
    );
    Ok(html)
}

/// Keeps entries whose `char` is a single character. A missing or non-integer
/// `lines` becomes 1; out-of-range counts are clamped to `1..=MAX_LINES`.
fn normalize_entries(items: &[Value]) -> Vec<SelectedEntry> {
    items
        .iter()
        .filter_map(|item| {
            let raw = item.get("char").and_then(Value::as_str);
            let Some(character) = raw.and_then(|s| s.parse::<Character>().ok()) else {
                warn!("Skipping malformed print entry: {item}");
                return None;
            };
            let lines = item
                .get("lines")
                .and_then(Value::as_i64)
                .unwrap_or(1)
                .clamp(1, i64::from(MAX_LINES)) as u32;
            Some(SelectedEntry { character, lines })
        })
        .collect()
}
