// handlers/datasource/create.rs - POST /api/datasource/create handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::database::models::NewDataSource;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/**
 * POST /api/datasource/create - Register a new data source
 *
 * Expected Input (every field optional, missing ones stored as ""):
 * ```json
 * {
 *   "name": "string",
 *   "sourceType": "string",
 *   "uri": "string"
 * }
 * ```
 *
 * @returns `{"success": true, "data": <id>}` or a 500 envelope carrying the
 * storage error text
 */
pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<i64> {
    let strict = state.config.api.strict_decoding;
    let record = match body {
        Ok(body) => decode_body(&body, strict)?,
        Err(rejection) => unreadable_body(&rejection.body_text(), strict)?,
    };

    let id = state.store.insert(record).await?;

    info!(id, "Created data source");
    Ok(ApiResponse::success(id))
}

/// Turn the raw request body into insert input.
///
/// Permissive mode never fails: anything unusable becomes "". Strict mode
/// rejects a non-empty body that does not decode cleanly.
fn decode_body(body: &[u8], strict: bool) -> Result<NewDataSource, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewDataSource::default());
    }

    match serde_json::from_slice::<NewDataSource>(body) {
        Ok(record) => Ok(record),
        Err(e) if strict => Err(ApiError::fail(format!("invalid request body: {}", e))),
        Err(e) => {
            warn!("Ignoring undecodable data source body: {}", e);
            Ok(salvage(body))
        }
    }
}

/// A body that could not be buffered (e.g. over the size limit) is treated
/// like any other undecodable body
fn unreadable_body(reason: &str, strict: bool) -> Result<NewDataSource, ApiError> {
    if strict {
        return Err(ApiError::fail(format!("invalid request body: {}", reason)));
    }
    warn!("Ignoring unreadable data source body: {}", reason);
    Ok(NewDataSource::default())
}

/// Keep whichever fields are strings; everything else defaults
fn salvage(body: &[u8]) -> NewDataSource {
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        _ => return NewDataSource::default(),
    };

    NewDataSource {
        name: string_field(&fields, "name"),
        source_type: string_field(&fields, "sourceType"),
        uri: string_field(&fields, "uri"),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_body() {
        let record = decode_body(
            br#"{"name":"Sales DB","sourceType":"postgres","uri":"postgres://host/db"}"#,
            false,
        )
        .unwrap();
        assert_eq!(record, NewDataSource::new("Sales DB", "postgres", "postgres://host/db"));
    }

    #[test]
    fn blank_body_is_all_empty_in_both_modes() {
        assert_eq!(decode_body(b"", false).unwrap(), NewDataSource::default());
        assert_eq!(decode_body(b"  \n", true).unwrap(), NewDataSource::default());
    }

    #[test]
    fn permissive_keeps_string_fields_next_to_bad_ones() {
        let record = decode_body(br#"{"name":5,"sourceType":null,"uri":"file:///x.csv"}"#, false).unwrap();
        assert_eq!(record, NewDataSource::new("", "", "file:///x.csv"));
    }

    #[test]
    fn permissive_defaults_non_objects() {
        assert_eq!(decode_body(b"[1,2,3]", false).unwrap(), NewDataSource::default());
        assert_eq!(decode_body(b"name=x&uri=y", false).unwrap(), NewDataSource::default());
        assert_eq!(decode_body(b"null", false).unwrap(), NewDataSource::default());
    }

    #[test]
    fn strict_rejects_malformed_body() {
        let err = decode_body(br#"{"name":5}"#, true).unwrap_err();
        assert!(matches!(err, ApiError::Fail(_)));
        assert!(err.message().starts_with("invalid request body: "));
    }

    #[test]
    fn unreadable_body_defaults_or_fails() {
        assert_eq!(unreadable_body("length limit exceeded", false).unwrap(), NewDataSource::default());

        let err = unreadable_body("length limit exceeded", true).unwrap_err();
        assert_eq!(err, ApiError::fail("invalid request body: length limit exceeded"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record = decode_body(br#"{"name":"a","id":99,"credentials":{"user":"x"}}"#, true).unwrap();
        assert_eq!(record, NewDataSource::new("a", "", ""));
    }
}
