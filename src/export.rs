//! Attempt log export
//!
//! At game over the attempt log is turned into CSV and uploaded as a
//! multipart form to the analytics endpoint. Upload is fire-and-forget;
//! failures are reported, never fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{AttemptRecord, GameState};

/// CSV column names, in row order
pub const CSV_HEADER: [&str; 9] = [
    "name",
    "age",
    "phase",
    "question",
    "operator",
    "expected",
    "submitted",
    "result",
    "response_time",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("no answers to export")]
    EmptyLog,
    #[error("upload request failed: {0}")]
    Request(String),
    #[error("upload rejected with HTTP {0}")]
    Status(u16),
    #[error("upload rejected: {0}")]
    Rejected(String),
}

/// Server reply to an upload. Every field is optional; only the HTTP status
/// decides success, except for an explicit `error` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReply {
    pub filename: Option<String>,
    pub rows: Option<usize>,
    pub error: Option<String>,
}

/// Parse an upload reply body, tolerating anything that isn't JSON
pub fn parse_reply(body: &str) -> UploadReply {
    serde_json::from_str(body).unwrap_or_else(|e| {
        log::warn!("Upload reply is not the expected JSON: {}", e);
        UploadReply::default()
    })
}

/// Quote a field when it holds a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn record_fields(record: &AttemptRecord) -> [String; 9] {
    [
        record.name.clone(),
        record.age.to_string(),
        record.phase.to_string(),
        record.question.clone(),
        record
            .operator
            .map(|op| op.as_str().to_string())
            .unwrap_or_default(),
        record.expected.map(|e| e.to_string()).unwrap_or_default(),
        record.submitted.to_string(),
        record.outcome.as_str().to_string(),
        format!("{:.2}", record.response_time_secs),
    ]
}

/// Serialize records as CSV: header row, then one row per record
pub fn to_csv(records: &[AttemptRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for record in records {
        let row: Vec<String> = record_fields(record)
            .iter()
            .map(|f| escape_field(f))
            .collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Upload file name for a player
pub fn file_name(player: &str) -> String {
    let safe: String = player
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}_match.csv", safe)
}

/// File name and CSV body for a finished session
pub fn prepare(state: &GameState) -> Result<(String, String), ExportError> {
    if state.attempts.is_empty() {
        return Err(ExportError::EmptyLog);
    }
    Ok((file_name(&state.profile.name), to_csv(&state.attempts)))
}

/// Upload a CSV file as multipart field `file` (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn upload_csv(
    endpoint: &str,
    file_name: &str,
    csv: &str,
) -> Result<UploadReply, ExportError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    fn js_err(e: JsValue) -> ExportError {
        ExportError::Request(format!("{:?}", e))
    }

    let window = web_sys::window().ok_or_else(|| ExportError::Request("no window".into()))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(csv));
    let bag = web_sys::BlobPropertyBag::new();
    bag.set_type("text/csv;charset=utf-8;");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &bag).map_err(js_err)?;

    let form = web_sys::FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename("file", &blob, file_name)
        .map_err(js_err)?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from(form));
    let request = web_sys::Request::new_with_str_and_init(endpoint, &init).map_err(js_err)?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(ExportError::Status(response.status()));
    }

    let body = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    let reply = parse_reply(&body.as_string().unwrap_or_default());
    if let Some(error) = reply.error.clone() {
        return Err(ExportError::Rejected(error));
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Arena, AttemptOutcome, Operator, PlayerProfile};

    fn record(question: &str, submitted: f64, outcome: AttemptOutcome) -> AttemptRecord {
        AttemptRecord {
            name: "Ana".into(),
            age: 9,
            phase: 1,
            question: question.into(),
            operator: Some(Operator::Addition),
            expected: Some(5),
            submitted,
            outcome,
            response_time_secs: 1.5,
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&[
            record("2 + 3", 5.0, AttemptOutcome::Correct),
            record("2 + 3", 7.0, AttemptOutcome::Wrong),
        ]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "name,age,phase,question,operator,expected,submitted,result,response_time"
        );
        assert_eq!(lines[1], "Ana,9,1,2 + 3,addition,5,5,correct,1.50");
        assert_eq!(lines[2], "Ana,9,1,2 + 3,addition,5,7,wrong,1.50");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_escapes_delimiters() {
        let mut r = record("2 + 3", 5.0, AttemptOutcome::Correct);
        r.name = "Silva, \"Ana\"".into();
        let csv = to_csv(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Silva, \"\"Ana\"\"\",9,"));
    }

    #[test]
    fn test_miss_without_zombies_leaves_blanks() {
        let mut r = record("", 4.0, AttemptOutcome::Wrong);
        r.operator = None;
        r.expected = None;
        let csv = to_csv(&[r]);
        assert_eq!(csv.lines().nth(1), Some("Ana,9,1,,,,4,wrong,1.50"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Ana"), "Ana_match.csv");
        assert_eq!(file_name("a/b"), "a_b_match.csv");
    }

    #[test]
    fn test_prepare_requires_attempts() {
        let mut state = GameState::new(Arena::default(), 1);
        state.start(PlayerProfile::new("Ana", 9).unwrap(), 0.0);
        assert_eq!(prepare(&state), Err(ExportError::EmptyLog));

        state
            .attempts
            .push(record("2 + 3", 5.0, AttemptOutcome::Correct));
        let (name, csv) = prepare(&state).unwrap();
        assert_eq!(name, "Ana_match.csv");
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_parse_reply() {
        let reply = parse_reply(r#"{"filename": "Ana_match.csv", "rows": 3, "data": []}"#);
        assert_eq!(reply.filename.as_deref(), Some("Ana_match.csv"));
        assert_eq!(reply.rows, Some(3));
        assert!(reply.error.is_none());

        assert_eq!(parse_reply("<html>"), UploadReply::default());
    }
}
