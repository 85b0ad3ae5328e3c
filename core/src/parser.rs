//! Shared response interpretation.
//!
//! Every command checks the status code first and only then decodes the
//! body. A matching status with a body that does not decode is an error,
//! never a silent success.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RefineError, Result};
use crate::http::HttpResponse;

/// Fail with `UnexpectedStatus` unless `response` carries `expected`.
pub(crate) fn assure_status_code(response: &HttpResponse, expected: u16) -> Result<()> {
    tracing::debug!(status = response.status, "received response");
    if response.status == expected {
        return Ok(());
    }
    tracing::warn!(expected, actual = response.status, "unexpected status code");
    Err(RefineError::UnexpectedStatus {
        expected,
        actual: response.status,
    })
}

/// Check the status, then consume the body with `parse`.
pub(crate) fn interpret<T, F>(response: HttpResponse, expected: u16, parse: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<T>,
{
    assure_status_code(&response, expected)?;
    let HttpResponse { body, .. } = response;
    parse(&body).inspect_err(|err| tracing::warn!(error = %err, "response body rejected"))
}

pub(crate) fn parse_json(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn read<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Text of `field` in `node`. Scalars other than strings are rendered as
/// their JSON text; absent or null fields are an error.
pub(crate) fn find_existing_text(node: &Value, field: &'static str) -> Result<String> {
    match node.get(field) {
        None | Some(Value::Null) => Err(RefineError::MissingField(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn matching_status_passes() {
        assert!(assure_status_code(&response(200, ""), 200).is_ok());
    }

    #[test]
    fn mismatched_status_fails_before_parsing() {
        let mut parsed = false;
        let err = interpret(response(500, "{}"), 200, |_| {
            parsed = true;
            Ok(())
        })
        .unwrap_err();
        assert!(!parsed);
        assert!(matches!(
            err,
            RefineError::UnexpectedStatus {
                expected: 200,
                actual: 500
            }
        ));
    }

    #[test]
    fn undecodable_body_is_an_error() {
        let err = interpret(response(200, "not json"), 200, parse_json).unwrap_err();
        assert!(matches!(err, RefineError::Deserialization(_)));
    }

    #[test]
    fn find_existing_text_reads_strings_and_scalars() {
        let node = parse_json(r#"{"code":"ok","count":3,"gone":null}"#).unwrap();
        assert_eq!(find_existing_text(&node, "code").unwrap(), "ok");
        assert_eq!(find_existing_text(&node, "count").unwrap(), "3");
        assert!(matches!(
            find_existing_text(&node, "gone"),
            Err(RefineError::MissingField("gone"))
        ));
        assert!(matches!(
            find_existing_text(&node, "message"),
            Err(RefineError::MissingField("message"))
        ));
    }
}
