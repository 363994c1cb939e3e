//! Response envelope decoding shared by every cidaas REST call.
//!
//! cidaas wraps payloads as `{ "success": bool, "status": u16, "data": T }` and reports failures
//! either through a non-2xx status or `success: false` with an `error` object.

// crates.io
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value as JsonValue;
// self
use crate::{_prelude::*, error::ApiError};

/// Maximum number of characters of a raw body kept in error messages.
pub const BODY_PREVIEW_LIMIT: usize = 256;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	#[serde(default = "default_success")]
	success: bool,
	#[serde(default)]
	status: Option<u16>,
	data: Option<T>,
	#[serde(default)]
	error: Option<JsonValue>,
}

/// Decodes the `data` payload of a response.
pub fn decode_response<T>(status: u16, body: &[u8]) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	decode_envelope::<T>(status, body)?.ok_or(ApiError::MissingData { status })
}

/// Checks that a response acknowledges the request, ignoring any payload.
pub fn decode_ack(status: u16, body: &[u8]) -> Result<(), ApiError> {
	if (200..300).contains(&status) && body.iter().all(u8::is_ascii_whitespace) {
		return Ok(());
	}

	decode_envelope::<IgnoredAny>(status, body).map(|_| ())
}

fn decode_envelope<T>(status: u16, body: &[u8]) -> Result<Option<T>, ApiError>
where
	T: DeserializeOwned,
{
	if !(200..300).contains(&status) {
		return Err(ApiError::Status { status, message: error_message(body) });
	}

	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let envelope: Envelope<T> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ApiError::ResponseParse { source, status })?;

	if !envelope.success {
		return Err(ApiError::Rejected {
			status: envelope.status.unwrap_or(status),
			message: envelope
				.error
				.as_ref()
				.and_then(describe_error)
				.unwrap_or_else(|| "request was not successful".into()),
		});
	}

	Ok(envelope.data)
}

fn default_success() -> bool {
	true
}

fn error_message(body: &[u8]) -> String {
	serde_json::from_slice::<JsonValue>(body)
		.ok()
		.and_then(|value| value.get("error").and_then(describe_error).or_else(|| describe_error(&value)))
		.unwrap_or_else(|| truncate_preview(String::from_utf8_lossy(body).trim()))
}

fn describe_error(value: &JsonValue) -> Option<String> {
	match value {
		JsonValue::String(message) if !message.is_empty() => Some(message.clone()),
		JsonValue::Object(fields) => ["error", "message", "error_description"]
			.iter()
			.find_map(|key| fields.get(*key).and_then(JsonValue::as_str))
			.filter(|message| !message.is_empty())
			.map(ToOwned::to_owned),
		_ => None,
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::client::PasswordPolicy;

	#[test]
	fn successful_envelope_yields_data() {
		let body = br#"{"success":true,"status":200,"data":{"_id":"p-1","policyName":"strict"}}"#;
		let policy: PasswordPolicy =
			decode_response(200, body).expect("Successful envelope should decode.");

		assert_eq!(policy.id, "p-1");
		assert_eq!(policy.policy_name, "strict");
	}

	#[test]
	fn rejected_envelope_surfaces_the_error_message() {
		let body = br#"{"success":false,"status":400,"error":{"error":"policy name taken"}}"#;
		let err = decode_response::<PasswordPolicy>(200, body)
			.expect_err("Unsuccessful envelope should be rejected.");

		assert!(matches!(
			err,
			ApiError::Rejected { status: 400, ref message } if message == "policy name taken"
		));
	}

	#[test]
	fn non_success_status_prefers_structured_errors() {
		let err = decode_response::<PasswordPolicy>(404, br#"{"error":"not found"}"#)
			.expect_err("404 should fail.");

		assert_eq!(err.status(), Some(404));
		assert_eq!(err.to_string(), "cidaas API returned HTTP 404: not found.");

		let body = "x".repeat(BODY_PREVIEW_LIMIT + 10);
		let err = decode_response::<PasswordPolicy>(502, body.as_bytes())
			.expect_err("502 should fail.");

		assert!(matches!(
			err,
			ApiError::Status { status: 502, ref message }
				if message.chars().count() == BODY_PREVIEW_LIMIT + 1
		));
	}

	#[test]
	fn malformed_payloads_report_the_json_path() {
		let body = br#"{"success":true,"data":{"minimumLength":"eight"}}"#;
		let err = decode_response::<PasswordPolicy>(200, body)
			.expect_err("Wrong field type should fail.");
		let ApiError::ResponseParse { source, status } = err else {
			panic!("Expected a parse error.");
		};

		assert_eq!(status, 200);
		assert_eq!(source.path().to_string(), "data.minimumLength");
	}

	#[test]
	fn missing_data_and_acknowledgements() {
		assert!(matches!(
			decode_response::<PasswordPolicy>(200, br#"{"success":true}"#),
			Err(ApiError::MissingData { status: 200 })
		));
		assert!(decode_ack(200, br#"{"success":true,"data":true}"#).is_ok());
		assert!(decode_ack(204, b"").is_ok());
		assert!(decode_ack(200, br#"{"success":false}"#).is_err());
	}
}
