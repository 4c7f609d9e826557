use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::SqlAdminError;

/// Status class of an admin response, in HTTP terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    Internal,
}

impl Status {
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::Internal => 500,
        }
    }

    #[must_use]
    pub fn for_error(err: &SqlAdminError) -> Self {
        match err {
            e if e.is_validation() => Status::BadRequest,
            SqlAdminError::NotFound(_) => Status::NotFound,
            _ => Status::Internal,
        }
    }
}

/// The uniform `{ok, data|message}` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Echo of the failing statement, raw SQL failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

impl Envelope {
    #[must_use]
    pub fn data(data: JsonValue) -> Self {
        Self {
            ok: true,
            data: Some(data),
            message: None,
            sql: None,
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            data: None,
            message: Some(message.into()),
            sql: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn failure(err: &SqlAdminError) -> Self {
        Self {
            ok: false,
            data: None,
            message: Some(err.to_string()),
            sql: None,
        }
    }
}

/// An envelope plus the status class it should be sent with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminResponse {
    pub status: Status,
    pub envelope: Envelope,
}

impl AdminResponse {
    #[must_use]
    pub fn ok(envelope: Envelope) -> Self {
        Self {
            status: Status::Ok,
            envelope,
        }
    }

    #[must_use]
    pub fn error(err: &SqlAdminError) -> Self {
        Self {
            status: Status::for_error(err),
            envelope: Envelope::failure(err),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.envelope.ok
    }

    /// The envelope as JSON text.
    ///
    /// # Errors
    /// Returns the serializer error; cannot happen for envelopes built by this crate.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_for_error_classes() {
        let cases = [
            (SqlAdminError::InvalidIdentifier("1t".into()), 400),
            (SqlAdminError::MissingField("where".into()), 400),
            (SqlAdminError::NotFound("t".into()), 404),
            (SqlAdminError::ExecutionError("boom".into()), 500),
            (
                SqlAdminError::SqliteError(rusqlite::Error::QueryReturnedNoRows),
                500,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(Status::for_error(&err).code(), code, "{err}");
        }
    }

    #[test]
    fn envelope_omits_absent_fields() {
        let ok = serde_json::to_value(Envelope::data(json!([1]))).unwrap();
        assert_eq!(ok, json!({"ok": true, "data": [1]}));

        let failed =
            serde_json::to_value(Envelope::failure(&SqlAdminError::NotFound("t".into()))).unwrap();
        assert_eq!(failed, json!({"ok": false, "message": "Table not found: t"}));
    }
}
