//! Control replies for the HTTP surface.
//!
//! Replies are bare JSON objects: `{"ok":true}` on success or
//! `{"error":"..."}` when the request was refused.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlReply {
    Ok { ok: bool },
    Error { error: String },
}

impl ControlReply {
    pub fn ok() -> Self {
        ControlReply::Ok { ok: true }
    }

    pub fn error(message: impl Display) -> Self {
        ControlReply::Error {
            error: message.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ControlReply::Ok { ok: true })
    }
}

impl<T> From<Result<T>> for ControlReply {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => ControlReply::ok(),
            Err(e) => ControlReply::error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CycleError;

    #[test]
    fn test_reply_wire_format() {
        assert_eq!(serde_json::to_string(&ControlReply::ok()).unwrap(), r#"{"ok":true}"#);
        assert_eq!(
            serde_json::to_string(&ControlReply::error(CycleError::AlreadyRunning)).unwrap(),
            r#"{"error":"Already running"}"#
        );
    }

    #[test]
    fn test_reply_parses_either_shape() {
        let reply: ControlReply = serde_json::from_str(r#"{"error":"Not running"}"#).unwrap();
        assert_eq!(reply, ControlReply::error("Not running"));
        assert!(!reply.is_ok());

        let reply: ControlReply = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(reply.is_ok());
    }

    #[test]
    fn test_from_result() {
        let reply: ControlReply = Err::<(), _>(CycleError::NotRunning).into();
        assert_eq!(reply, ControlReply::error("Not running"));
        let reply: ControlReply = Ok::<_, CycleError>(()).into();
        assert!(reply.is_ok());
    }
}
