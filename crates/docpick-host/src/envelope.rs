// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One JSON object per line in each direction. Calls may carry an `id`,
// echoed on the reply, because `selectFile` replies can overtake each other.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use docpick_plugin::{MethodCall, MethodReply};

/// Error code for a line that is not a valid call.
pub const CODE_INVALID_CALL: &str = "INVALID_CALL";

#[derive(Debug, Deserialize)]
pub struct CallLine {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub call: MethodCall,
}

#[derive(Debug, Serialize)]
pub struct ReplyLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub reply: MethodReply,
}

/// Parse one input line; malformed lines become an error reply.
pub fn parse_line(line: &str) -> Result<CallLine, ReplyLine> {
    serde_json::from_str(line).map_err(|e| ReplyLine {
        id: None,
        reply: MethodReply::Error {
            code: CODE_INVALID_CALL.into(),
            message: format!("could not parse method call: {e}"),
            details: Value::Null,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_with_id() {
        let line = parse_line(r#"{"id": 3, "method": "selectFile"}"#).expect("parse");
        assert_eq!(line.id, Some(Value::from(3)));
        assert_eq!(line.call.method, "selectFile");
    }

    #[test]
    fn garbage_becomes_invalid_call() {
        let reply = parse_line("select please").expect_err("must fail");
        assert_eq!(reply.reply.error_code(), Some(CODE_INVALID_CALL));
    }

    #[test]
    fn reply_echoes_id() {
        let line = ReplyLine {
            id: Some(Value::from("a1")),
            reply: MethodReply::success("Android 14"),
        };
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(json["id"], "a1");
        assert_eq!(json["status"], "success");
        assert_eq!(json["result"], "Android 14");
    }

    #[test]
    fn reply_without_id_omits_it() {
        let line = ReplyLine {
            id: None,
            reply: MethodReply::NotImplemented,
        };
        let json = serde_json::to_string(&line).expect("serialize");
        assert_eq!(json, r#"{"status":"not_implemented"}"#);
    }
}
