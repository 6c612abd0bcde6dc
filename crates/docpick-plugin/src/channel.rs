// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method-channel envelope: what the host sends in, what goes back out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use docpick_core::error::PickerError;

/// A named request from the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }
}

/// Methods the plugin understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    GetPlatformVersion,
    SelectFile,
    Unknown(&'a str),
}

impl<'a> Method<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name {
            "getPlatformVersion" => Method::GetPlatformVersion,
            "selectFile" => Method::SelectFile,
            other => Method::Unknown(other),
        }
    }
}

/// The single reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodReply {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default)]
        details: Value,
    },
    NotImplemented,
}

impl MethodReply {
    pub fn success(result: impl Into<Value>) -> Self {
        MethodReply::Success {
            result: result.into(),
        }
    }

    /// Flat code plus static message; the error detail stays in the logs.
    pub fn from_error(err: &PickerError) -> Self {
        MethodReply::Error {
            code: err.code().to_string(),
            message: err.message().to_string(),
            details: Value::Null,
        }
    }

    /// Error code carried by this reply, if it is an error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodReply::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}
