// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP transport error: {0}")]
    Http(reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("backend error: {0}")]
    Backend(#[from] Backend),
    #[error("session storage error: {0}")]
    Session(#[from] Session),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("invalid input: {0}")]
    Validation(#[from] Validation),
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout(value)
        } else {
            Self::Http(value)
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Backend {
    #[error("{collection} record {id} does not exist")]
    NotFound { collection: &'static str, id: u64 },
    #[error("server answered {method} {path} with status {status}")]
    Status {
        method: reqwest::Method,
        path: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Error, Debug)]
pub(crate) enum Session {
    #[error("persisted session uses schema version {0}, but only version {1} is understood")]
    UnsupportedVersion(u32, u32),
    #[error("persisted session is authenticated without a principal, or the reverse")]
    Inconsistent,
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Validation {
    #[error("the {0} field is required")]
    Blank(&'static str),
    #[error(r#"price "{}" does not contain a whole number"#, .0.escape_default())]
    Price(String),
}
