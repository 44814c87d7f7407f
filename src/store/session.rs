// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::model::Principal;

use super::Reducer;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SessionState {
    pub(crate) authenticated: bool,
    pub(crate) principal: Option<Principal>,
    pub(crate) pending: bool,
    pub(crate) error: Option<String>,
}

impl SessionState {
    /// The signed-in principal, if the session is authenticated.
    pub(crate) fn current(&self) -> Option<&Principal> {
        self.principal.as_ref().filter(|_| self.authenticated)
    }

    /// A session is consistent when it is authenticated exactly when it has
    /// a principal.
    pub(crate) fn is_consistent(&self) -> bool {
        self.authenticated == self.principal.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionAction {
    BeginLogin,
    LoginSucceeded(Principal),
    LoginFailed(String),
    Logout,
}

impl Reducer for SessionState {
    type Action = SessionAction;

    fn reduce(self, action: SessionAction) -> Self {
        match action {
            SessionAction::BeginLogin => Self {
                pending: true,
                error: None,
                ..self
            },
            SessionAction::LoginSucceeded(principal) => Self {
                authenticated: true,
                principal: Some(principal),
                pending: false,
                error: None,
            },
            SessionAction::LoginFailed(message) => Self {
                pending: false,
                error: Some(message),
                ..self
            },
            SessionAction::Logout => Self {
                authenticated: false,
                principal: None,
                pending: self.pending,
                error: None,
            },
        }
    }
}
