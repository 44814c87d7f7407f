// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::model::Principal;

use super::{Reducer, Request};

/// Customer accounts, as listed for administrators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DirectoryState {
    pub(crate) customers: Vec<Principal>,
    pub(crate) fetch: Request,
}

impl DirectoryState {
    pub(crate) fn customer(&self, id: u64) -> Option<&Principal> {
        self.customers.iter().find(|customer| customer.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DirectoryAction {
    FetchStarted,
    FetchSucceeded(Vec<Principal>),
    FetchFailed(String),
}

impl Reducer for DirectoryState {
    type Action = DirectoryAction;

    fn reduce(self, action: DirectoryAction) -> Self {
        match action {
            DirectoryAction::FetchStarted => Self {
                fetch: self.fetch.start(),
                ..self
            },
            DirectoryAction::FetchSucceeded(customers) => Self {
                customers,
                fetch: self.fetch.succeed(),
            },
            DirectoryAction::FetchFailed(message) => Self {
                fetch: self.fetch.fail(message),
                ..self
            },
        }
    }
}
