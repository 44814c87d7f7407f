// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! State containers. Every container is a plain value with a pure
//! transition function; [`Store`] owns one and applies dispatched actions to
//! it.

pub(crate) mod catalog;
pub(crate) mod directory;
pub(crate) mod session;
pub(crate) mod transactions;

use std::mem;

use serde::{Deserialize, Serialize};

pub(crate) use catalog::{CatalogAction, CatalogState};
pub(crate) use directory::{DirectoryAction, DirectoryState};
pub(crate) use session::{SessionAction, SessionState};
pub(crate) use transactions::{TransactionAction, TransactionState};

pub(crate) trait Reducer: Default {
    type Action;

    /// Produces the state that follows `self` once `action` is applied.
    #[must_use]
    fn reduce(self, action: Self::Action) -> Self;
}

#[derive(Debug, Default)]
pub(crate) struct Store<R> {
    state: R,
}

impl<R: Reducer> Store<R> {
    pub(crate) fn new(state: R) -> Self {
        Self { state }
    }

    pub(crate) fn dispatch(&mut self, action: R::Action) {
        let state = mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub(crate) fn state(&self) -> &R {
        &self.state
    }
}

/// The progress of one kind of request against the backend.
///
/// `loading` is only set between a start and its matching finish, and
/// `error` only holds the message of the most recent failure until the next
/// start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Request {
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
}

impl Request {
    #[must_use]
    pub(crate) fn start(self) -> Self {
        Self {
            loading: true,
            error: None,
        }
    }

    #[must_use]
    pub(crate) fn succeed(self) -> Self {
        Self {
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub(crate) fn fail(self, message: String) -> Self {
        Self {
            loading: false,
            error: Some(message),
        }
    }
}
