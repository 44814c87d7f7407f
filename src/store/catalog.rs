// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::model::Package;

use super::{Reducer, Request};

/// The package list, plus the one package a form or purchase screen is
/// working on. The two are fetched independently so loading a single package
/// never disturbs the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CatalogState {
    pub(crate) packages: Vec<Package>,
    pub(crate) list: Request,
    pub(crate) selected: Option<Package>,
    pub(crate) single: Request,
    pub(crate) delete: Request,
}

impl CatalogState {
    pub(crate) fn is_loading(&self) -> bool {
        self.list.loading || self.single.loading || self.delete.loading
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CatalogAction {
    FetchListStarted,
    FetchListSucceeded(Vec<Package>),
    FetchListFailed(String),
    FetchOneStarted,
    FetchOneSucceeded(Package),
    FetchOneFailed(String),
    ClearSelected,
    DeleteStarted,
    DeleteSucceeded(u64),
    DeleteFailed(String),
}

impl Reducer for CatalogState {
    type Action = CatalogAction;

    fn reduce(self, action: CatalogAction) -> Self {
        match action {
            CatalogAction::FetchListStarted => Self {
                list: self.list.start(),
                ..self
            },
            CatalogAction::FetchListSucceeded(packages) => Self {
                packages,
                list: self.list.succeed(),
                ..self
            },
            CatalogAction::FetchListFailed(message) => Self {
                list: self.list.fail(message),
                ..self
            },
            CatalogAction::FetchOneStarted => Self {
                single: self.single.start(),
                ..self
            },
            CatalogAction::FetchOneSucceeded(package) => Self {
                selected: Some(package),
                single: self.single.succeed(),
                ..self
            },
            CatalogAction::FetchOneFailed(message) => Self {
                single: self.single.fail(message),
                ..self
            },
            CatalogAction::ClearSelected => Self {
                selected: None,
                single: Request::default(),
                ..self
            },
            CatalogAction::DeleteStarted => Self {
                delete: self.delete.start(),
                ..self
            },
            CatalogAction::DeleteSucceeded(id) => Self {
                packages: self
                    .packages
                    .into_iter()
                    .filter(|package| package.id != id)
                    .collect(),
                delete: self.delete.succeed(),
                ..self
            },
            CatalogAction::DeleteFailed(message) => Self {
                delete: self.delete.fail(message),
                ..self
            },
        }
    }
}
