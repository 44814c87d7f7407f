// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The six screens. Mounting a screen fetches what it shows, applies the
//! submission the user made on it (if any) and derives the view from store
//! state.

pub(crate) mod customers;
pub(crate) mod dashboard;
pub(crate) mod login;
pub(crate) mod package_form;
pub(crate) mod purchase;
pub(crate) mod transactions;

use std::{fmt, future::Future};

use log::{debug, warn};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    guard::Route,
    store::{Reducer, Store},
};

pub(crate) use package_form::PackageInput;

/// What the user submitted on a screen.
#[derive(Debug)]
pub(crate) enum Submission {
    Login {
        username: String,
        password: SecretString,
    },
    DeletePackage {
        id: u64,
        confirmed: bool,
    },
    Purchase {
        phone: String,
    },
    SavePackage(PackageInput),
    ViewPurchases {
        user_id: u64,
    },
}

/// A message shown to the user once, outside the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub(crate) const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug)]
pub(crate) enum View {
    Login(login::LoginView),
    Dashboard(dashboard::DashboardView),
    Purchase(purchase::PurchaseView),
    Transactions(transactions::HistoryView),
    PackageForm(package_form::PackageFormView),
    Customers(customers::CustomersView),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login(view) => view.fmt(f),
            Self::Dashboard(view) => view.fmt(f),
            Self::Purchase(view) => view.fmt(f),
            Self::Transactions(view) => view.fmt(f),
            Self::PackageForm(view) => view.fmt(f),
            Self::Customers(view) => view.fmt(f),
        }
    }
}

/// The result of mounting a screen.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) route: Route,
    pub(crate) notices: Vec<Notice>,
    pub(crate) view: Option<View>,
    pub(crate) redirect: Option<Route>,
}

impl Outcome {
    pub(crate) fn new(route: Route) -> Self {
        Self {
            route,
            notices: vec![],
            view: None,
            redirect: None,
        }
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    #[must_use]
    pub(crate) fn with_view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    #[must_use]
    pub(crate) fn redirect_to(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }
}

/// The lifetime of one mounted screen. Once cancelled, requests still in
/// flight are abandoned and their results are never dispatched.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scope {
    token: CancellationToken,
}

impl Scope {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub(crate) fn unmount(&self) {
        self.token.cancel();
    }

    pub(crate) fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Waits for `fut` unless the screen is unmounted first.
    pub(crate) async fn run<T, F: Future<Output = Result<T>>>(&self, fut: F) -> Result<T> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        }
    }

    /// Like [`Scope::run`], except that failures other than cancellation
    /// are logged and come back as `None` for the screen to report.
    pub(crate) async fn attempt<T, F: Future<Output = Result<T>>>(
        &self,
        what: &str,
        fut: F,
    ) -> Result<Option<T>> {
        match self.run(fut).await {
            Ok(value) => Ok(Some(value)),
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(e) => {
                warn!("We could not {}: {}", what, e);
                Ok(None)
            }
        }
    }

    /// Dispatches `action` to `store` while the screen is still mounted.
    pub(crate) fn dispatch<R: Reducer>(&self, store: &mut Store<R>, action: R::Action) {
        if self.is_mounted() {
            store.dispatch(action);
        } else {
            debug!("Dropping a result that arrived after the screen went away");
        }
    }
}

/// Logs a submission that the mounted screen has no use for.
pub(crate) fn ignore(route: Route, submission: &Submission) {
    let kind = match submission {
        Submission::Login { .. } => "sign-in",
        Submission::DeletePackage { .. } => "package deletion",
        Submission::Purchase { .. } => "purchase",
        Submission::SavePackage(_) => "package form",
        Submission::ViewPurchases { .. } => "purchase history",
    };
    warn!("{} does not accept a {} submission; ignoring it", route, kind);
}
