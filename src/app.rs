// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    auth::Authenticator,
    client::Client,
    error::Result,
    guard::{self, Access, Decision, Route},
    model::Principal,
    prompt::Confirm,
    screen::{
        customers, dashboard, login,
        package_form::{self, FormMode},
        purchase, transactions, Notice, Outcome, Scope, Submission,
    },
    session::SessionStore,
    store::{CatalogState, DirectoryState, SessionAction, Store, TransactionState},
};

/// Redirects followed for one navigation before giving up.
const MAX_HOPS: usize = 8;

/// Everything a screen works with: the backend, the stores and the ways of
/// asking the user things.
pub(crate) struct App {
    pub(crate) client: Arc<dyn Client>,
    pub(crate) authenticator: Box<dyn Authenticator>,
    pub(crate) confirm: Box<dyn Confirm>,
    pub(crate) session: SessionStore,
    pub(crate) catalog: Store<CatalogState>,
    pub(crate) transactions: Store<TransactionState>,
    pub(crate) directory: Store<DirectoryState>,
}

impl App {
    pub(crate) fn new(
        client: Arc<dyn Client>,
        authenticator: Box<dyn Authenticator>,
        session: SessionStore,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Self {
            client,
            authenticator,
            confirm,
            session,
            catalog: Store::default(),
            transactions: Store::default(),
            directory: Store::default(),
        }
    }

    /// The principal the session is signed in as.
    pub(crate) fn viewer(&self) -> Option<&Principal> {
        self.session.state().current()
    }

    /// Navigates to `route`, applying `submission` there, and follows any
    /// redirect the guard or the screen asks for. Every screen shown gets a
    /// child of `token` as its scope and is unmounted before the next one
    /// mounts.
    pub(crate) async fn visit(
        &mut self,
        route: Route,
        submission: Option<Submission>,
        token: &CancellationToken,
    ) -> Result<Vec<Outcome>> {
        let mut outcomes = vec![];
        let mut next = Some((route, submission));

        while let Some((route, submission)) = next.take() {
            if outcomes.len() >= MAX_HOPS {
                warn!("Stopped following redirects at {}", route);
                break;
            }

            match guard::check(route, self.session.state()) {
                Decision::Redirect(target) => {
                    if submission.is_some() {
                        warn!("Discarding what was submitted to {}", route);
                    }
                    outcomes.push(denied(route, target));
                    next = Some((target, None));
                }
                Decision::Allow => {
                    debug!("Mounting {}", route);
                    let scope = Scope::new(token.child_token());
                    let outcome = self.mount(route, submission, &scope).await;
                    scope.unmount();
                    let outcome = outcome?;

                    next = outcome.redirect.map(|target| (target, None));
                    outcomes.push(outcome);
                }
            }
        }

        Ok(outcomes)
    }

    async fn mount(
        &mut self,
        route: Route,
        submission: Option<Submission>,
        scope: &Scope,
    ) -> Result<Outcome> {
        match route {
            Route::Login => login::mount(self, scope, submission).await,
            Route::Dashboard => dashboard::mount(self, scope, submission).await,
            Route::Purchase(id) => purchase::mount(self, scope, id, submission).await,
            Route::Transactions => transactions::mount(self, scope, submission).await,
            Route::NewPackage => {
                package_form::mount(self, scope, FormMode::New, submission).await
            }
            Route::EditPackage(id) => {
                package_form::mount(self, scope, FormMode::Edit(id), submission).await
            }
            Route::Customers => customers::mount(self, scope, submission).await,
        }
    }

    /// Ends the session and shows the sign-in screen.
    pub(crate) async fn sign_out(&mut self, token: &CancellationToken) -> Result<Vec<Outcome>> {
        let name = self.viewer().map(|principal| principal.display_name.clone());
        self.session.dispatch(SessionAction::Logout).await;

        let mut outcomes = self.visit(Route::Login, None, token).await?;
        if let Some(outcome) = outcomes.first_mut() {
            outcome.notices.insert(
                0,
                Notice::Success(match name {
                    Some(name) => format!("Goodbye, {name}. You have signed out."),
                    None => "You were not signed in.".to_owned(),
                }),
            );
        }
        Ok(outcomes)
    }
}

fn denied(route: Route, target: Route) -> Outcome {
    let message = match route.access() {
        Access::Administrator if target == Route::Dashboard => {
            format!("Only administrators can open {route}")
        }
        Access::Public | Access::Authenticated | Access::Administrator => {
            format!("Sign in to open {route}")
        }
    };

    let mut outcome = Outcome::new(route);
    outcome.notify(Notice::Warning(message));
    outcome.redirect_to(target)
}
