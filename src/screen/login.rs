// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::{
    app::App,
    error::Result,
    guard::Route,
    metadata,
    model::Principal,
    store::{SessionAction, SessionState},
};

use super::{ignore, Notice, Outcome, Scope, Submission, View};

pub(crate) const INCORRECT: &str = "Incorrect username or password";
pub(crate) const FAILED: &str = "An error occurred while signing in";

#[derive(Debug)]
pub(crate) struct LoginView {
    principal: Option<Principal>,
    error: Option<String>,
}

impl LoginView {
    pub(crate) fn derive(session: &SessionState) -> Self {
        Self {
            principal: session.current().cloned(),
            error: session.error.clone(),
        }
    }
}

impl fmt::Display for LoginView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.principal {
            Some(principal) => writeln!(
                f,
                "Signed in as {} ({}, {}).",
                principal.display_name, principal.username, principal.role
            )?,
            None => {
                writeln!(f, "You are not signed in.")?;
                writeln!(
                    f,
                    "Sign in with: {} login <username>",
                    *metadata::CLIENT_TYPE_ID
                )?;
            }
        }

        if let Some(error) = &self.error {
            writeln!(f, "Last sign-in attempt failed: {error}")?;
        }
        Ok(())
    }
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(Route::Login);

    match submission {
        Some(Submission::Login { username, password }) => {
            app.session.dispatch(SessionAction::BeginLogin).await;

            let checked = scope
                .attempt(
                    "check the credentials",
                    app.authenticator.authenticate(&username, &password),
                )
                .await?;
            match checked {
                Some(Some(principal)) => {
                    let welcome = format!("Welcome, {}!", principal.display_name);
                    app.session
                        .dispatch(SessionAction::LoginSucceeded(principal))
                        .await;

                    outcome.notify(Notice::Success(welcome));
                    if !app.session.is_persistent() {
                        outcome.notify(Notice::Warning(
                            "This session will end when the program exits.".to_owned(),
                        ));
                    }
                    return Ok(outcome.redirect_to(Route::Dashboard));
                }
                Some(None) => {
                    app.session
                        .dispatch(SessionAction::LoginFailed(INCORRECT.to_owned()))
                        .await;
                    outcome.notify(Notice::Error(INCORRECT.to_owned()));
                }
                None => {
                    app.session
                        .dispatch(SessionAction::LoginFailed(FAILED.to_owned()))
                        .await;
                    outcome.notify(Notice::Error(FAILED.to_owned()));
                }
            }
        }
        Some(other) => ignore(Route::Login, &other),
        None => {}
    }

    Ok(outcome.with_view(View::Login(LoginView::derive(app.session.state()))))
}
