// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::{error, warn};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use crate::{
    app::App,
    error::{self, Result},
    guard::Route,
    prompt::{self, Prompt as _},
    screen::{Notice, Outcome, Submission},
};

pub(crate) mod customers;
pub(crate) mod hash_password;
pub(crate) mod navigate;
pub(crate) mod package;
pub(crate) mod purchase;
pub(crate) mod session;

/// What a command runs against.
pub(crate) struct Context {
    pub(crate) app: App,
    pub(crate) prompt: Box<dyn prompt::Prompt>,
    pub(crate) token: CancellationToken,
}

impl Context {
    /// Navigates to `route` and prints every screen shown on the way.
    pub(crate) async fn show(&mut self, route: Route, submission: Option<Submission>) -> Result<()> {
        let outcomes = self.app.visit(route, submission, &self.token).await?;
        render(&outcomes)
    }

    /// Asks for a password, on standard input when `stdin` is set and
    /// through the configured prompts otherwise.
    pub(crate) async fn password(&self, stdin: bool, req: prompt::Request) -> Result<SecretString> {
        let password = if stdin {
            prompt::StdinPrompt.prompt(req).await?
        } else {
            self.prompt.prompt(req).await?
        };
        password.ok_or_else(|| error::Password::NoPrompt.into())
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: &mut Context) -> Result<()>;
}

/// Prints the screens in the order they were shown. Fails when any of them
/// raised an error notice.
pub(crate) fn render(outcomes: &[Outcome]) -> Result<()> {
    for outcome in outcomes {
        for notice in &outcome.notices {
            match notice {
                Notice::Success(message) => println!("{message}"),
                Notice::Warning(message) => warn!("{}", message),
                Notice::Error(message) => error!("{}", message),
            }
        }

        if let Some(view) = &outcome.view {
            println!("{view}");
        }
    }

    let failed = outcomes
        .iter()
        .flat_map(|outcome| &outcome.notices)
        .any(Notice::is_error);
    if failed {
        Err(error::Error::Command)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notices_fail_the_command() {
        let mut failing = Outcome::new(Route::Dashboard);
        failing.notify(Notice::Warning("heads up".to_owned()));
        failing.notify(Notice::Error("broken".to_owned()));

        assert!(matches!(
            render(&[Outcome::new(Route::Login), failing]),
            Err(error::Error::Command)
        ));
    }

    #[test]
    fn warnings_alone_succeed() -> Result<()> {
        let mut outcome = Outcome::new(Route::Dashboard);
        outcome.notify(Notice::Warning("heads up".to_owned()));
        outcome.notify(Notice::Success("done".to_owned()));

        render(&[outcome])
    }
}
