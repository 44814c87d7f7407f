// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, guard::Route, prompt::RequestBuilder, screen::Submission};

use super::{render, Context};

/// Sign in. The password is asked for with Pinentry when it is available
/// and on the terminal otherwise.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// The username of the account, matched exactly.
    username: String,

    /// Read the password from the first line of standard input.
    #[arg(long)]
    password_stdin: bool,
}

#[async_trait]
impl super::Command for Login {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let password = ctx
            .password(
                self.password_stdin,
                RequestBuilder::new()
                    .for_account(&self.username)
                    .into_request(),
            )
            .await?;

        ctx.show(
            Route::Login,
            Some(Submission::Login {
                username: self.username,
                password,
            }),
        )
        .await
    }
}

/// Sign out and forget the persisted session.
#[derive(Debug, Parser)]
pub(crate) struct Logout;

#[async_trait]
impl super::Command for Logout {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let outcomes = ctx.app.sign_out(&ctx.token).await?;
        render(&outcomes)
    }
}
