// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;

use crate::{auth::Credential, error::Result, prompt::RequestBuilder};

use super::Context;

/// Print the credential to store in the backend's record for an account.
/// The output is a JSON object to merge into the account.
#[derive(Debug, Parser)]
pub(crate) struct HashPassword {
    /// Read the password from the first line of standard input.
    #[arg(long)]
    password_stdin: bool,
}

#[derive(Serialize)]
struct Record {
    credential: Credential,
}

#[async_trait]
impl super::Command for HashPassword {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let password = ctx
            .password(
                self.password_stdin,
                RequestBuilder::new()
                    .with_description("Choose the password for the account.")
                    .into_request(),
            )
            .await?;

        println!(
            "{}",
            serde_json::to_string_pretty(&Record {
                credential: Credential::generate(&password),
            })?
        );
        Ok(())
    }
}
