// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, guard::Route};

use super::Context;

/// Show the package catalog.
#[derive(Debug, Parser)]
pub(crate) struct Dashboard;

#[async_trait]
impl super::Command for Dashboard {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.show(Route::Dashboard, None).await
    }
}

/// Show your purchase history.
#[derive(Debug, Parser)]
pub(crate) struct Transactions;

#[async_trait]
impl super::Command for Transactions {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.show(Route::Transactions, None).await
    }
}

/// Open a screen by its path, such as /purchase/3. Unknown paths show the
/// catalog.
#[derive(Debug, Parser)]
pub(crate) struct Go {
    path: String,
}

#[async_trait]
impl super::Command for Go {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.show(Route::from_path(&self.path), None).await
    }
}
