// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, guard::Route, screen::Submission};

use super::Context;

/// Buy a package. Without a phone number, shows what the purchase would be.
#[derive(Debug, Parser)]
pub(crate) struct Purchase {
    /// The ID of the package, as listed on the dashboard.
    id: u64,

    /// The phone number to top up.
    #[arg(long)]
    phone: Option<String>,
}

#[async_trait]
impl super::Command for Purchase {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.show(
            Route::Purchase(self.id),
            self.phone.map(|phone| Submission::Purchase { phone }),
        )
        .await
    }
}
