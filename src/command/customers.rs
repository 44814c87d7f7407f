// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, guard::Route, screen::Submission};

use super::Context;

/// List customer accounts. Administrators only.
#[derive(Debug, Parser)]
pub(crate) struct Customers {
    /// Also show everything the customer with this ID has bought.
    #[arg(long, value_name = "USER_ID")]
    purchases: Option<u64>,
}

#[async_trait]
impl super::Command for Customers {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.show(
            Route::Customers,
            self.purchases
                .map(|user_id| Submission::ViewPurchases { user_id }),
        )
        .await
    }
}
