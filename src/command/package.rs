// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    error::Result,
    guard::Route,
    screen::{PackageInput, Submission},
};

use super::Context;

/// Fields of a package. On edit, the ones left out keep their current value.
#[derive(Debug, Default, Args)]
pub(crate) struct Fields {
    /// The name shown in the catalog.
    #[arg(long)]
    name: Option<String>,

    /// The price in rupiah. Anything but digits is ignored, so "Rp 50.000"
    /// works.
    #[arg(long)]
    price: Option<String>,

    /// The data allowance, such as "10GB".
    #[arg(long = "data", value_name = "ALLOWANCE")]
    allowance: Option<String>,

    /// How long the package lasts, such as "30 days".
    #[arg(long = "duration", value_name = "VALIDITY")]
    validity: Option<String>,

    #[arg(long)]
    description: Option<String>,
}

impl Fields {
    fn into_submission(self) -> Option<Submission> {
        let input = PackageInput {
            name: self.name,
            price: self.price,
            allowance: self.allowance,
            validity: self.validity,
            description: self.description,
        };
        (input != PackageInput::default()).then_some(Submission::SavePackage(input))
    }
}

/// Manage the package catalog. Administrators only.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Add a package. Without any fields, shows the form.
    New(Fields),

    /// Change a package. Without any fields, shows its current values.
    Edit {
        id: u64,

        #[command(flatten)]
        fields: Fields,
    },

    /// Remove a package from the catalog.
    Delete {
        id: u64,

        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self {
            Self::New(fields) => ctx.show(Route::NewPackage, fields.into_submission()).await,
            Self::Edit { id, fields } => {
                ctx.show(Route::EditPackage(id), fields.into_submission())
                    .await
            }
            Self::Delete { id, yes } => {
                ctx.show(
                    Route::Dashboard,
                    Some(Submission::DeletePackage { id, confirmed: yes }),
                )
                .await
            }
        }
    }
}
