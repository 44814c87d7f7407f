// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use chrono::Utc;
use log::info;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    app::App,
    error::{self, Result},
    guard::Route,
    metadata,
    model::{self, NewTransaction, Package, Principal},
    store::{CatalogAction, CatalogState, TransactionAction},
};

use super::{ignore, Notice, Outcome, Scope, Submission, View};

pub(crate) const LOAD_FAILED: &str = "Failed to load the package";
pub(crate) const PURCHASE_FAILED: &str = "Failed to complete the purchase";

#[derive(Debug)]
pub(crate) struct PurchaseView {
    package: Option<Package>,
    loading: bool,
    error: Option<String>,
}

impl PurchaseView {
    pub(crate) fn derive(catalog: &CatalogState) -> Self {
        Self {
            package: catalog.selected.clone(),
            loading: catalog.single.loading,
            error: catalog.single.error.clone(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct Detail {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// The rows of a package summary, as shown before buying or editing it.
pub(crate) fn details(package: &Package) -> Vec<Detail> {
    vec![
        Detail {
            field: "Package",
            value: package.name.clone(),
        },
        Detail {
            field: "Data",
            value: package.allowance.clone(),
        },
        Detail {
            field: "Valid for",
            value: package.validity.clone(),
        },
        Detail {
            field: "Price",
            value: model::format_price(package.price),
        },
        Detail {
            field: "Description",
            value: package.description.clone(),
        },
    ]
}

impl fmt::Display for PurchaseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "{error}");
        }
        let Some(package) = &self.package else {
            return writeln!(
                f,
                "{}",
                if self.loading {
                    "Loading package..."
                } else {
                    "Package not found"
                }
            );
        };

        writeln!(f, "Confirm your purchase")?;
        let mut table = Table::new(details(package));
        let _ = table.with(Style::rounded());
        writeln!(f, "{table}")?;
        writeln!(
            f,
            "Pay with: {} purchase {} --phone <number>",
            *metadata::CLIENT_TYPE_ID,
            package.id
        )
    }
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    package_id: u64,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(Route::Purchase(package_id));
    let Some(viewer) = app.viewer().cloned() else {
        return Ok(outcome.redirect_to(Route::Login));
    };

    let result = checkout(app, scope, &viewer, package_id, submission, &mut outcome).await;
    let view = PurchaseView::derive(app.catalog.state());
    app.catalog.dispatch(CatalogAction::ClearSelected);
    result?;

    if outcome.redirect.is_none() {
        outcome.view = Some(View::Purchase(view));
    }
    Ok(outcome)
}

async fn checkout(
    app: &mut App,
    scope: &Scope,
    viewer: &Principal,
    package_id: u64,
    submission: Option<Submission>,
    outcome: &mut Outcome,
) -> Result<()> {
    scope.dispatch(&mut app.catalog, CatalogAction::FetchOneStarted);
    let Some(package) = scope
        .attempt("load the package", app.client.get_package(package_id))
        .await?
    else {
        scope.dispatch(
            &mut app.catalog,
            CatalogAction::FetchOneFailed(LOAD_FAILED.to_owned()),
        );
        outcome.notify(Notice::Error(LOAD_FAILED.to_owned()));
        return Ok(());
    };
    scope.dispatch(
        &mut app.catalog,
        CatalogAction::FetchOneSucceeded(package.clone()),
    );

    let phone = match submission {
        None => return Ok(()),
        Some(Submission::Purchase { phone }) => phone,
        Some(other) => {
            ignore(outcome.route, &other);
            return Ok(());
        }
    };
    if phone.trim().is_empty() {
        outcome.notify(Notice::Error(
            error::Validation::Blank("phone number").to_string(),
        ));
        return Ok(());
    }

    let order = NewTransaction::purchase(viewer, &package, Utc::now());
    scope.dispatch(&mut app.transactions, TransactionAction::CreateStarted);
    match scope
        .attempt(
            "record the purchase",
            app.client.create_transaction(&order),
        )
        .await?
    {
        Some(transaction) => {
            info!("Bought {} as transaction {}", package.name, transaction.id);
            scope.dispatch(
                &mut app.transactions,
                TransactionAction::CreateSucceeded(transaction),
            );
            outcome.notify(Notice::Success(format!(
                "Purchase successful! You bought {}.",
                package.name
            )));
            outcome.redirect = Some(Route::Transactions);
        }
        None => {
            scope.dispatch(
                &mut app.transactions,
                TransactionAction::CreateFailed(PURCHASE_FAILED.to_owned()),
            );
            outcome.notify(Notice::Error(PURCHASE_FAILED.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::{
        client::MockClient,
        error::Error,
        model::{Role, Transaction, TransactionStatus},
        screen::fixtures,
    };

    use super::*;

    fn shop(package: Package) -> MockClient {
        let mut client = MockClient::new();
        let _ = client
            .expect_get_package()
            .with(eq(package.id))
            .times(1)
            .return_once(move |_| Ok(package));
        client
    }

    fn buy(phone: &str) -> Option<Submission> {
        Some(Submission::Purchase {
            phone: phone.to_owned(),
        })
    }

    #[tokio::test]
    async fn purchase_records_a_completed_transaction() -> Result<()> {
        let mut client = shop(fixtures::package(4, "Combo Sakti", 75_000));
        let _ = client
            .expect_create_transaction()
            .withf(|order| {
                order.user_id == 2
                    && order.package_id == 4
                    && order.total == 75_000
                    && order.status == TransactionStatus::Completed
            })
            .times(1)
            .returning(|order| {
                Ok(Transaction {
                    id: 10,
                    user_id: order.user_id,
                    package_id: order.package_id,
                    date: order.date,
                    status: order.status,
                    total: order.total,
                })
            });
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), 4, buy("0812 3456 7890")).await?;

        assert_eq!(outcome.redirect, Some(Route::Transactions));
        assert_eq!(
            outcome.notices,
            vec![Notice::Success(
                "Purchase successful! You bought Combo Sakti.".to_owned()
            )]
        );
        assert_eq!(app.transactions.state().transactions.len(), 1);
        assert_eq!(app.catalog.state().selected, None);
        Ok(())
    }

    #[tokio::test]
    async fn phone_number_is_not_recorded() -> Result<()> {
        const PHONE: &str = "081299990000";

        let mut client = shop(fixtures::package(4, "Combo Sakti", 75_000));
        let _ = client
            .expect_create_transaction()
            .withf(|order| serde_json::to_string(order).is_ok_and(|body| !body.contains(PHONE)))
            .times(1)
            .returning(|order| {
                Ok(fixtures::transaction(
                    11,
                    order.user_id,
                    order.package_id,
                    order.total,
                ))
            });
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), 4, buy(PHONE)).await?;

        assert_eq!(outcome.redirect, Some(Route::Transactions));
        assert!(outcome
            .notices
            .iter()
            .all(|notice| !format!("{notice:?}").contains(PHONE)));
        assert!(!format!("{:?}", app.transactions.state()).contains(PHONE));
        Ok(())
    }

    #[tokio::test]
    async fn blank_phone_is_rejected_before_any_request() -> Result<()> {
        let mut app = fixtures::app(
            shop(fixtures::package(4, "Combo Sakti", 75_000)),
            Some(fixtures::principal(2, Role::Customer)),
        )
        .await;

        let outcome = mount(&mut app, &Scope::default(), 4, buy("   ")).await?;

        assert_eq!(outcome.redirect, None);
        assert!(outcome.notices.iter().any(Notice::is_error));
        assert!(app.transactions.state().transactions.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_purchase_is_reported() -> Result<()> {
        let mut client = shop(fixtures::package(4, "Combo Sakti", 75_000));
        let _ = client
            .expect_create_transaction()
            .returning(|_| Err(Error::Command));
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), 4, buy("081234567890")).await?;

        assert_eq!(
            outcome.notices,
            vec![Notice::Error(PURCHASE_FAILED.to_owned())]
        );
        assert_eq!(
            app.transactions.state().create.error.as_deref(),
            Some(PURCHASE_FAILED)
        );
        Ok(())
    }

    #[tokio::test]
    async fn summary_is_shown_and_the_selection_cleared() -> Result<()> {
        let mut app = fixtures::app(
            shop(fixtures::package(4, "Combo Sakti", 75_000)),
            Some(fixtures::principal(2, Role::Customer)),
        )
        .await;

        let outcome = mount(&mut app, &Scope::default(), 4, None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains("Confirm your purchase"));
        assert!(rendered.contains("Rp 75.000"));
        assert_eq!(app.catalog.state().selected, None);
        Ok(())
    }

    #[tokio::test]
    async fn missing_package_is_reported() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client.expect_get_package().returning(|id| {
            Err(error::Backend::NotFound {
                collection: "packages",
                id,
            }
            .into())
        });
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), 9, buy("0812")).await?;

        assert_eq!(outcome.notices, vec![Notice::Error(LOAD_FAILED.to_owned())]);
        assert_eq!(app.catalog.state().single, Default::default());
        Ok(())
    }
}
