// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, fmt};

use tabled::{settings::Style, Table, Tabled};

use crate::{
    app::App,
    client,
    error::Result,
    guard::Route,
    model::{self, Package, TransactionStatus},
    store::{TransactionAction, TransactionState},
};

use super::{ignore, Notice, Outcome, Scope, Submission, View};

pub(crate) const LOAD_FAILED: &str = "Failed to load transactions";

const EMPTY_OWN: &str = "No transactions yet. Packages you buy will show up here.";

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    date: String,
    package: String,
    total: String,
    status: TransactionStatus,
}

#[derive(Tabled)]
struct EntryRow<'a> {
    #[tabled(rename = "Date")]
    date: &'a str,
    #[tabled(rename = "Package")]
    package: &'a str,
    #[tabled(rename = "Total")]
    total: &'a str,
    #[tabled(rename = "Status")]
    status: TransactionStatus,
}

/// A list of purchases with the names of the packages bought.
#[derive(Debug)]
pub(crate) struct HistoryView {
    title: String,
    empty: &'static str,
    error: Option<String>,
    entries: Vec<Entry>,
}

impl HistoryView {
    pub(crate) fn derive(
        title: String,
        empty: &'static str,
        state: &TransactionState,
        packages: &HashMap<u64, Package>,
    ) -> Self {
        let entries = state
            .transactions
            .iter()
            .map(|transaction| Entry {
                date: transaction.date.format("%d %B %Y").to_string(),
                package: packages.get(&transaction.package_id).map_or_else(
                    || format!("Unknown package #{}", transaction.package_id),
                    |package| package.name.clone(),
                ),
                total: model::format_price(transaction.total),
                status: transaction.status,
            })
            .collect();

        Self {
            title,
            empty,
            error: state.fetch.error.clone(),
            entries,
        }
    }
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;

        if let Some(error) = &self.error {
            return writeln!(f, "{error}");
        }
        if self.entries.is_empty() {
            return writeln!(f, "{}", self.empty);
        }

        let mut table = Table::new(self.entries.iter().map(|entry| EntryRow {
            date: &entry.date,
            package: &entry.package,
            total: &entry.total,
            status: entry.status,
        }));
        let _ = table.with(Style::rounded());
        writeln!(f, "{table}")
    }
}

/// Fetches the transactions of `user_id` and the packages they refer to.
/// Returns `None` once the failure has been recorded and reported.
pub(crate) async fn load_history(
    app: &mut App,
    scope: &Scope,
    user_id: u64,
    outcome: &mut Outcome,
) -> Result<Option<HashMap<u64, Package>>> {
    scope.dispatch(&mut app.transactions, TransactionAction::FetchStarted);

    let transactions = match scope
        .attempt(
            "load transactions",
            app.client.list_transactions(user_id),
        )
        .await?
    {
        Some(transactions) => transactions,
        None => return fail(app, scope, outcome),
    };

    let packages = scope
        .attempt(
            "look up the purchased packages",
            client::resolve_packages(app.client.as_ref(), &transactions),
        )
        .await?;
    match packages {
        Some(packages) => {
            scope.dispatch(
                &mut app.transactions,
                TransactionAction::FetchSucceeded(transactions),
            );
            Ok(Some(packages))
        }
        None => fail(app, scope, outcome),
    }
}

fn fail<T>(app: &mut App, scope: &Scope, outcome: &mut Outcome) -> Result<Option<T>> {
    scope.dispatch(
        &mut app.transactions,
        TransactionAction::FetchFailed(LOAD_FAILED.to_owned()),
    );
    outcome.notify(Notice::Error(LOAD_FAILED.to_owned()));
    Ok(None)
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(Route::Transactions);
    let Some(viewer) = app.viewer().cloned() else {
        return Ok(outcome.redirect_to(Route::Login));
    };
    if let Some(submission) = &submission {
        ignore(Route::Transactions, submission);
    }

    let packages = load_history(app, scope, viewer.id, &mut outcome)
        .await?
        .unwrap_or_default();
    let view = HistoryView::derive(
        "Transaction history".to_owned(),
        EMPTY_OWN,
        app.transactions.state(),
        &packages,
    );
    Ok(outcome.with_view(View::Transactions(view)))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::{client::MockClient, error::Error, model::Role, screen::fixtures};

    use super::*;

    #[tokio::test]
    async fn history_names_each_package() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_transactions()
            .with(eq(2_u64))
            .times(1)
            .returning(|user_id| {
                Ok(vec![
                    fixtures::transaction(1, user_id, 7, 50_000),
                    fixtures::transaction(2, user_id, 8, 10_000),
                ])
            });
        let _ = client.expect_get_package().returning(|id| {
            if id == 7 {
                Ok(fixtures::package(7, "Combo Sakti", 50_000))
            } else {
                Err(crate::error::Backend::NotFound {
                    collection: "packages",
                    id,
                }
                .into())
            }
        });
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(outcome.notices.is_empty());
        assert!(rendered.contains("Combo Sakti"));
        assert!(rendered.contains("Unknown package #8"));
        assert!(rendered.contains("05 March 2024"));
        assert!(rendered.contains("Rp 10.000"));
        assert!(rendered.contains("Completed"));
        Ok(())
    }

    #[tokio::test]
    async fn no_purchases_shows_the_empty_state() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_transactions()
            .returning(|_| Ok(vec![]));
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains("No transactions yet"));
        Ok(())
    }

    #[tokio::test]
    async fn failure_sets_the_store_error() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_transactions()
            .returning(|_| Err(Error::Command));
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;

        assert_eq!(outcome.notices, vec![Notice::Error(LOAD_FAILED.to_owned())]);
        let state = app.transactions.state();
        assert!(!state.fetch.loading);
        assert_eq!(state.fetch.error.as_deref(), Some(LOAD_FAILED));
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_scope_leaves_the_store_alone() {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_transactions()
            .returning(|_| Ok(vec![]));
        let mut app = fixtures::app(client, Some(fixtures::principal(2, Role::Customer))).await;
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();

        let result = mount(&mut app, &Scope::new(token), None).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(app.transactions.state(), &TransactionState::default());
    }
}
