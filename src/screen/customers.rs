// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use tabled::{settings::Style, Table, Tabled};

use crate::{
    app::App,
    error::Result,
    guard::Route,
    metadata,
    model::Principal,
    store::{DirectoryAction, DirectoryState, TransactionAction},
};

use super::{
    ignore,
    transactions::{self, HistoryView},
    Notice, Outcome, Scope, Submission, View,
};

pub(crate) const LOAD_FAILED: &str = "Failed to load customers";

const EMPTY: &str = "No customers have registered yet.";
const EMPTY_HISTORY: &str = "This customer has not bought any packages yet.";

#[derive(Tabled)]
struct CustomerRow<'a> {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Username")]
    username: &'a str,
    #[tabled(rename = "Email")]
    email: &'a str,
}

#[derive(Debug)]
pub(crate) struct CustomersView {
    customers: Vec<Principal>,
    error: Option<String>,
    history: Option<HistoryView>,
}

impl CustomersView {
    pub(crate) fn derive(directory: &DirectoryState, history: Option<HistoryView>) -> Self {
        Self {
            customers: directory.customers.clone(),
            error: directory.fetch.error.clone(),
            history,
        }
    }
}

impl fmt::Display for CustomersView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customers")?;

        if let Some(error) = &self.error {
            writeln!(f, "{error}")?;
        } else if self.customers.is_empty() {
            writeln!(f, "{EMPTY}")?;
        } else {
            let mut table = Table::new(self.customers.iter().map(|customer| CustomerRow {
                id: customer.id,
                name: &customer.display_name,
                username: &customer.username,
                email: &customer.email,
            }));
            let _ = table.with(Style::rounded());
            writeln!(f, "{table}")?;
            writeln!(
                f,
                "See what a customer bought with: {} customers --purchases <id>",
                *metadata::CLIENT_TYPE_ID
            )?;
        }

        if let Some(history) = &self.history {
            writeln!(f)?;
            write!(f, "{history}")?;
        }
        Ok(())
    }
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(Route::Customers);

    scope.dispatch(&mut app.directory, DirectoryAction::FetchStarted);
    match scope
        .attempt("load customers", app.client.list_customers())
        .await?
    {
        Some(customers) => {
            scope.dispatch(&mut app.directory, DirectoryAction::FetchSucceeded(customers));
        }
        None => {
            scope.dispatch(
                &mut app.directory,
                DirectoryAction::FetchFailed(LOAD_FAILED.to_owned()),
            );
            outcome.notify(Notice::Error(LOAD_FAILED.to_owned()));
        }
    }

    let history = match submission {
        Some(Submission::ViewPurchases { user_id }) => {
            purchases(app, scope, user_id, &mut outcome).await?
        }
        Some(other) => {
            ignore(Route::Customers, &other);
            None
        }
        None => None,
    };

    let view = CustomersView::derive(app.directory.state(), history);
    Ok(outcome.with_view(View::Customers(view)))
}

/// Shows one customer's purchases, then resets the transaction store so the
/// history does not outlive the listing.
async fn purchases(
    app: &mut App,
    scope: &Scope,
    user_id: u64,
    outcome: &mut Outcome,
) -> Result<Option<HistoryView>> {
    let Some(name) = app
        .directory
        .state()
        .customer(user_id)
        .map(|customer| customer.display_name.clone())
    else {
        if app.directory.state().fetch.error.is_none() {
            outcome.notify(Notice::Error(format!("There is no customer with ID {user_id}")));
        }
        return Ok(None);
    };

    let Some(packages) = transactions::load_history(app, scope, user_id, outcome).await? else {
        return Ok(None);
    };
    let history = HistoryView::derive(
        format!("Purchases by {name}"),
        EMPTY_HISTORY,
        app.transactions.state(),
        &packages,
    );
    scope.dispatch(&mut app.transactions, TransactionAction::Reset);
    Ok(Some(history))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::{
        client::MockClient,
        error::Error,
        model::Role,
        screen::fixtures,
        store::TransactionState,
    };

    use super::*;

    fn directory(customers: Vec<Principal>) -> MockClient {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_customers()
            .times(1)
            .return_once(move || Ok(customers));
        client
    }

    fn admin() -> Option<Principal> {
        Some(fixtures::principal(1, Role::Administrator))
    }

    #[tokio::test]
    async fn lists_customers() -> Result<()> {
        let mut app = fixtures::app(
            directory(vec![
                fixtures::principal(2, Role::Customer),
                fixtures::principal(3, Role::Customer),
            ]),
            admin(),
        )
        .await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains("customer2"));
        assert!(rendered.contains("CUSTOMER3"));
        Ok(())
    }

    #[tokio::test]
    async fn no_customers_shows_the_empty_state() -> Result<()> {
        let mut app = fixtures::app(directory(vec![]), admin()).await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains(EMPTY));
        Ok(())
    }

    #[tokio::test]
    async fn purchases_are_shown_then_reset() -> Result<()> {
        let mut client = directory(vec![fixtures::principal(2, Role::Customer)]);
        let _ = client
            .expect_list_transactions()
            .with(eq(2_u64))
            .times(1)
            .returning(|user_id| Ok(vec![fixtures::transaction(5, user_id, 7, 20_000)]));
        let _ = client
            .expect_get_package()
            .with(eq(7_u64))
            .times(1)
            .returning(|id| Ok(fixtures::package(id, "Malam", 20_000)));
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            Some(Submission::ViewPurchases { user_id: 2 }),
        )
        .await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains("Purchases by CUSTOMER2"));
        assert!(rendered.contains("Malam"));
        assert_eq!(app.transactions.state(), &TransactionState::default());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_customer_is_reported() -> Result<()> {
        let mut app = fixtures::app(directory(vec![]), admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            Some(Submission::ViewPurchases { user_id: 9 }),
        )
        .await?;

        assert_eq!(
            outcome.notices,
            vec![Notice::Error("There is no customer with ID 9".to_owned())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_is_reported() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_list_customers()
            .returning(|| Err(Error::Command));
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(&mut app, &Scope::default(), None).await?;

        assert_eq!(outcome.notices, vec![Notice::Error(LOAD_FAILED.to_owned())]);
        assert_eq!(
            app.directory.state().fetch.error.as_deref(),
            Some(LOAD_FAILED)
        );
        Ok(())
    }
}
