// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use log::info;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    app::App,
    error::Result,
    guard::Route,
    metadata,
    model::{self, Package, Principal, Role},
    store::{CatalogAction, CatalogState},
};

use super::{ignore, Notice, Outcome, Scope, Submission, View};

pub(crate) const LOAD_FAILED: &str = "Failed to load packages";
pub(crate) const DELETE_FAILED: &str = "Failed to delete the package";

const EMPTY_FOR_ADMINISTRATOR: &str =
    "You have not added any data packages yet. Add a new package to show it here.";
const EMPTY_FOR_CUSTOMER: &str =
    "No data packages are available right now. Please try again later.";

/// Something the viewer can do from the dashboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    AddPackage,
    Purchase,
    EditPackage,
    DeletePackage,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bin = &*metadata::CLIENT_TYPE_ID;
        match self {
            Self::AddPackage => write!(f, "Add a package: {bin} package new --help"),
            Self::Purchase => write!(f, "Buy a package: {bin} purchase <id> --phone <number>"),
            Self::EditPackage => write!(f, "Edit a package: {bin} package edit <id> --help"),
            Self::DeletePackage => write!(f, "Delete a package: {bin} package delete <id>"),
        }
    }
}

/// A screen reachable from the dashboard's navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Link {
    Transactions,
    Customers,
    Logout,
}

impl Link {
    fn for_role(role: Role) -> Vec<Self> {
        match role {
            Role::Customer => vec![Self::Transactions, Self::Logout],
            Role::Administrator => vec![Self::Customers, Self::Logout],
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bin = &*metadata::CLIENT_TYPE_ID;
        match self {
            Self::Transactions => write!(f, "Transactions: {bin} transactions"),
            Self::Customers => write!(f, "Customers: {bin} customers"),
            Self::Logout => write!(f, "Sign out: {bin} logout"),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Body {
    Loading,
    Failed(String),
    Empty(&'static str),
    Packages(Vec<Package>),
}

#[derive(Debug)]
pub(crate) struct DashboardView {
    name: String,
    body: Body,
    actions: Vec<Action>,
    navigation: Vec<Link>,
}

impl DashboardView {
    pub(crate) fn derive(viewer: &Principal, catalog: &CatalogState) -> Self {
        let administrator = viewer.role.can_manage_catalog();

        let body = if catalog.is_loading() {
            Body::Loading
        } else if let Some(error) = &catalog.list.error {
            Body::Failed(error.clone())
        } else if catalog.packages.is_empty() {
            Body::Empty(if administrator {
                EMPTY_FOR_ADMINISTRATOR
            } else {
                EMPTY_FOR_CUSTOMER
            })
        } else {
            Body::Packages(catalog.packages.clone())
        };

        let actions = match (&body, viewer.role) {
            (Body::Packages(_), Role::Administrator) => vec![
                Action::AddPackage,
                Action::EditPackage,
                Action::DeletePackage,
            ],
            (Body::Packages(_), Role::Customer) => vec![Action::Purchase],
            (Body::Empty(_), Role::Administrator) => vec![Action::AddPackage],
            _ => vec![],
        };

        Self {
            name: viewer.display_name.clone(),
            body,
            actions,
            navigation: Link::for_role(viewer.role),
        }
    }

    pub(crate) fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub(crate) fn navigation(&self) -> &[Link] {
        &self.navigation
    }
}

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Data")]
    allowance: String,
    #[tabled(rename = "Valid for")]
    validity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Package> for PackageRow {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id,
            name: package.name.clone(),
            allowance: package.allowance.clone(),
            validity: package.validity.clone(),
            price: model::format_price(package.price),
            description: package.description.clone(),
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welcome, {}!", self.name)?;
        writeln!(f, "Choose an internet data package.")?;
        writeln!(f)?;

        match &self.body {
            Body::Loading => writeln!(f, "Loading packages...")?,
            Body::Failed(error) => writeln!(f, "{error}")?,
            Body::Empty(message) => {
                writeln!(f, "No data packages yet")?;
                writeln!(f, "{message}")?;
            }
            Body::Packages(packages) => {
                let mut table = Table::new(packages.iter().map(PackageRow::from));
                let _ = table.with(Style::rounded());
                writeln!(f, "{table}")?;
            }
        }

        if !self.actions.is_empty() {
            writeln!(f)?;
            for action in &self.actions {
                writeln!(f, "{action}")?;
            }
        }

        writeln!(f)?;
        for link in &self.navigation {
            writeln!(f, "{link}")?;
        }
        Ok(())
    }
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(Route::Dashboard);
    let Some(viewer) = app.viewer().cloned() else {
        return Ok(outcome.redirect_to(Route::Login));
    };

    scope.dispatch(&mut app.catalog, CatalogAction::FetchListStarted);
    match scope
        .attempt("load packages", app.client.list_packages())
        .await?
    {
        Some(packages) => scope.dispatch(
            &mut app.catalog,
            CatalogAction::FetchListSucceeded(packages),
        ),
        None => {
            scope.dispatch(
                &mut app.catalog,
                CatalogAction::FetchListFailed(LOAD_FAILED.to_owned()),
            );
            outcome.notify(Notice::Error(LOAD_FAILED.to_owned()));
        }
    }

    match submission {
        Some(Submission::DeletePackage { id, confirmed }) => {
            delete(app, scope, &viewer, id, confirmed, &mut outcome).await?;
        }
        Some(other) => ignore(Route::Dashboard, &other),
        None => {}
    }

    Ok(outcome.with_view(View::Dashboard(DashboardView::derive(
        &viewer,
        app.catalog.state(),
    ))))
}

async fn delete(
    app: &mut App,
    scope: &Scope,
    viewer: &Principal,
    id: u64,
    confirmed: bool,
    outcome: &mut Outcome,
) -> Result<()> {
    if !viewer.role.can_manage_catalog() {
        outcome.notify(Notice::Error(
            "Only administrators can delete packages".to_owned(),
        ));
        return Ok(());
    }

    let name = app
        .catalog
        .state()
        .packages
        .iter()
        .find(|package| package.id == id)
        .map_or_else(|| format!("package {id}"), |package| package.name.clone());

    if !confirmed
        && !app
            .confirm
            .confirm(&format!("Delete {name}? This cannot be undone."))
            .await?
    {
        info!("Keeping {}", name);
        return Ok(());
    }

    scope.dispatch(&mut app.catalog, CatalogAction::DeleteStarted);
    match scope
        .attempt("delete the package", app.client.delete_package(id))
        .await?
    {
        Some(()) => {
            scope.dispatch(&mut app.catalog, CatalogAction::DeleteSucceeded(id));
            outcome.notify(Notice::Success(format!(
                "Deleted! {name} has been deleted."
            )));
        }
        None => {
            scope.dispatch(
                &mut app.catalog,
                CatalogAction::DeleteFailed(DELETE_FAILED.to_owned()),
            );
            outcome.notify(Notice::Error(DELETE_FAILED.to_owned()));
        }
    }
    Ok(())
}
