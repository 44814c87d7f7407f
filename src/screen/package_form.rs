// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use tabled::{settings::Style, Table};

use crate::{
    app::App,
    error::{Result, Validation},
    guard::Route,
    metadata,
    model::{Package, PackageDraft},
    store::{CatalogAction, CatalogState},
};

use super::{ignore, purchase, Notice, Outcome, Scope, Submission, View};

pub(crate) const LOAD_FAILED: &str = "Failed to load the package";
pub(crate) const SAVE_FAILED: &str = "Failed to save the package";

/// Form fields as entered. A field left out keeps the value of the package
/// being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PackageInput {
    pub(crate) name: Option<String>,
    pub(crate) price: Option<String>,
    pub(crate) allowance: Option<String>,
    pub(crate) validity: Option<String>,
    pub(crate) description: Option<String>,
}

impl PackageInput {
    pub(crate) fn into_draft(self, base: Option<&Package>) -> Result<PackageDraft, Validation> {
        let price = match self.price {
            Some(raw) => parse_price(&raw)?,
            None => base
                .map(|package| package.price)
                .ok_or(Validation::Blank("price"))?,
        };

        Ok(PackageDraft {
            name: required("name", self.name, base.map(|package| package.name.as_str()))?,
            price,
            allowance: required(
                "data",
                self.allowance,
                base.map(|package| package.allowance.as_str()),
            )?,
            validity: required(
                "duration",
                self.validity,
                base.map(|package| package.validity.as_str()),
            )?,
            description: self
                .description
                .or_else(|| base.map(|package| package.description.clone()))
                .unwrap_or_default()
                .trim()
                .to_owned(),
        })
    }
}

fn required(
    field: &'static str,
    value: Option<String>,
    fallback: Option<&str>,
) -> Result<String, Validation> {
    let value = value
        .as_deref()
        .or(fallback)
        .map(str::trim)
        .unwrap_or_default();
    if value.is_empty() {
        Err(Validation::Blank(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Reads a price typed in any format, such as "Rp 50.000", by keeping only
/// its digits.
pub(crate) fn parse_price(raw: &str) -> Result<u64, Validation> {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();

    let signed = raw
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .any(|c| c == '-');
    if signed {
        return Err(Validation::Price(raw.to_owned()));
    }

    if digits.is_empty() {
        return Err(if raw.trim().is_empty() {
            Validation::Blank("price")
        } else {
            Validation::Price(raw.to_owned())
        });
    }
    digits.parse().map_err(|_| Validation::Price(raw.to_owned()))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormMode {
    New,
    Edit(u64),
}

impl FormMode {
    pub(crate) const fn route(self) -> Route {
        match self {
            Self::New => Route::NewPackage,
            Self::Edit(id) => Route::EditPackage(id),
        }
    }
}

#[derive(Debug)]
pub(crate) struct PackageFormView {
    mode: FormMode,
    current: Option<Package>,
    error: Option<String>,
}

impl PackageFormView {
    pub(crate) fn derive(mode: FormMode, catalog: &CatalogState) -> Self {
        Self {
            mode,
            current: catalog.selected.clone(),
            error: catalog.single.error.clone(),
        }
    }
}

impl fmt::Display for PackageFormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bin = &*metadata::CLIENT_TYPE_ID;
        match self.mode {
            FormMode::New => {
                writeln!(f, "Add a new package")?;
                writeln!(
                    f,
                    "Fill it in with: {bin} package new --name <name> --price <price> \
                     --data <allowance> --duration <validity> [--description <text>]"
                )
            }
            FormMode::Edit(id) => {
                writeln!(f, "Edit package #{id}")?;
                if let Some(error) = &self.error {
                    return writeln!(f, "{error}");
                }
                if let Some(package) = &self.current {
                    let mut table = Table::new(purchase::details(package));
                    let _ = table.with(Style::rounded());
                    writeln!(f, "{table}")?;
                }
                writeln!(
                    f,
                    "Change fields with: {bin} package edit {id} [--name <name>] \
                     [--price <price>] [--data <allowance>] [--duration <validity>] \
                     [--description <text>]"
                )
            }
        }
    }
}

pub(crate) async fn mount(
    app: &mut App,
    scope: &Scope,
    mode: FormMode,
    submission: Option<Submission>,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(mode.route());

    let result = fill(app, scope, mode, submission, &mut outcome).await;
    let view = PackageFormView::derive(mode, app.catalog.state());
    app.catalog.dispatch(CatalogAction::ClearSelected);
    result?;

    if outcome.redirect.is_none() {
        outcome.view = Some(View::PackageForm(view));
    }
    Ok(outcome)
}

async fn fill(
    app: &mut App,
    scope: &Scope,
    mode: FormMode,
    submission: Option<Submission>,
    outcome: &mut Outcome,
) -> Result<()> {
    if let FormMode::Edit(id) = mode {
        scope.dispatch(&mut app.catalog, CatalogAction::FetchOneStarted);
        match scope
            .attempt("load the package", app.client.get_package(id))
            .await?
        {
            Some(package) => {
                scope.dispatch(&mut app.catalog, CatalogAction::FetchOneSucceeded(package));
            }
            None => {
                scope.dispatch(
                    &mut app.catalog,
                    CatalogAction::FetchOneFailed(LOAD_FAILED.to_owned()),
                );
                outcome.notify(Notice::Error(LOAD_FAILED.to_owned()));
                return Ok(());
            }
        }
    }

    let input = match submission {
        None => return Ok(()),
        Some(Submission::SavePackage(input)) => input,
        Some(other) => {
            ignore(outcome.route, &other);
            return Ok(());
        }
    };

    let draft = match input.into_draft(app.catalog.state().selected.as_ref()) {
        Ok(draft) => draft,
        Err(e) => {
            outcome.notify(Notice::Error(format!("Check the form: {e}")));
            return Ok(());
        }
    };

    let saved = match mode {
        FormMode::New => {
            scope
                .attempt("add the package", app.client.create_package(&draft))
                .await?
        }
        FormMode::Edit(id) => {
            scope
                .attempt("update the package", app.client.update_package(id, &draft))
                .await?
        }
    };

    match saved {
        Some(package) => {
            outcome.notify(Notice::Success(match mode {
                FormMode::New => format!("Package added! {} is now on sale.", package.name),
                FormMode::Edit(_) => format!("Package updated! {} has been saved.", package.name),
            }));
            outcome.redirect = Some(Route::Dashboard);
        }
        None => outcome.notify(Notice::Error(SAVE_FAILED.to_owned())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;

    use crate::{client::MockClient, error::Error, model::Role, screen::fixtures};

    use super::*;

    fn input(name: &str, price: &str, allowance: &str, validity: &str) -> PackageInput {
        PackageInput {
            name: Some(name.to_owned()),
            price: Some(price.to_owned()),
            allowance: Some(allowance.to_owned()),
            validity: Some(validity.to_owned()),
            description: None,
        }
    }

    fn admin() -> Option<crate::model::Principal> {
        Some(fixtures::principal(1, Role::Administrator))
    }

    #[rstest]
    #[case::formatted("Rp 50.000", 50_000)]
    #[case::plain("15000", 15_000)]
    #[case::spaced(" 1 000 ", 1_000)]
    fn price_keeps_only_digits(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_price(raw), Ok(expected));
    }

    #[rstest]
    #[case::blank("  ", Validation::Blank("price"))]
    #[case::words("free", Validation::Price("free".to_owned()))]
    #[case::overflow("99999999999999999999999", Validation::Price("99999999999999999999999".to_owned()))]
    #[case::negative("-5000", Validation::Price("-5000".to_owned()))]
    #[case::negative_currency("Rp -5.000", Validation::Price("Rp -5.000".to_owned()))]
    fn unusable_prices_are_rejected(#[case] raw: &str, #[case] expected: Validation) {
        assert_eq!(parse_price(raw), Err(expected));
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let draft = input("   ", "10000", "5GB", "7 days").into_draft(None);

        assert_eq!(draft, Err(Validation::Blank("name")));
    }

    #[test]
    fn missing_fields_fall_back_to_the_package_being_edited() {
        let base = fixtures::package(3, "Harian", 5_000);
        let changes = PackageInput {
            price: Some("Rp 6.000".to_owned()),
            ..PackageInput::default()
        };

        let draft = changes.into_draft(Some(&base));

        assert_eq!(
            draft,
            Ok(PackageDraft {
                price: 6_000,
                ..PackageDraft::from(base)
            })
        );
    }

    #[tokio::test]
    async fn new_package_is_posted() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_create_package()
            .withf(|draft| draft.name == "Mingguan" && draft.price == 25_000)
            .times(1)
            .returning(|draft| {
                Ok(Package {
                    id: 9,
                    name: draft.name.clone(),
                    price: draft.price,
                    allowance: draft.allowance.clone(),
                    validity: draft.validity.clone(),
                    description: draft.description.clone(),
                })
            });
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            FormMode::New,
            Some(Submission::SavePackage(input(
                "Mingguan",
                "Rp 25.000",
                "5GB",
                "7 days",
            ))),
        )
        .await?;

        assert_eq!(outcome.redirect, Some(Route::Dashboard));
        assert_eq!(
            outcome.notices,
            vec![Notice::Success(
                "Package added! Mingguan is now on sale.".to_owned()
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn edit_starts_from_the_stored_package() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_get_package()
            .with(eq(3_u64))
            .times(1)
            .returning(|id| Ok(fixtures::package(id, "Harian", 5_000)));
        let _ = client
            .expect_update_package()
            .withf(|id, draft| *id == 3 && draft.name == "Harian Plus" && draft.price == 5_000)
            .times(1)
            .returning(|id, draft| {
                Ok(Package {
                    id,
                    name: draft.name.clone(),
                    price: draft.price,
                    allowance: draft.allowance.clone(),
                    validity: draft.validity.clone(),
                    description: draft.description.clone(),
                })
            });
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            FormMode::Edit(3),
            Some(Submission::SavePackage(PackageInput {
                name: Some("Harian Plus".to_owned()),
                ..PackageInput::default()
            })),
        )
        .await?;

        assert_eq!(outcome.redirect, Some(Route::Dashboard));
        assert_eq!(app.catalog.state().selected, None);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_sends_nothing() -> Result<()> {
        let mut app = fixtures::app(MockClient::new(), admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            FormMode::New,
            Some(Submission::SavePackage(input("Harian", "", "1GB", "1 day"))),
        )
        .await?;

        assert_eq!(outcome.redirect, None);
        assert!(outcome.notices.iter().any(Notice::is_error));
        assert!(outcome.view.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_is_reported() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_create_package()
            .returning(|_| Err(Error::Command));
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(
            &mut app,
            &Scope::default(),
            FormMode::New,
            Some(Submission::SavePackage(input("Harian", "5000", "1GB", "1 day"))),
        )
        .await?;

        assert_eq!(outcome.notices, vec![Notice::Error(SAVE_FAILED.to_owned())]);
        Ok(())
    }

    #[tokio::test]
    async fn edit_form_shows_current_values() -> Result<()> {
        let mut client = MockClient::new();
        let _ = client
            .expect_get_package()
            .returning(|id| Ok(fixtures::package(id, "Bulanan", 90_000)));
        let mut app = fixtures::app(client, admin()).await;

        let outcome = mount(&mut app, &Scope::default(), FormMode::Edit(5), None).await?;
        let rendered = outcome.view.map(|view| view.to_string()).unwrap_or_default();

        assert!(rendered.contains("Edit package #5"));
        assert!(rendered.contains("Bulanan"));
        assert!(rendered.contains("Rp 90.000"));
        Ok(())
    }
}
