// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use futures_util::future;
use log::warn;

use crate::{
    auth::Account,
    error::{self, Result},
    model::{NewTransaction, Package, PackageDraft, Principal, Transaction},
};

/// The backend's resource collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Client: Send + Sync {
    async fn list_packages(&self) -> Result<Vec<Package>>;

    async fn get_package(&self, id: u64) -> Result<Package>;

    async fn create_package(&self, draft: &PackageDraft) -> Result<Package>;

    async fn update_package(&self, id: u64, draft: &PackageDraft) -> Result<Package>;

    async fn delete_package(&self, id: u64) -> Result<()>;

    /// Accounts whose username matches `username`.
    async fn find_accounts(&self, username: &str) -> Result<Vec<Account>>;

    /// Every account without the administrator role.
    async fn list_customers(&self) -> Result<Vec<Principal>>;

    async fn list_transactions(&self, user_id: u64) -> Result<Vec<Transaction>>;

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction>;
}

/// Fetches the package behind every transaction, one request per distinct
/// package, all in flight at once. Packages that no longer exist are left
/// out of the result.
pub(crate) async fn resolve_packages(
    client: &dyn Client,
    transactions: &[Transaction],
) -> Result<HashMap<u64, Package>> {
    let ids = transactions
        .iter()
        .map(|transaction| transaction.package_id)
        .collect::<BTreeSet<_>>();

    let packages = future::try_join_all(ids.into_iter().map(|id| async move {
        match client.get_package(id).await {
            Ok(package) => Ok(Some(package)),
            Err(error::Error::Backend(error::Backend::NotFound { .. })) => {
                warn!("Package {} referenced by a transaction no longer exists", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }))
    .await?;

    Ok(packages
        .into_iter()
        .flatten()
        .map(|package| (package.id, package))
        .collect())
}
