// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The REST backend, reached over HTTP with JSON bodies.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    auth::Account,
    client::Client,
    error::{self, Result},
    metadata,
    model::{NewTransaction, Package, PackageDraft, Principal, Role, Transaction},
};

const PACKAGES: &str = "packages";
const USERS: &str = "users";
const TRANSACTIONS: &str = "transactions";

pub(crate) struct HttpClient {
    client: reqwest::Client,
    base: Url,
}

impl HttpClient {
    pub(crate) fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(metadata::USER_AGENT.as_str())
            .build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.base.join(path)?)
            .header(header::ACCEPT, "application/json"))
    }

    /// Sends the request and decodes a successful response body.
    /// `record` names the record the request addresses, so that a 404 can
    /// be reported as a missing record rather than a server failure.
    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        record: Option<(&'static str, u64)>,
    ) -> Result<T> {
        let response = self.send(builder, record).await?;
        Ok(response.json().await?)
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        record: Option<(&'static str, u64)>,
    ) -> Result<reqwest::Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        debug!("{} {}", method, request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!("{} {} answered {}", method, path, status);
        if status.is_success() {
            Ok(response)
        } else {
            Err(status_error(method, path, status, record).into())
        }
    }

    fn packages_request(&self) -> Result<RequestBuilder> {
        self.request(Method::GET, PACKAGES)
    }

    /// Addresses one package with `method`, as a read, replace or delete.
    fn package_request(&self, method: Method, id: u64) -> Result<RequestBuilder> {
        self.request(method, &record_path(PACKAGES, id))
    }

    fn create_package_request(&self, draft: &PackageDraft) -> Result<RequestBuilder> {
        Ok(self.request(Method::POST, PACKAGES)?.json(draft))
    }

    fn update_package_request(&self, id: u64, draft: &PackageDraft) -> Result<RequestBuilder> {
        Ok(self.package_request(Method::PUT, id)?.json(draft))
    }

    fn accounts_request(&self, username: &str) -> Result<RequestBuilder> {
        Ok(self
            .request(Method::GET, USERS)?
            .query(&[("username", username)]))
    }

    fn customers_request(&self) -> Result<RequestBuilder> {
        let administrator = (Role::Administrator as u8).to_string();
        Ok(self
            .request(Method::GET, USERS)?
            .query(&[("role_ne", administrator.as_str())]))
    }

    fn transactions_request(&self, user_id: u64) -> Result<RequestBuilder> {
        Ok(self
            .request(Method::GET, TRANSACTIONS)?
            .query(&[("userId", user_id)]))
    }

    fn create_transaction_request(&self, transaction: &NewTransaction) -> Result<RequestBuilder> {
        Ok(self.request(Method::POST, TRANSACTIONS)?.json(transaction))
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn record_path(collection: &str, id: u64) -> String {
    format!("{collection}/{id}")
}

fn status_error(
    method: Method,
    path: String,
    status: StatusCode,
    record: Option<(&'static str, u64)>,
) -> error::Backend {
    match record {
        Some((collection, id)) if status == StatusCode::NOT_FOUND => {
            error::Backend::NotFound { collection, id }
        }
        _ => error::Backend::Status {
            method,
            path,
            status,
        },
    }
}

#[async_trait]
impl Client for HttpClient {
    async fn list_packages(&self) -> Result<Vec<Package>> {
        self.fetch(self.packages_request()?, None).await
    }

    async fn get_package(&self, id: u64) -> Result<Package> {
        self.fetch(
            self.package_request(Method::GET, id)?,
            Some((PACKAGES, id)),
        )
        .await
    }

    async fn create_package(&self, draft: &PackageDraft) -> Result<Package> {
        self.fetch(self.create_package_request(draft)?, None).await
    }

    async fn update_package(&self, id: u64, draft: &PackageDraft) -> Result<Package> {
        self.fetch(
            self.update_package_request(id, draft)?,
            Some((PACKAGES, id)),
        )
        .await
    }

    async fn delete_package(&self, id: u64) -> Result<()> {
        let _ = self
            .send(
                self.package_request(Method::DELETE, id)?,
                Some((PACKAGES, id)),
            )
            .await?;
        Ok(())
    }

    async fn find_accounts(&self, username: &str) -> Result<Vec<Account>> {
        self.fetch(self.accounts_request(username)?, None).await
    }

    async fn list_customers(&self) -> Result<Vec<Principal>> {
        self.fetch(self.customers_request()?, None).await
    }

    async fn list_transactions(&self, user_id: u64) -> Result<Vec<Transaction>> {
        self.fetch(self.transactions_request(user_id)?, None).await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        self.fetch(self.create_transaction_request(transaction)?, None)
            .await
    }
}
