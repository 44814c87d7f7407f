// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use log::{debug, warn};
use rand::RngCore as _;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq as _;

use crate::{client::Client, error::Result, model::Principal};

const SALT_LEN: usize = 16;

/// A salted SHA-256 digest of an account password.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Credential {
    #[serde_as(as = "Base64")]
    salt: Vec<u8>,
    #[serde_as(as = "Base64")]
    digest: Vec<u8>,
}

impl Credential {
    pub(crate) fn generate(password: &SecretString) -> Self {
        let mut salt = vec![0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(salt, password)
    }

    pub(crate) fn with_salt(salt: Vec<u8>, password: &SecretString) -> Self {
        let digest = Self::digest(&salt, password);
        Self { salt, digest }
    }

    fn digest(salt: &[u8], password: &SecretString) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.expose_secret().as_bytes());
        hasher.finalize().to_vec()
    }

    pub(crate) fn verify(&self, password: &SecretString) -> bool {
        Self::digest(&self.salt, password)
            .as_slice()
            .ct_eq(&self.digest)
            .into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").finish_non_exhaustive()
    }
}

/// An account record as the backend stores it.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Account {
    #[serde(flatten)]
    pub(crate) principal: Principal,
    #[serde(default)]
    pub(crate) credential: Option<Credential>,
}

/// Checks a username and password and names the account they belong to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Authenticator: Send + Sync {
    /// Returns `None` when the pair does not match an account.
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Principal>>;
}

/// Looks accounts up in the backend's user directory and verifies their
/// stored credential.
pub(crate) struct DirectoryAuthenticator {
    client: Arc<dyn Client>,
}

impl DirectoryAuthenticator {
    pub(crate) fn new(client: Arc<dyn Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Authenticator for DirectoryAuthenticator {
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Principal>> {
        let account = self
            .client
            .find_accounts(username)
            .await?
            .into_iter()
            .find(|account| account.principal.username == username);

        let Some(account) = account else {
            debug!("No account is named {}", username.escape_default());
            return Ok(None);
        };

        match account.credential {
            Some(credential) if credential.verify(password) => Ok(Some(account.principal)),
            Some(_) => Ok(None),
            None => {
                warn!(
                    "Account {} has no stored credential, so nobody can sign in as it",
                    username.escape_default()
                );
                Ok(None)
            }
        }
    }
}
