// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Result},
    storage::Storage,
    store::{SessionAction, SessionState, Store},
};

/// The only layout of the persisted session this build reads and writes.
pub(crate) const SCHEMA_VERSION: u32 = 1;

/// The persisted session record. The body stays untyped until the version
/// has been checked so that a record from another schema is rejected rather
/// than misread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Envelope {
    version: u32,
    session: serde_json::Value,
}

impl Envelope {
    pub(crate) fn seal(state: &SessionState) -> Result<Self> {
        Ok(Self {
            version: SCHEMA_VERSION,
            session: serde_json::to_value(state)?,
        })
    }

    pub(crate) fn open(self) -> Result<SessionState> {
        if self.version != SCHEMA_VERSION {
            return Err(error::Session::UnsupportedVersion(self.version, SCHEMA_VERSION).into());
        }

        let state: SessionState = serde_json::from_value(self.session)?;
        if !state.is_consistent() {
            return Err(error::Session::Inconsistent.into());
        }

        Ok(SessionState {
            pending: false,
            ..state
        })
    }
}

/// The session container together with the storage it is mirrored to.
pub(crate) struct SessionStore {
    store: Store<SessionState>,
    storage: Box<dyn Storage<Envelope>>,
}

impl SessionStore {
    /// Starts from the persisted session if there is a usable one. Anything
    /// unreadable is discarded and the session starts signed out.
    pub(crate) async fn restore(mut storage: Box<dyn Storage<Envelope>>) -> Self {
        let restored = storage
            .get()
            .await
            .and_then(|record| record.map(Envelope::open).transpose());
        let state = match restored {
            Ok(Some(state)) => {
                debug!("Restored the persisted session");
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!("Discarding the persisted session: {}", e);
                if let Err(e) = storage.clear().await {
                    warn!("We could not remove the persisted session: {}", e);
                }
                SessionState::default()
            }
        };

        Self {
            store: Store::new(state),
            storage,
        }
    }

    pub(crate) fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub(crate) fn is_persistent(&self) -> bool {
        self.storage.is_persistent()
    }

    /// Applies `action`, then writes a successful login to storage or
    /// removes the record on logout. Storage failures are logged; the
    /// in-memory session still changes.
    pub(crate) async fn dispatch(&mut self, action: SessionAction) {
        let persist = match &action {
            SessionAction::LoginSucceeded(_) => Some(true),
            SessionAction::Logout => Some(false),
            SessionAction::BeginLogin | SessionAction::LoginFailed(_) => None,
        };

        self.store.dispatch(action);

        let result = match persist {
            Some(true) => self.save().await,
            Some(false) => self.storage.clear().await,
            None => Ok(()),
        };
        if let Err(e) = result {
            warn!("We could not update the persisted session: {}", e);
        }
    }

    async fn save(&mut self) -> Result<()> {
        let envelope = Envelope::seal(self.store.state())?;
        self.storage.update(&envelope).await
    }
}
