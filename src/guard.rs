// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Navigation targets and the checks that gate them.

use std::fmt;

use crate::store::SessionState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Route {
    Login,
    Dashboard,
    Purchase(u64),
    Transactions,
    NewPackage,
    EditPackage(u64),
    Customers,
}

/// Who may see a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Access {
    Public,
    Authenticated,
    Administrator,
}

impl Route {
    /// Resolves a path. Anything that is not a known route, including known
    /// routes with a malformed id, resolves to the dashboard.
    pub(crate) fn from_path(path: &str) -> Self {
        let segments = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["purchase", id] => id.parse().map_or(Self::Dashboard, Self::Purchase),
            ["transactions"] => Self::Transactions,
            ["package", "new"] => Self::NewPackage,
            ["package", "edit", id] => id.parse().map_or(Self::Dashboard, Self::EditPackage),
            ["customers"] => Self::Customers,
            _ => Self::Dashboard,
        }
    }

    pub(crate) const fn access(self) -> Access {
        match self {
            Self::Login => Access::Public,
            Self::Dashboard | Self::Purchase(_) | Self::Transactions => Access::Authenticated,
            Self::NewPackage | Self::EditPackage(_) | Self::Customers => Access::Administrator,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "/login"),
            Self::Dashboard => write!(f, "/dashboard"),
            Self::Purchase(id) => write!(f, "/purchase/{id}"),
            Self::Transactions => write!(f, "/transactions"),
            Self::NewPackage => write!(f, "/package/new"),
            Self::EditPackage(id) => write!(f, "/package/edit/{id}"),
            Self::Customers => write!(f, "/customers"),
        }
    }
}

pub(crate) fn is_authenticated(session: &SessionState) -> bool {
    session.current().is_some()
}

pub(crate) fn is_administrator(session: &SessionState) -> bool {
    session
        .current()
        .is_some_and(|principal| principal.role.can_manage_catalog())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Allow,
    Redirect(Route),
}

/// Decides whether the session may see `route`. Signed-out visitors are sent
/// to the login screen; signed-in visitors without the administrator role
/// are sent to the dashboard instead.
pub(crate) fn check(route: Route, session: &SessionState) -> Decision {
    match route.access() {
        Access::Public => Decision::Allow,
        Access::Authenticated | Access::Administrator if !is_authenticated(session) => {
            Decision::Redirect(Route::Login)
        }
        Access::Administrator if !is_administrator(session) => {
            Decision::Redirect(Route::Dashboard)
        }
        Access::Authenticated | Access::Administrator => Decision::Allow,
    }
}
