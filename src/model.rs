// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub(crate) enum Role {
    #[default]
    Customer = 0,
    Administrator = 1,
}

impl Role {
    /// Whether this role may create, edit and delete packages and browse
    /// other accounts. This is the only capability that differs between
    /// roles.
    pub(crate) const fn can_manage_catalog(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "Customer"),
            Self::Administrator => write!(f, "Administrator"),
        }
    }
}

/// The account a session is signed in as. Credentials never appear here.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Principal {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) id: u64,
    pub(crate) username: String,
    #[serde(rename = "name")]
    pub(crate) display_name: String,
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) role: Role,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Package {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) price: u64,
    #[serde(rename = "data")]
    pub(crate) allowance: String,
    #[serde(rename = "duration")]
    pub(crate) validity: String,
    #[serde(default)]
    pub(crate) description: String,
}

/// The body sent when creating or replacing a package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct PackageDraft {
    pub(crate) name: String,
    pub(crate) price: u64,
    #[serde(rename = "data")]
    pub(crate) allowance: String,
    #[serde(rename = "duration")]
    pub(crate) validity: String,
    pub(crate) description: String,
}

impl From<Package> for PackageDraft {
    fn from(value: Package) -> Self {
        Self {
            name: value.name,
            price: value.price,
            allowance: value.allowance,
            validity: value.validity,
            description: value.description,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub(crate) enum TransactionStatus {
    Completed,
    Failed,
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        if value == "completed" {
            Self::Completed
        } else {
            Self::Failed
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Ids may arrive as numbers or as numeric strings, depending on how the
/// backend stored the record.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Transaction {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) id: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) user_id: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) package_id: u64,
    pub(crate) date: DateTime<Utc>,
    pub(crate) status: TransactionStatus,
    pub(crate) total: u64,
}

/// The body sent when recording a purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewTransaction {
    pub(crate) user_id: u64,
    pub(crate) package_id: u64,
    pub(crate) date: DateTime<Utc>,
    pub(crate) status: TransactionStatus,
    pub(crate) total: u64,
}

impl NewTransaction {
    /// A completed purchase of `package` by `principal`, charged at the
    /// package's current price.
    pub(crate) fn purchase(principal: &Principal, package: &Package, date: DateTime<Utc>) -> Self {
        Self {
            user_id: principal.id,
            package_id: package.id,
            date,
            status: TransactionStatus::Completed,
            total: package.price,
        }
    }
}

/// Formats an amount in whole rupiah with dot-separated thousands.
pub(crate) fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_test::{assert_de_tokens, assert_ser_tokens, assert_tokens, Token};

    use super::*;

    #[test]
    fn role_is_a_number() {
        assert_tokens(&Role::Customer, &[Token::U8(0)]);
        assert_tokens(&Role::Administrator, &[Token::U8(1)]);
    }

    #[test]
    fn only_administrators_manage_the_catalog() {
        assert!(Role::Administrator.can_manage_catalog());
        assert!(!Role::Customer.can_manage_catalog());
    }

    #[test]
    fn principal_without_role_is_a_customer() -> serde_json::Result<()> {
        let principal: Principal = serde_json::from_str(
            r#"{"id": 4, "username": "budi", "name": "Budi", "email": "budi@example.com"}"#,
        )?;

        assert_eq!(principal.role, Role::Customer);
        assert_eq!(principal.display_name, "Budi");
        Ok(())
    }

    #[test]
    fn principal_ignores_credentials_in_the_account_record() -> serde_json::Result<()> {
        let principal: Principal = serde_json::from_str(
            r#"{"id": 1, "username": "admin", "name": "Admin", "email": "a@example.com", "role": 1, "password": "hunter2"}"#,
        )?;

        let json = serde_json::to_value(&principal)?;
        assert!(json.get("password").is_none());
        assert_eq!(principal.role, Role::Administrator);
        Ok(())
    }

    #[test]
    fn numeric_string_ids_are_accepted() -> serde_json::Result<()> {
        let transaction: Transaction = serde_json::from_str(
            r#"{"id": "12", "userId": "2", "packageId": 3, "date": "2024-03-05T10:00:00Z", "status": "completed", "total": 25000}"#,
        )?;

        assert_eq!(
            (transaction.id, transaction.user_id, transaction.package_id),
            (12, 2, 3)
        );
        assert_eq!(serde_json::to_value(&transaction)?["id"], serde_json::json!(12));
        Ok(())
    }

    #[test]
    fn opaque_ids_are_rejected() {
        let transaction = serde_json::from_str::<Transaction>(
            r#"{"id": "c3f1", "userId": 2, "packageId": 3, "date": "2024-03-05T10:00:00Z", "status": "completed", "total": 25000}"#,
        );

        assert!(transaction.is_err());
    }

    #[test]
    fn demo_backend_records_decode() -> serde_json::Result<()> {
        #[derive(Deserialize)]
        struct Seed {
            users: Vec<crate::auth::Account>,
            packages: Vec<Package>,
            transactions: Vec<Transaction>,
        }

        let seed: Seed = serde_json::from_str(include_str!("../demos/db.json"))?;

        assert!(seed
            .users
            .iter()
            .any(|account| account.principal.role == Role::Administrator));
        assert!(!seed.packages.is_empty());
        assert!(seed.transactions.iter().all(|transaction| seed
            .packages
            .iter()
            .any(|package| package.id == transaction.package_id)));
        Ok(())
    }

    #[test]
    fn status_other_than_completed_is_failed() {
        assert_de_tokens(&TransactionStatus::Completed, &[Token::Str("completed")]);
        assert_de_tokens(&TransactionStatus::Failed, &[Token::Str("failed")]);
        assert_de_tokens(&TransactionStatus::Failed, &[Token::Str("pending")]);
        assert_ser_tokens(
            &TransactionStatus::Completed,
            &[Token::UnitVariant {
                name: "TransactionStatus",
                variant: "completed",
            }],
        );
    }

    #[test]
    fn package_uses_backend_field_names() -> serde_json::Result<()> {
        let package: Package = serde_json::from_str(
            r#"{"id": 2, "name": "Combo", "price": 50000, "data": "10GB", "duration": "30 days"}"#,
        )?;

        assert_eq!(package.allowance, "10GB");
        assert_eq!(package.validity, "30 days");
        assert_eq!(package.description, "");

        let draft = serde_json::to_value(PackageDraft::from(package))?;
        assert_eq!(
            draft,
            serde_json::json!({
                "name": "Combo",
                "price": 50000,
                "data": "10GB",
                "duration": "30 days",
                "description": "",
            })
        );
        Ok(())
    }

    #[test]
    fn purchase_charges_the_package_price() -> serde_json::Result<()> {
        let principal = Principal {
            id: 7,
            username: "siti".to_owned(),
            display_name: "Siti".to_owned(),
            email: "siti@example.com".to_owned(),
            role: Role::Customer,
        };
        let package = Package {
            id: 3,
            name: "Daily".to_owned(),
            price: 15000,
            allowance: "2GB".to_owned(),
            validity: "1 day".to_owned(),
            description: String::new(),
        };
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).single();

        let body = serde_json::to_value(NewTransaction::purchase(
            &principal,
            &package,
            date.unwrap_or_default(),
        ))?;

        assert_eq!(
            body,
            serde_json::json!({
                "userId": 7,
                "packageId": 3,
                "date": "2024-05-01T08:30:00Z",
                "status": "completed",
                "total": 15000,
            })
        );
        Ok(())
    }

    #[test]
    fn prices_group_thousands() {
        assert_eq!(format_price(0), "Rp 0");
        assert_eq!(format_price(999), "Rp 999");
        assert_eq!(format_price(1000), "Rp 1.000");
        assert_eq!(format_price(150_000), "Rp 150.000");
        assert_eq!(format_price(1_250_000), "Rp 1.250.000");
    }
}
