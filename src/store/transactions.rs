// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::model::Transaction;

use super::{Reducer, Request};

/// Transactions for whichever account is being looked at: the signed-in
/// customer, or a customer an administrator picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TransactionState {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) fetch: Request,
    pub(crate) create: Request,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TransactionAction {
    FetchStarted,
    FetchSucceeded(Vec<Transaction>),
    FetchFailed(String),
    CreateStarted,
    CreateSucceeded(Transaction),
    CreateFailed(String),
    Reset,
}

impl Reducer for TransactionState {
    type Action = TransactionAction;

    fn reduce(self, action: TransactionAction) -> Self {
        match action {
            TransactionAction::FetchStarted => Self {
                fetch: self.fetch.start(),
                ..self
            },
            TransactionAction::FetchSucceeded(transactions) => Self {
                transactions,
                fetch: self.fetch.succeed(),
                ..self
            },
            TransactionAction::FetchFailed(message) => Self {
                fetch: self.fetch.fail(message),
                ..self
            },
            TransactionAction::CreateStarted => Self {
                create: self.create.start(),
                ..self
            },
            TransactionAction::CreateSucceeded(transaction) => {
                let mut transactions = self.transactions;
                transactions.push(transaction);
                Self {
                    transactions,
                    create: self.create.succeed(),
                    ..self
                }
            }
            TransactionAction::CreateFailed(message) => Self {
                create: self.create.fail(message),
                ..self
            },
            TransactionAction::Reset => Self::default(),
        }
    }
}
