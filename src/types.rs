use std::collections::HashMap;

pub type CardId = String;

pub type Pin = String;

pub type AccountType = String;

/// Whole currency units, a balance can never drop below zero
pub type Amount = u64;

/// Everything the ledger knows about a single card, as loaded at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub pin: Pin,
    pub accounts: HashMap<AccountType, Amount>,
}

/// Read-only snapshot of one sub-account of a card
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Account {
    pub card: CardId,
    pub account_type: AccountType,
    pub balance: Amount,
}

/// Identifies a sub-account and proves access to it
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub card: CardId,
    pub pin: Pin,
    pub account_type: AccountType,
}

impl Credentials {
    pub fn new(card: &str, pin: &str, account_type: &str) -> Self {
        Self {
            card: card.to_string(),
            pin: pin.to_string(),
            account_type: account_type.to_string(),
        }
    }
}

/// An action requested at the machine
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    SeeBalance(Credentials),
    Deposit(Credentials, Amount),
    Withdraw(Credentials, Amount),
}

/// What came of a `Request`, the reason for a failure is deliberately not exposed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Balance(Amount),
    Deposited(Amount),
    Withdrew(Amount),
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        *self != Outcome::Failed
    }
}
