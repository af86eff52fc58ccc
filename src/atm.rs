use anyhow::Result;
use log::{info, warn};
use std::path::Path;

use crate::account_store::{AccountStore, HashMapAccountStore};
use crate::json_parser::load_ledger;
use crate::types::{Account, Amount, Outcome, Request};

/// Settles balance inquiries, deposits and withdrawals against an account store
///
/// None of the operations fail loudly: every problem (bad credentials, unknown account type,
/// insufficient funds) turns into `false` or `None`, the reason is only logged.
pub struct Atm<S = HashMapAccountStore> {
    account_store: S,
}

impl<'a> IntoIterator for &'a Atm<HashMapAccountStore> {
    type Item = Account;

    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.account_store.into_iter()
    }
}

impl Atm<HashMapAccountStore> {
    /// Create a machine backed by the JSON ledger at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let store = HashMapAccountStore::from_records(load_ledger(path)?);
        info!("ATM ready with {} cards", store.len());
        Ok(Self::new(store))
    }
}

impl<S: AccountStore> Atm<S> {
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    /// Check that the card exists, the PIN matches and the card has the given account type
    pub fn validate(&self, card: &str, pin: &str, account_type: &str) -> bool {
        self.get_balance(card, pin, account_type).is_some()
    }

    pub fn deposit(&mut self, card: &str, pin: &str, account_type: &str, amount: Amount) -> bool {
        let result = self
            .account_store
            .add_to_balance(card, pin, account_type, amount);
        settle(result).is_some()
    }

    /// Only succeeds if the current balance covers `amount`
    pub fn withdraw(&mut self, card: &str, pin: &str, account_type: &str, amount: Amount) -> bool {
        let result = self
            .account_store
            .withdraw_from_balance(card, pin, account_type, amount);
        settle(result).is_some()
    }

    pub fn get_balance(&self, card: &str, pin: &str, account_type: &str) -> Option<Amount> {
        settle(self.account_store.balance(card, pin, account_type))
    }

    /// Handle a single request as entered at the machine
    pub fn handle(&mut self, request: &Request) -> Outcome {
        match request {
            Request::SeeBalance(c) => self
                .get_balance(&c.card, &c.pin, &c.account_type)
                .map_or(Outcome::Failed, Outcome::Balance),
            Request::Deposit(c, amount) => {
                if self.deposit(&c.card, &c.pin, &c.account_type, *amount) {
                    Outcome::Deposited(*amount)
                } else {
                    Outcome::Failed
                }
            }
            Request::Withdraw(c, amount) => {
                if self.withdraw(&c.card, &c.pin, &c.account_type, *amount) {
                    Outcome::Withdrew(*amount)
                } else {
                    Outcome::Failed
                }
            }
        }
    }

    /// Handle all given requests in order
    pub fn handle_requests<'r>(
        &mut self,
        requests: impl IntoIterator<Item = &'r Request>,
    ) -> Vec<Outcome> {
        requests
            .into_iter()
            .map(|request| self.handle(request))
            .collect()
    }
}

fn settle(result: Result<Amount>) -> Option<Amount> {
    result.map_err(|err| warn!("{}", err)).ok()
}
