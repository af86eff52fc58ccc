use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::types::{Account, AccountRecord, AccountType, Amount, CardId};

/// Store account information to settle ATM requests
///
/// Every operation authenticates first. A card that does not exist and a PIN that does not match
/// produce the same error so that callers cannot probe for valid card identifiers.
pub trait AccountStore {
    /// Look up the current balance of a sub-account
    fn balance(&self, card: &str, pin: &str, account_type: &str) -> Result<Amount>;

    /// Add the given amount to a sub-account and return the new balance
    fn add_to_balance(
        &mut self,
        card: &str,
        pin: &str,
        account_type: &str,
        amount: Amount,
    ) -> Result<Amount>;

    /// Take the given amount from a sub-account and return the new balance
    /// Fails without any change if the balance does not cover the amount.
    fn withdraw_from_balance(
        &mut self,
        card: &str,
        pin: &str,
        account_type: &str,
        amount: Amount,
    ) -> Result<Amount>;
}

#[derive(Debug, PartialEq)]
struct CardData {
    pin: String,
    balances: HashMap<AccountType, Amount>,
}

impl CardData {
    fn authenticate(&self, card: &str, pin: &str) -> Result<()> {
        if self.pin != pin {
            return Err(incorrect_card_or_pin(card));
        }
        Ok(())
    }
}

fn incorrect_card_or_pin(card: &str) -> anyhow::Error {
    anyhow!("Incorrect card name or PIN (card = {})", card)
}

fn unknown_account_type(card: &str, account_type: &str) -> anyhow::Error {
    anyhow!(
        "Incorrect account type specified (card = {}, account = {})",
        card,
        account_type
    )
}

/// A simple RAM-backed account store using a standard Rust `HashMap`
pub struct HashMapAccountStore {
    data_store: HashMap<CardId, CardData>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self {
            data_store: HashMap::new(),
        }
    }

    /// Build a store from the records of a loaded ledger
    pub fn from_records(records: HashMap<CardId, AccountRecord>) -> Self {
        let data_store = records
            .into_iter()
            .map(|(card, record)| {
                (
                    card,
                    CardData {
                        pin: record.pin,
                        balances: record.accounts,
                    },
                )
            })
            .collect();
        Self { data_store }
    }

    /// Number of cards in the store
    pub fn len(&self) -> usize {
        self.data_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_store.is_empty()
    }

    fn balance_mut(&mut self, card: &str, pin: &str, account_type: &str) -> Result<&mut Amount> {
        let data = self
            .data_store
            .get_mut(card)
            .ok_or_else(|| incorrect_card_or_pin(card))?;
        data.authenticate(card, pin)?;
        data.balances
            .get_mut(account_type)
            .ok_or_else(|| unknown_account_type(card, account_type))
    }
}

impl Default for HashMapAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a HashMapAccountStore {
    type Item = Account;

    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.data_store.iter().flat_map(|(card, data)| {
            data.balances
                .iter()
                .map(move |(account_type, balance)| Account {
                    card: card.clone(),
                    account_type: account_type.clone(),
                    balance: *balance,
                })
        }))
    }
}

impl AccountStore for HashMapAccountStore {
    fn balance(&self, card: &str, pin: &str, account_type: &str) -> Result<Amount> {
        let data = self
            .data_store
            .get(card)
            .ok_or_else(|| incorrect_card_or_pin(card))?;
        data.authenticate(card, pin)?;
        data.balances
            .get(account_type)
            .copied()
            .ok_or_else(|| unknown_account_type(card, account_type))
    }

    fn add_to_balance(
        &mut self,
        card: &str,
        pin: &str,
        account_type: &str,
        amount: Amount,
    ) -> Result<Amount> {
        let balance = self.balance_mut(card, pin, account_type)?;

        let new_amount = balance.checked_add(amount).ok_or_else(|| {
            anyhow!(
                "Deposit would overflow the balance (card = {}, account = {})",
                card,
                account_type
            )
        })?;
        *balance = new_amount;
        Ok(new_amount)
    }

    fn withdraw_from_balance(
        &mut self,
        card: &str,
        pin: &str,
        account_type: &str,
        amount: Amount,
    ) -> Result<Amount> {
        let balance = self.balance_mut(card, pin, account_type)?;

        let new_amount = balance.checked_sub(amount).ok_or_else(|| {
            anyhow!(
                "The amount being withdrawn is bigger than the existing balance (card = {}, account = {})",
                card,
                account_type
            )
        })?;
        *balance = new_amount;
        Ok(new_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_single_card() -> HashMapAccountStore {
        let mut records = HashMap::new();
        records.insert(
            "card_one".to_string(),
            AccountRecord {
                pin: "1234".to_string(),
                accounts: vec![("checking".to_string(), 500), ("saving".to_string(), 9000)]
                    .into_iter()
                    .collect(),
            },
        );
        HashMapAccountStore::from_records(records)
    }

    fn sorted_entries(store: &HashMapAccountStore) -> Vec<Account> {
        let mut entries: Vec<_> = store.into_iter().collect();
        entries.sort();
        entries
    }

    #[test]
    fn empty_store() {
        let store = HashMapAccountStore::new();
        assert!(store.is_empty());
        assert_eq!(store.into_iter().count(), 0);
        store.balance("card_one", "1234", "checking").unwrap_err();
    }

    #[test]
    fn iterate_all_sub_accounts() {
        let store = store_with_single_card();

        assert_eq!(store.len(), 1);
        assert_eq!(
            sorted_entries(&store),
            vec![
                Account {
                    card: "card_one".to_string(),
                    account_type: "checking".to_string(),
                    balance: 500,
                },
                Account {
                    card: "card_one".to_string(),
                    account_type: "saving".to_string(),
                    balance: 9000,
                },
            ]
        );
    }

    #[test]
    fn balance_of_existing_account() {
        let store = store_with_single_card();
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 500);
        assert_eq!(store.balance("card_one", "1234", "saving").unwrap(), 9000);
    }

    #[test]
    fn unknown_card_and_wrong_pin_look_the_same() {
        let store = store_with_single_card();

        let unknown_card = store.balance("card_two", "1234", "checking").unwrap_err();
        let wrong_pin = store.balance("card_one", "3333", "checking").unwrap_err();
        assert!(unknown_card.to_string().starts_with("Incorrect card name or PIN"));
        assert!(wrong_pin.to_string().starts_with("Incorrect card name or PIN"));
    }

    #[test]
    fn pin_must_match_exactly() {
        let store = store_with_single_card();
        store.balance("card_one", "1234 ", "checking").unwrap_err();
        store.balance("card_one", "01234", "checking").unwrap_err();
        store.balance("card_one", "", "checking").unwrap_err();
    }

    #[test]
    fn unknown_account_type() {
        let store = store_with_single_card();
        let err = store.balance("card_one", "1234", "brokerage").unwrap_err();
        assert!(err.to_string().starts_with("Incorrect account type"));
    }

    #[test]
    fn deposit_increases_balance() {
        let mut store = store_with_single_card();

        let new_amount = store
            .add_to_balance("card_one", "1234", "checking", 500)
            .unwrap();
        assert_eq!(new_amount, 1000);
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 1000);
        assert_eq!(store.balance("card_one", "1234", "saving").unwrap(), 9000);
    }

    #[test]
    fn deposit_with_wrong_pin() {
        let mut store = store_with_single_card();

        store
            .add_to_balance("card_one", "0000", "checking", 500)
            .unwrap_err();
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 500);
    }

    #[test]
    fn deposit_overflow() {
        let mut store = store_with_single_card();

        store
            .add_to_balance("card_one", "1234", "checking", Amount::MAX)
            .unwrap_err();
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 500);
    }

    #[test]
    fn withdraw_partial_amount() {
        let mut store = store_with_single_card();

        let new_amount = store
            .withdraw_from_balance("card_one", "1234", "checking", 200)
            .unwrap();
        assert_eq!(new_amount, 300);
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 300);
    }

    #[test]
    fn withdraw_entire_balance() {
        let mut store = store_with_single_card();

        let new_amount = store
            .withdraw_from_balance("card_one", "1234", "checking", 500)
            .unwrap();
        assert_eq!(new_amount, 0);
    }

    #[test]
    fn withdraw_more_than_available() {
        let mut store = store_with_single_card();

        store
            .withdraw_from_balance("card_one", "1234", "checking", 501)
            .unwrap_err();
        assert_eq!(store.balance("card_one", "1234", "checking").unwrap(), 500);
    }

    #[test]
    fn withdraw_from_unknown_account_type() {
        let mut store = store_with_single_card();

        store
            .withdraw_from_balance("card_one", "1234", "brokerage", 1)
            .unwrap_err();
        assert_eq!(store.into_iter().count(), 2);
    }
}
