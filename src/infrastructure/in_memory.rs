use crate::domain::account::Account;
use crate::domain::ports::AccountStore;
use std::collections::BTreeMap;

/// In-memory account registry.
///
/// Backed by a `BTreeMap` so iteration and reports come out ordered by
/// account number.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: BTreeMap<String, Account>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn store(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.number().to_string(), account)
    }

    fn get(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    fn get_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    fn get_pair_mut(&mut self, first: &str, second: &str) -> Option<(&mut Account, &mut Account)> {
        let mut a = None;
        let mut b = None;
        for (number, account) in self.accounts.iter_mut() {
            if number == first {
                a = Some(account);
            } else if number == second {
                b = Some(account);
            }
        }
        a.zip(b)
    }

    fn all_accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }
}
