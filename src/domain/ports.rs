use super::account::Account;

/// Storage for the accounts an ATM knows about, keyed by account number.
pub trait AccountStore {
    /// Inserts or replaces an account, returning the one it displaced.
    fn store(&mut self, account: Account) -> Option<Account>;
    fn get(&self, number: &str) -> Option<&Account>;
    fn get_mut(&mut self, number: &str) -> Option<&mut Account>;
    /// Mutable access to two distinct accounts at once.
    ///
    /// Returns `None` if either is missing or both numbers are the same.
    fn get_pair_mut(&mut self, first: &str, second: &str) -> Option<(&mut Account, &mut Account)>;
    /// All accounts ordered by account number.
    fn all_accounts(&self) -> Vec<&Account>;
}
