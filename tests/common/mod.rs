#![allow(dead_code)]

use atm_core::domain::account::{Account, CardHandle};
use atm_core::domain::card::{Card, CardType};
use atm_core::domain::money::Money;
use std::io::Write;
use tempfile::NamedTempFile;

pub const CARD_NUMBER: &str = "8600123456789012";
pub const PIN: &str = "1234";

/// An account holding one Uzcard with the given daily limit.
pub fn account_with_card(balance: Money, daily_limit: Money) -> (Account, CardHandle) {
    let mut account = Account::new("20208000100", "Jasur", balance);
    let card = Card::new(CARD_NUMBER, PIN, CardType::Uzcard, "12/28")
        .unwrap()
        .with_daily_limit(daily_limit);
    let handle = account.add_card(card);
    (account, handle)
}

pub fn ledger_sum(account: &Account) -> Money {
    account.transactions().iter().map(|t| t.amount()).sum()
}

pub fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();
    file
}

pub const BANK_YAML: &str = r#"
accounts:
  - number: "20208000100"
    owner: Jasur
    balance: 1000000
    cards:
      - number: "8600123456789012"
        pin: "1234"
        type: uzcard
        expiry: "12/28"
  - number: "20208000200"
    owner: Aziza
    balance: 0
"#;
