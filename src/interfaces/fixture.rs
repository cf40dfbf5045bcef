use crate::domain::account::Account;
use crate::domain::card::{Card, CardType};
use crate::domain::money::Money;
use crate::error::{AtmError, Result};
use serde::Deserialize;
use std::path::Path;

/// Accounts and cards to preload into an ATM, read from YAML.
///
/// ```yaml
/// accounts:
///   - number: "20208000100"
///     owner: Jasur
///     balance: 1000000
///     cards:
///       - number: "8600123456789012"
///         pin: "1234"
///         type: uzcard
///         expiry: "12/28"
/// ```
#[derive(Debug, Deserialize, PartialEq)]
pub struct BankFixture {
    pub accounts: Vec<AccountFixture>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AccountFixture {
    pub number: String,
    pub owner: String,
    #[serde(default)]
    pub balance: Money,
    #[serde(default)]
    pub cards: Vec<CardFixture>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct CardFixture {
    pub number: String,
    pub pin: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub expiry: String,
    pub daily_limit: Option<Money>,
}

impl BankFixture {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AtmError::Config(e.to_string()))
    }

    /// Issues every card and opens every account.
    ///
    /// Cards without their own limit get `default_daily_limit`.
    pub fn into_accounts(self, default_daily_limit: Money) -> Result<Vec<Account>> {
        self.accounts
            .into_iter()
            .map(|fixture| -> Result<Account> {
                let mut account = Account::new(fixture.number, fixture.owner, fixture.balance);
                for card in fixture.cards {
                    let daily_limit = card.daily_limit.unwrap_or(default_daily_limit);
                    if daily_limit < 0 {
                        return Err(AtmError::Config(format!(
                            "daily_limit for account {} must not be negative",
                            account.number()
                        )));
                    }
                    let issued = Card::new(card.number, card.pin, card.card_type, card.expiry)?
                        .with_daily_limit(daily_limit);
                    account.add_card(issued);
                }
                Ok(account)
            })
            .collect()
    }
}
