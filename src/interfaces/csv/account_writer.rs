use crate::domain::account::Account;
use crate::domain::money::Money;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One line of the end-of-run account summary.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountSummary<'a> {
    pub account: &'a str,
    pub owner: &'a str,
    pub balance: Money,
    pub transactions: usize,
}

impl<'a> From<&'a Account> for AccountSummary<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            account: account.number(),
            owner: account.owner(),
            balance: account.balance(),
            transactions: account.transactions().len(),
        }
    }
}

/// Writes account summaries and ledgers as CSV.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Header `account,owner,balance,transactions`, one row per account.
    pub fn write_accounts<'a>(&mut self, accounts: impl IntoIterator<Item = &'a Account>) -> Result<()> {
        for account in accounts {
            self.writer.serialize(AccountSummary::from(account))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Header `time,type,amount,balance,card,note`, one row per ledger entry.
    pub fn write_statement(&mut self, account: &Account) -> Result<()> {
        for tx in account.transactions() {
            self.writer.serialize(tx)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
