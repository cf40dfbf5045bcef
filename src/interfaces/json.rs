use crate::domain::account::Account;
use crate::error::Result;
use crate::interfaces::csv::account_writer::AccountSummary;
use std::io::Write;

/// Account summaries as a pretty-printed JSON array.
pub fn write_accounts<'a, W: Write>(
    sink: W,
    accounts: impl IntoIterator<Item = &'a Account>,
) -> Result<()> {
    let rows: Vec<AccountSummary<'a>> = accounts.into_iter().map(AccountSummary::from).collect();
    serde_json::to_writer_pretty(sink, &rows)?;
    Ok(())
}

/// One account's ledger as a pretty-printed JSON array.
pub fn write_statement<W: Write>(sink: W, account: &Account) -> Result<()> {
    serde_json::to_writer_pretty(sink, account.transactions())?;
    Ok(())
}
