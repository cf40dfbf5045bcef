//! Domain model: cards, accounts and their ledger entries.
//!
//! Types here hold state and enforce their own local invariants (PIN lockout,
//! append-only ledgers). Cross-entity business rules live in the application
//! layer.

pub mod account;
pub mod card;
pub mod money;
pub mod operation;
pub mod ports;
pub mod transaction;
