//! Application layer containing the ATM business logic orchestration.
//!
//! `AccountService` enforces the money-movement rules and `AtmSession` ties
//! card authentication to the account a customer is working on.

pub mod service;
pub mod session;
