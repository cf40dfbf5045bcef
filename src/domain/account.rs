use crate::domain::card::Card;
use crate::domain::money::Money;
use crate::domain::transaction::Transaction;
use chrono::{DateTime, Local};

/// Position of a card inside its owning account.
///
/// Cards never move or get removed once added, so a handle stays valid for the
/// lifetime of the account it came from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct CardHandle(usize);

/// A balance-holding account with its cards and an append-only ledger.
///
/// The balance can only change through the crate's service layer; the
/// `deposit`/`withdraw` primitives here apply no business rules at all.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Account {
    number: String,
    owner: String,
    balance: Money,
    opening_balance: Money,
    cards: Vec<Card>,
    transactions: Vec<Transaction>,
    opened: DateTime<Local>,
}

impl Account {
    pub fn new(number: impl Into<String>, owner: impl Into<String>, balance: Money) -> Self {
        Self {
            number: number.into(),
            owner: owner.into(),
            balance,
            opening_balance: balance,
            cards: Vec::new(),
            transactions: Vec::new(),
            opened: Local::now(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Balance at the moment the account was opened.
    pub fn opening_balance(&self) -> Money {
        self.opening_balance
    }

    pub fn opened(&self) -> DateTime<Local> {
        self.opened
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add_card(&mut self, card: Card) -> CardHandle {
        self.cards.push(card);
        CardHandle(self.cards.len() - 1)
    }

    pub fn card(&self, handle: CardHandle) -> Option<&Card> {
        self.cards.get(handle.0)
    }

    pub fn card_mut(&mut self, handle: CardHandle) -> Option<&mut Card> {
        self.cards.get_mut(handle.0)
    }

    pub(crate) fn card_handles(&self) -> impl Iterator<Item = (CardHandle, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| (CardHandle(i), card))
    }

    pub(crate) fn deposit(&mut self, amount: Money) {
        self.balance += amount;
    }

    pub(crate) fn withdraw(&mut self, amount: Money) {
        self.balance -= amount;
    }

    pub(crate) fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}
