use crate::application::service::AccountService;
use crate::domain::account::{Account, CardHandle};
use crate::domain::card::Card;
use crate::domain::money::{Money, format_money};
use crate::domain::operation::{Operation, OperationType};
use crate::domain::ports::AccountStore;
use crate::domain::transaction::Transaction;
use crate::error::{AtmError, Result};
use crate::infrastructure::in_memory::InMemoryAccountStore;
use std::collections::HashMap;
use tracing::{info, warn};

/// The authenticated account/card pair of a logged-in customer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Session {
    account: String,
    card: CardHandle,
}

impl Session {
    pub fn account_number(&self) -> &str {
        &self.account
    }

    pub fn card(&self) -> CardHandle {
        self.card
    }
}

/// A single ATM: the registry of known accounts and cards plus at most one
/// authenticated session.
///
/// Customer operations (`withdraw`, `transfer`, ...) act on the current
/// session and fail with [`AtmError::Authentication`] when nobody is logged in.
pub struct AtmSession<S: AccountStore = InMemoryAccountStore> {
    service: AccountService,
    store: S,
    cards: HashMap<String, (String, CardHandle)>,
    current: Option<Session>,
}

impl AtmSession {
    pub fn new(service: AccountService) -> Self {
        Self::with_store(service, InMemoryAccountStore::new())
    }
}

impl Default for AtmSession {
    fn default() -> Self {
        Self::new(AccountService::default())
    }
}

impl<S: AccountStore> AtmSession<S> {
    /// Builds an ATM over `store`, indexing the cards of any accounts it holds.
    pub fn with_store(service: AccountService, store: S) -> Self {
        let mut cards = HashMap::new();
        for account in store.all_accounts() {
            index_cards(&mut cards, account);
        }
        Self {
            service,
            store,
            cards,
            current: None,
        }
    }

    /// Makes `account` and its cards known to this ATM.
    ///
    /// Registering an account number again replaces the earlier account and
    /// drops those of its cards that still point at it from the index.
    pub fn register(&mut self, account: Account) {
        let number = account.number().to_string();
        index_cards(&mut self.cards, &account);

        if let Some(previous) = self.store.store(account) {
            let current_numbers: Vec<String> = self
                .store
                .get(&number)
                .map(|a| a.cards().iter().map(|c| c.number().to_string()).collect())
                .unwrap_or_default();
            for card in previous.cards() {
                let indexed_here = self
                    .cards
                    .get(card.number())
                    .is_some_and(|(account, _)| *account == number);
                if indexed_here && !current_numbers.iter().any(|n| n == card.number()) {
                    self.cards.remove(card.number());
                }
            }
            if self.current.as_ref().is_some_and(|s| s.account == number) {
                self.current = None;
            }
            warn!(account = %number, "account re-registered, previous entry replaced");
        }
        info!(account = %number, "account registered");
    }

    /// Authenticates `card_number` with `pin` and opens a session on success.
    ///
    /// Unknown card numbers fail without touching any card's PIN counter.
    /// A failed attempt leaves the current session as it was.
    pub fn login(&mut self, card_number: &str, pin: &str) -> bool {
        let Some((account_number, handle)) = self.cards.get(card_number).cloned() else {
            warn!("login with unknown card");
            return false;
        };
        let Some(card) = self
            .store
            .get_mut(&account_number)
            .and_then(|account| account.card_mut(handle))
        else {
            return false;
        };

        if card.verify_pin(pin) {
            info!(card = %card.masked(), "login succeeded");
            self.current = Some(Session {
                account: account_number,
                card: handle,
            });
            true
        } else {
            warn!(card = %card.masked(), tries = card.pin_tries(), "login failed");
            false
        }
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current
            .as_ref()
            .and_then(|session| self.store.get(&session.account))
    }

    pub fn current_card(&self) -> Option<&Card> {
        let session = self.current.as_ref()?;
        self.store.get(&session.account)?.card(session.card)
    }

    pub fn account(&self, number: &str) -> Option<&Account> {
        self.store.get(number)
    }

    pub fn accounts(&self) -> Vec<&Account> {
        self.store.all_accounts()
    }

    pub fn service(&self) -> &AccountService {
        &self.service
    }

    pub fn withdraw(&mut self, amount: Money) -> Result<String> {
        let session = self.require_session()?.clone();
        let account = account_mut(&mut self.store, &session)?;
        self.service.withdraw(account, session.card, amount)
    }

    pub fn deposit(&mut self, amount: Money) -> Result<String> {
        let session = self.require_session()?.clone();
        let account = account_mut(&mut self.store, &session)?;
        self.service.deposit(account, amount)
    }

    /// Transfers from the session's account to account `to`.
    pub fn transfer(&mut self, to: &str, amount: Money, note: &str) -> Result<String> {
        let session = self.require_session()?.clone();
        if session.account == to {
            return Err(AtmError::InvalidOperation(
                "cannot transfer to the same account".to_string(),
            ));
        }
        if self.store.get(to).is_none() {
            return Err(AtmError::InvalidOperation(format!(
                "recipient account {to} not found"
            )));
        }
        let (sender, receiver) = self
            .store
            .get_pair_mut(&session.account, to)
            .ok_or_else(|| AtmError::Authentication("session account not found".to_string()))?;
        self.service.transfer(sender, receiver, amount, note)
    }

    pub fn change_pin(&mut self, old: &str, new: &str) -> Result<String> {
        let session = self.require_session()?.clone();
        let card = account_mut(&mut self.store, &session)?
            .card_mut(session.card)
            .ok_or_else(|| AtmError::Authentication("session card not found".to_string()))?;
        card.change_pin(old, new)?;
        info!(card = %card.masked(), "PIN changed");
        Ok("PIN changed".to_string())
    }

    pub fn balance(&self) -> Result<Money> {
        self.current_account()
            .map(Account::balance)
            .ok_or_else(no_session)
    }

    pub fn statement(&self) -> Result<&[Transaction]> {
        self.current_account()
            .map(Account::transactions)
            .ok_or_else(no_session)
    }

    /// Applies one scripted operation and returns its confirmation message.
    pub fn process(&mut self, op: Operation) -> Result<String> {
        match op.op {
            OperationType::Login => {
                let card = op.require_card()?;
                if self.login(card, op.require_pin()?) {
                    let masked = self.current_card().map(Card::masked).unwrap_or_default();
                    Ok(format!("card {masked} authenticated"))
                } else {
                    Err(AtmError::Authentication("invalid card or PIN".to_string()))
                }
            }
            OperationType::Logout => {
                self.logout();
                Ok("session closed".to_string())
            }
            OperationType::Withdraw => self.withdraw(op.require_amount()?),
            OperationType::Deposit => self.deposit(op.require_amount()?),
            OperationType::Transfer => {
                let note = op.note.as_deref().unwrap_or_default();
                self.transfer(op.require_recipient()?, op.require_amount()?, note)
            }
            OperationType::ChangePin => self.change_pin(op.require_pin()?, op.require_new_pin()?),
            OperationType::Balance => Ok(format!("balance: {}", format_money(self.balance()?))),
        }
    }

    fn require_session(&self) -> Result<&Session> {
        self.current.as_ref().ok_or_else(no_session)
    }
}

fn index_cards(cards: &mut HashMap<String, (String, CardHandle)>, account: &Account) {
    for (handle, card) in account.card_handles() {
        cards.insert(
            card.number().to_string(),
            (account.number().to_string(), handle),
        );
    }
}

fn account_mut<'a, S: AccountStore>(store: &'a mut S, session: &Session) -> Result<&'a mut Account> {
    store
        .get_mut(&session.account)
        .ok_or_else(|| AtmError::Authentication("session account not found".to_string()))
}

fn no_session() -> AtmError {
    AtmError::Authentication("no active session".to_string())
}
