use crate::domain::money::{Money, format_money};
use crate::error::{AtmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Consecutive wrong PINs after which a card is blocked for good.
pub const MAX_PIN_TRIES: u8 = 3;

/// Daily spending cap applied to freshly issued cards.
pub const DEFAULT_DAILY_LIMIT: Money = 5_000_000;

/// Shortest card number accepted at issuance.
pub const MIN_CARD_NUMBER_LEN: usize = 16;

const MASK: &str = " **** **** ";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Uzcard,
    Humo,
    Visa,
    Mastercard,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CardType::Uzcard => "UZCARD",
            CardType::Humo => "HUMO",
            CardType::Visa => "VISA",
            CardType::Mastercard => "MASTERCARD",
        };
        f.write_str(label)
    }
}

/// PIN lockout state. `Blocked` is terminal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinState {
    Active { tries: u8 },
    Blocked,
}

/// A PIN-protected spending instrument bound to one account.
///
/// The full card number and the PIN never leave this type through the public
/// API; callers only ever see [`Card::masked`].
#[derive(PartialEq, Eq, Clone)]
pub struct Card {
    number: String,
    pin: String,
    card_type: CardType,
    expiry: String,
    pin_state: PinState,
    daily_limit: Money,
    used_today: Money,
}

const PIN_IN_NUMBER: &str = "PIN must differ from the visible card digits";

/// Returns true when `pin` is exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit())
}

/// A PIN equal to the first or last four digits would appear in [`Card::masked`].
fn shown_when_masked(number: &str, pin: &str) -> bool {
    number.starts_with(pin) || number.ends_with(pin)
}

impl Card {
    /// Issues a new card with no failed attempts and nothing spent.
    pub fn new(
        number: impl Into<String>,
        pin: impl Into<String>,
        card_type: CardType,
        expiry: impl Into<String>,
    ) -> Result<Self> {
        let number = number.into();
        let pin = pin.into();

        if number.len() < MIN_CARD_NUMBER_LEN || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AtmError::InvalidCard(format!(
                "card number must be at least {MIN_CARD_NUMBER_LEN} digits"
            )));
        }
        if !is_valid_pin(&pin) {
            return Err(AtmError::InvalidPinFormat("PIN must be 4 digits".to_string()));
        }
        if shown_when_masked(&number, &pin) {
            return Err(AtmError::InvalidPinFormat(PIN_IN_NUMBER.to_string()));
        }

        Ok(Self {
            number,
            pin,
            card_type,
            expiry: expiry.into(),
            pin_state: PinState::Active { tries: 0 },
            daily_limit: DEFAULT_DAILY_LIMIT,
            used_today: 0,
        })
    }

    pub fn with_daily_limit(mut self, daily_limit: Money) -> Self {
        self.daily_limit = daily_limit;
        self
    }

    /// Full number, only for indexing inside the crate.
    pub(crate) fn number(&self) -> &str {
        &self.number
    }

    /// First four and last four digits with the middle masked out.
    pub fn masked(&self) -> String {
        let tail = &self.number[self.number.len() - 4..];
        format!("{}{MASK}{tail}", &self.number[..4])
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn pin_state(&self) -> PinState {
        self.pin_state
    }

    pub fn is_blocked(&self) -> bool {
        self.pin_state == PinState::Blocked
    }

    /// Consecutive failed attempts; a blocked card reports the maximum.
    pub fn pin_tries(&self) -> u8 {
        match self.pin_state {
            PinState::Active { tries } => tries,
            PinState::Blocked => MAX_PIN_TRIES,
        }
    }

    pub fn daily_limit(&self) -> Money {
        self.daily_limit
    }

    pub fn used_today(&self) -> Money {
        self.used_today
    }

    pub fn remaining_today(&self) -> Money {
        self.daily_limit - self.used_today
    }

    /// Checks `pin` and records the attempt.
    ///
    /// A match resets the failure counter. A mismatch increments it and blocks
    /// the card once it reaches [`MAX_PIN_TRIES`]. A blocked card never verifies.
    pub fn verify_pin(&mut self, pin: &str) -> bool {
        let tries = match self.pin_state {
            PinState::Blocked => return false,
            PinState::Active { tries } => tries,
        };

        if pin == self.pin {
            self.pin_state = PinState::Active { tries: 0 };
            return true;
        }

        let tries = tries + 1;
        if tries >= MAX_PIN_TRIES {
            self.pin_state = PinState::Blocked;
            warn!(card = %self.masked(), "card blocked after {tries} failed PIN attempts");
        } else {
            self.pin_state = PinState::Active { tries };
        }
        false
    }

    /// Replaces the PIN after verifying the old one.
    ///
    /// The old-PIN check counts as a regular attempt, so a wrong `old` moves the
    /// card closer to being blocked.
    pub fn change_pin(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.verify_pin(old) {
            return Err(AtmError::Authentication("old PIN incorrect".to_string()));
        }
        if !is_valid_pin(new) {
            return Err(AtmError::InvalidPinFormat("PIN must be 4 digits".to_string()));
        }
        if shown_when_masked(&self.number, new) {
            return Err(AtmError::InvalidPinFormat(PIN_IN_NUMBER.to_string()));
        }
        self.pin = new.to_string();
        Ok(())
    }

    pub fn can_spend(&self, amount: Money) -> bool {
        self.used_today
            .checked_add(amount)
            .is_some_and(|total| total <= self.daily_limit)
    }

    /// Adds `amount` to today's spending without any check.
    ///
    /// Callers must confirm [`Card::can_spend`] first.
    pub fn spend(&mut self, amount: Money) {
        self.used_today += amount;
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("number", &self.masked())
            .field("card_type", &self.card_type)
            .field("expiry", &self.expiry)
            .field("pin_state", &self.pin_state)
            .field("daily_limit", &format_money(self.daily_limit))
            .field("used_today", &format_money(self.used_today))
            .finish()
    }
}
