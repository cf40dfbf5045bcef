use crate::domain::money::Money;
use crate::error::{AtmError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Login,
    Logout,
    Withdraw,
    Deposit,
    Transfer,
    ChangePin,
    Balance,
}

/// One scripted ATM action, as read from an operations CSV.
///
/// Which columns are required depends on `op`; the `require_*` helpers turn a
/// missing cell into an [`AtmError::InvalidOperation`].
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Operation {
    pub op: OperationType,
    pub card: Option<String>,
    pub pin: Option<String>,
    pub amount: Option<Money>,
    pub to: Option<String>,
    pub new_pin: Option<String>,
    pub note: Option<String>,
}

impl Operation {
    pub fn new(op: OperationType) -> Self {
        Self {
            op,
            card: None,
            pin: None,
            amount: None,
            to: None,
            new_pin: None,
            note: None,
        }
    }

    pub fn require_amount(&self) -> Result<Money> {
        self.amount.ok_or_else(|| self.missing("amount"))
    }

    pub fn require_card(&self) -> Result<&str> {
        self.card.as_deref().ok_or_else(|| self.missing("card"))
    }

    pub fn require_pin(&self) -> Result<&str> {
        self.pin.as_deref().ok_or_else(|| self.missing("pin"))
    }

    pub fn require_new_pin(&self) -> Result<&str> {
        self.new_pin.as_deref().ok_or_else(|| self.missing("new_pin"))
    }

    pub fn require_recipient(&self) -> Result<&str> {
        self.to.as_deref().ok_or_else(|| self.missing("to"))
    }

    fn missing(&self, field: &str) -> AtmError {
        AtmError::InvalidOperation(format!("{:?} requires `{field}`", self.op))
    }
}
