use crate::config::{AtmConfig, COMMISSION_RATE, WITHDRAW_LIMIT, WITHDRAW_MULTIPLE};
use crate::domain::account::{Account, CardHandle};
use crate::domain::money::{Money, commission, format_money};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Business-rule parameters for [`AccountService`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceLimits {
    pub withdraw_limit: Money,
    pub withdraw_multiple: Money,
    pub commission_rate: Decimal,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            withdraw_limit: WITHDRAW_LIMIT,
            withdraw_multiple: WITHDRAW_MULTIPLE,
            commission_rate: COMMISSION_RATE,
        }
    }
}

impl From<&AtmConfig> for ServiceLimits {
    fn from(config: &AtmConfig) -> Self {
        Self {
            withdraw_limit: config.withdraw_limit,
            withdraw_multiple: config.withdraw_multiple,
            commission_rate: config.commission_rate,
        }
    }
}

/// Validates and executes money movements against accounts and their cards.
///
/// The service holds no session state: every call names the accounts and card
/// it works on. Each operation runs all of its checks before touching anything,
/// so a rejected call leaves balances, card counters and ledgers untouched.
#[derive(Debug, Default, Clone)]
pub struct AccountService {
    limits: ServiceLimits,
}

impl AccountService {
    pub fn new(limits: ServiceLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ServiceLimits {
        &self.limits
    }

    /// Cash withdrawal through `card`.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// amount shape, balance, per-transaction cap, card daily limit.
    pub fn withdraw(
        &self,
        account: &mut Account,
        card: CardHandle,
        amount: Money,
    ) -> Result<String> {
        let masked = {
            let spending_card = account.card(card).ok_or_else(|| {
                AtmError::Authentication("card does not belong to this account".to_string())
            })?;

            if amount <= 0 || amount % self.limits.withdraw_multiple != 0 {
                return Err(AtmError::InvalidAmount(format!(
                    "amount must be a multiple of {}",
                    format_money(self.limits.withdraw_multiple)
                )));
            }
            if amount > account.balance() {
                return Err(AtmError::InsufficientFunds("insufficient funds".to_string()));
            }
            if amount > self.limits.withdraw_limit {
                return Err(AtmError::LimitExceeded("maximum limit exceeded".to_string()));
            }
            if !spending_card.can_spend(amount) {
                return Err(AtmError::LimitExceeded("daily limit exhausted".to_string()));
            }
            spending_card.masked()
        };

        account.withdraw(amount);
        if let Some(spending_card) = account.card_mut(card) {
            spending_card.spend(amount);
        }
        self.log(account, TransactionKind::Withdrawal, -amount, Some(masked), "");

        info!(account = account.number(), amount, "withdrawal completed");
        Ok(format!("{} withdrawn", format_money(amount)))
    }

    /// Credits `amount` to `account`.
    ///
    /// Any amount is accepted, zero and negatives included; the only rejection
    /// is a resulting balance outside the `Money` range.
    pub fn deposit(&self, account: &mut Account, amount: Money) -> Result<String> {
        account.balance().checked_add(amount).ok_or_else(out_of_range)?;

        account.deposit(amount);
        self.log(account, TransactionKind::Deposit, amount, None, "");

        info!(account = account.number(), amount, "deposit completed");
        Ok(format!("{} deposited", format_money(amount)))
    }

    /// Moves `amount` from `sender` to `receiver`.
    ///
    /// The sender also pays the commission, which is credited to no account.
    pub fn transfer(
        &self,
        sender: &mut Account,
        receiver: &mut Account,
        amount: Money,
        note: &str,
    ) -> Result<String> {
        let fee = commission(amount, self.limits.commission_rate);
        let total = amount.checked_add(fee).ok_or_else(out_of_range)?;
        debug!(amount, fee, total, "transfer requested");

        if total > sender.balance() {
            return Err(AtmError::InsufficientFunds(
                "insufficient funds including commission".to_string(),
            ));
        }
        sender.balance().checked_sub(total).ok_or_else(out_of_range)?;
        receiver.balance().checked_add(amount).ok_or_else(out_of_range)?;

        sender.withdraw(total);
        receiver.deposit(amount);

        let recipient = receiver.owner().to_string();
        self.log(sender, TransactionKind::TransferOut { recipient }, -total, None, note);
        self.log(receiver, TransactionKind::TransferIn, amount, None, "");

        info!(
            from = sender.number(),
            to = receiver.number(),
            amount,
            fee,
            "transfer completed"
        );
        Ok("transfer completed".to_string())
    }

    fn log(
        &self,
        account: &mut Account,
        kind: TransactionKind,
        amount: Money,
        card: Option<String>,
        note: &str,
    ) {
        let tx = Transaction::new(kind, amount, account.balance(), card, note);
        account.add_transaction(tx);
    }
}

fn out_of_range() -> AtmError {
    AtmError::InvalidAmount("amount is out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{Card, CardType};

    fn funded(balance: Money, daily_limit: Money) -> (Account, CardHandle) {
        let mut account = Account::new("20208000100", "Jasur", balance);
        let card = Card::new("8600123456789012", "1234", CardType::Uzcard, "12/28")
            .unwrap()
            .with_daily_limit(daily_limit);
        let handle = account.add_card(card);
        (account, handle)
    }

    #[test]
    fn test_withdraw_success() {
        let service = AccountService::default();
        let (mut account, card) = funded(1_000_000, 5_000_000);

        let msg = service.withdraw(&mut account, card, 150_000).unwrap();
        assert_eq!(msg, "150,000 withdrawn");
        assert_eq!(account.balance(), 850_000);
        assert_eq!(account.card(card).unwrap().used_today(), 150_000);

        let tx = &account.transactions()[0];
        assert_eq!(tx.kind(), &TransactionKind::Withdrawal);
        assert_eq!(tx.amount(), -150_000);
        assert_eq!(tx.balance_after(), 850_000);
        assert_eq!(tx.card(), "8600 **** **** 9012");
    }

    #[test]
    fn test_withdraw_rejects_bad_multiples() {
        let service = AccountService::default();
        let (mut account, card) = funded(1_000_000, 5_000_000);
        let before = account.clone();

        for amount in [15_000, 1, 9_999, 0, -10_000] {
            let err = service.withdraw(&mut account, card, amount).unwrap_err();
            assert!(matches!(err, AtmError::InvalidAmount(_)));
            assert_eq!(err.to_string(), "amount must be a multiple of 10,000");
        }
        assert_eq!(account, before);
    }

    #[test]
    fn test_withdraw_check_order() {
        let service = AccountService::default();

        // Too large and over balance: balance check comes first.
        let (mut account, card) = funded(1_000_000, 10_000_000);
        let err = service.withdraw(&mut account, card, 3_000_000).unwrap_err();
        assert_eq!(err.to_string(), "insufficient funds");

        // Over cap and over daily limit: cap comes first.
        let (mut account, card) = funded(10_000_000, 1_000_000);
        let err = service.withdraw(&mut account, card, 2_010_000).unwrap_err();
        assert_eq!(err.to_string(), "maximum limit exceeded");

        // Not a multiple and over balance: shape comes first.
        let (mut account, card) = funded(0, 0);
        let err = service.withdraw(&mut account, card, 15_000).unwrap_err();
        assert!(matches!(err, AtmError::InvalidAmount(_)));
    }

    #[test]
    fn test_withdraw_daily_limit() {
        let service = AccountService::default();
        let (mut account, card) = funded(10_000_000, 3_000_000);

        service.withdraw(&mut account, card, 2_000_000).unwrap();
        let before = account.clone();
        let err = service.withdraw(&mut account, card, 1_010_000).unwrap_err();
        assert!(matches!(err, AtmError::LimitExceeded(_)));
        assert_eq!(err.to_string(), "daily limit exhausted");
        assert_eq!(account, before);

        service.withdraw(&mut account, card, 1_000_000).unwrap();
        assert_eq!(account.card(card).unwrap().remaining_today(), 0);
    }

    #[test]
    fn test_withdraw_with_foreign_handle() {
        let service = AccountService::default();
        let (mut other, _) = funded(1_000_000, 5_000_000);
        let second = other.add_card(
            Card::new("9860123456789012", "4321", CardType::Humo, "06/27").unwrap(),
        );
        let (mut account, _) = funded(1_000_000, 5_000_000);

        let err = service.withdraw(&mut account, second, 10_000).unwrap_err();
        assert!(matches!(err, AtmError::Authentication(_)));
        assert_eq!(account.balance(), 1_000_000);
    }

    #[test]
    fn test_deposit_is_unvalidated() {
        let service = AccountService::default();
        let (mut account, _) = funded(0, 0);

        assert_eq!(service.deposit(&mut account, 15_500).unwrap(), "15,500 deposited");
        service.deposit(&mut account, -500).unwrap();
        assert_eq!(account.balance(), 15_000);
        assert_eq!(account.transactions().len(), 2);
        assert_eq!(account.transactions()[0].card(), "N/A");
    }

    #[test]
    fn test_transfer_charges_commission_to_sender() {
        let service = AccountService::default();
        let mut sender = Account::new("20208000100", "Jasur", 500_000);
        let mut receiver = Account::new("20208000200", "Aziza", 0);

        let msg = service
            .transfer(&mut sender, &mut receiver, 100_000, "rent")
            .unwrap();
        assert_eq!(msg, "transfer completed");
        assert_eq!(sender.balance(), 399_000);
        assert_eq!(receiver.balance(), 100_000);

        let out = &sender.transactions()[0];
        assert_eq!(out.kind().to_string(), "transfer → Aziza");
        assert_eq!(out.amount(), -101_000);
        assert_eq!(out.note(), "rent");

        let incoming = &receiver.transactions()[0];
        assert_eq!(incoming.kind(), &TransactionKind::TransferIn);
        assert_eq!(incoming.amount(), 100_000);
        assert_eq!(incoming.note(), "");
    }

    #[test]
    fn test_transfer_needs_room_for_commission() {
        let service = AccountService::default();
        let mut sender = Account::new("20208000100", "Jasur", 100_000);
        let mut receiver = Account::new("20208000200", "Aziza", 0);
        let (sender_before, receiver_before) = (sender.clone(), receiver.clone());

        let err = service
            .transfer(&mut sender, &mut receiver, 100_000, "")
            .unwrap_err();
        assert!(matches!(err, AtmError::InsufficientFunds(_)));
        assert_eq!(err.to_string(), "insufficient funds including commission");
        assert_eq!(sender, sender_before);
        assert_eq!(receiver, receiver_before);
    }

    #[test]
    fn test_transfer_ignores_withdraw_multiple() {
        let service = AccountService::default();
        let mut sender = Account::new("20208000100", "Jasur", 10_000);
        let mut receiver = Account::new("20208000200", "Aziza", 0);

        service.transfer(&mut sender, &mut receiver, 1_234, "").unwrap();
        assert_eq!(sender.balance(), 10_000 - 1_246);
        assert_eq!(receiver.balance(), 1_234);
    }

    #[test]
    fn test_custom_limits() {
        let service = AccountService::new(ServiceLimits {
            withdraw_limit: 50_000,
            withdraw_multiple: 5_000,
            commission_rate: Decimal::ZERO,
        });
        let (mut account, card) = funded(1_000_000, 5_000_000);

        service.withdraw(&mut account, card, 45_000).unwrap();
        let err = service.withdraw(&mut account, card, 55_000).unwrap_err();
        assert_eq!(err.to_string(), "maximum limit exceeded");
        let err = service.withdraw(&mut account, card, 1_000).unwrap_err();
        assert_eq!(err.to_string(), "amount must be a multiple of 5,000");
    }

    #[test]
    fn test_deposit_overflow_is_rejected() {
        let service = AccountService::default();
        let mut account = Account::new("20208000100", "Jasur", 1);
        let before = account.clone();

        let err = service.deposit(&mut account, Money::MAX).unwrap_err();
        assert!(matches!(err, AtmError::InvalidAmount(_)));
        assert_eq!(err.to_string(), "amount is out of range");
        assert_eq!(account, before);

        let mut overdrawn = Account::new("20208000200", "Aziza", -1);
        assert!(service.deposit(&mut overdrawn, Money::MIN).is_err());
        assert_eq!(overdrawn.balance(), -1);

        service.deposit(&mut account, Money::MAX - 1).unwrap();
        assert_eq!(account.balance(), Money::MAX);
    }

    #[test]
    fn test_transfer_overflow_is_rejected() {
        let service = AccountService::default();

        // A negative transfer credits the sender.
        let mut sender = Account::new("20208000100", "Jasur", Money::MAX - 10);
        let mut receiver = Account::new("20208000200", "Aziza", 0);
        let (sender_before, receiver_before) = (sender.clone(), receiver.clone());
        let err = service
            .transfer(&mut sender, &mut receiver, -1_000, "")
            .unwrap_err();
        assert_eq!(err.to_string(), "amount is out of range");
        assert_eq!(sender, sender_before);
        assert_eq!(receiver, receiver_before);

        let mut sender = Account::new("20208000100", "Jasur", 1_000_000);
        let mut receiver = Account::new("20208000200", "Aziza", Money::MAX - 5);
        let (sender_before, receiver_before) = (sender.clone(), receiver.clone());
        let err = service
            .transfer(&mut sender, &mut receiver, 100, "")
            .unwrap_err();
        assert!(matches!(err, AtmError::InvalidAmount(_)));
        assert_eq!(sender, sender_before);
        assert_eq!(receiver, receiver_before);
    }

    #[test]
    fn test_withdraw_huge_amount_does_not_overflow_daily_counter() {
        let service = AccountService::new(ServiceLimits {
            withdraw_limit: Money::MAX,
            withdraw_multiple: 1,
            commission_rate: Decimal::ZERO,
        });
        let (mut account, card) = funded(Money::MAX, 5_000_000);
        service.withdraw(&mut account, card, 10).unwrap();
        service.deposit(&mut account, 10).unwrap();

        let err = service.withdraw(&mut account, card, Money::MAX).unwrap_err();
        assert_eq!(err.to_string(), "daily limit exhausted");
    }
}
