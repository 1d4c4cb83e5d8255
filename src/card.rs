use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{CardId, CardKind, DueDayPolicy};

/// a credit or debit card and its billing cycle configuration
///
/// Only constructible through [`CardBuilder`] or deserialization, both of
/// which validate, so the billing functions can take a `&Card` without
/// re-checking its days or limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct Card {
    id: CardId,
    name: String,
    bank: Option<String>,
    last_four: Option<String>,
    kind: CardKind,
    limit: Money,
    closing_day: u32,
    due_day: u32,
    corporate: bool,
    settlement_account_id: Option<String>,
    is_default: bool,
    active: bool,
    #[serde(skip_serializing)]
    due_offset_months: u32,
}

/// unvalidated card shape as stored by the application
#[derive(Debug, Clone, Deserialize)]
struct CardRecord {
    id: CardId,
    name: String,
    #[serde(default)]
    bank: Option<String>,
    #[serde(default)]
    last_four: Option<String>,
    kind: CardKind,
    #[serde(default)]
    limit: Money,
    closing_day: u32,
    due_day: u32,
    #[serde(default)]
    corporate: bool,
    #[serde(default)]
    settlement_account_id: Option<String>,
    #[serde(default)]
    is_default: bool,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<CardRecord> for Card {
    type Error = BillingError;

    fn try_from(record: CardRecord) -> Result<Self> {
        let mut builder = CardBuilder::new()
            .id(record.id)
            .name(record.name)
            .kind(record.kind)
            .limit(record.limit)
            .closing_day(record.closing_day)
            .due_day(record.due_day)
            .corporate(record.corporate)
            .default_card(record.is_default)
            .active(record.active);

        if let Some(bank) = record.bank {
            builder = builder.bank(bank);
        }
        if let Some(last_four) = record.last_four {
            builder = builder.last_four(last_four);
        }
        if let Some(account) = record.settlement_account_id {
            builder = builder.settlement_account(account);
        }

        builder.build()
    }
}

impl Card {
    pub fn builder() -> CardBuilder {
        CardBuilder::new()
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bank(&self) -> Option<&str> {
        self.bank.as_deref()
    }

    pub fn last_four(&self) -> Option<&str> {
        self.last_four.as_deref()
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    /// credit limit; zero for debit cards
    pub fn limit(&self) -> Money {
        self.limit
    }

    /// configured closing day, before clamping to short months
    pub fn closing_day(&self) -> u32 {
        self.closing_day
    }

    /// configured due day, before clamping to short months
    pub fn due_day(&self) -> u32 {
        self.due_day
    }

    /// months between a statement's close and its due date (0 or 1)
    pub fn due_offset_months(&self) -> u32 {
        self.due_offset_months
    }

    pub fn is_corporate(&self) -> bool {
        self.corporate
    }

    pub fn settlement_account_id(&self) -> Option<&str> {
        self.settlement_account_id.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// soft delete; cards with history are never removed
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn reactivate(&mut self) {
        self.active = true;
    }

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    pub fn change_limit(&mut self, limit: Money) -> Result<()> {
        validate_limit(self.kind, limit)?;
        self.limit = limit;
        Ok(())
    }

    /// change closing and due days, re-applying the due day policy
    pub fn change_cycle(
        &mut self,
        closing_day: u32,
        due_day: u32,
        policy: DueDayPolicy,
    ) -> Result<()> {
        self.due_offset_months = resolve_cycle(closing_day, due_day, policy)?;
        self.closing_day = closing_day;
        self.due_day = due_day;
        Ok(())
    }
}

fn validate_day(field: &'static str, day: u32) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(BillingError::InvalidDayOfMonth { field, day });
    }
    Ok(())
}

fn validate_limit(kind: CardKind, limit: Money) -> Result<()> {
    if limit.is_negative() || (kind == CardKind::Credit && limit.is_zero()) {
        return Err(BillingError::InvalidLimit { limit });
    }
    Ok(())
}

/// validate the cycle days and return the due offset in months
fn resolve_cycle(closing_day: u32, due_day: u32, policy: DueDayPolicy) -> Result<u32> {
    validate_day("closing_day", closing_day)?;
    validate_day("due_day", due_day)?;

    if due_day > closing_day {
        return Ok(0);
    }

    match policy {
        DueDayPolicy::RollForward => {
            warn!(
                closing_day,
                due_day, "due day does not follow closing day, statements fall due the next month"
            );
            Ok(1)
        }
        DueDayPolicy::Reject => Err(BillingError::DueBeforeClosing { closing_day, due_day }),
    }
}

/// builder for cards
#[derive(Debug, Default)]
pub struct CardBuilder {
    id: Option<CardId>,
    name: Option<String>,
    bank: Option<String>,
    last_four: Option<String>,
    kind: Option<CardKind>,
    limit: Option<Money>,
    closing_day: Option<u32>,
    due_day: Option<u32>,
    corporate: bool,
    settlement_account_id: Option<String>,
    is_default: bool,
    active: Option<bool>,
    policy: DueDayPolicy,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: CardId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }

    pub fn last_four(mut self, digits: impl Into<String>) -> Self {
        self.last_four = Some(digits.into());
        self
    }

    pub fn kind(mut self, kind: CardKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: Money) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn closing_day(mut self, day: u32) -> Self {
        self.closing_day = Some(day);
        self
    }

    pub fn due_day(mut self, day: u32) -> Self {
        self.due_day = Some(day);
        self
    }

    pub fn corporate(mut self, corporate: bool) -> Self {
        self.corporate = corporate;
        self
    }

    pub fn settlement_account(mut self, account_id: impl Into<String>) -> Self {
        self.settlement_account_id = Some(account_id.into());
        self
    }

    pub fn default_card(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn due_day_policy(mut self, policy: DueDayPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<Card> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(BillingError::InvalidCardField {
                field: "name",
                message: "name is required".to_string(),
            })?;

        if let Some(digits) = &self.last_four {
            if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(BillingError::InvalidCardField {
                    field: "last_four",
                    message: format!("expected four digits, got {:?}", digits),
                });
            }
        }

        let kind = self.kind.unwrap_or(CardKind::Credit);
        let limit = self.limit.unwrap_or(Money::ZERO);
        validate_limit(kind, limit)?;

        let closing_day = self.closing_day.ok_or(BillingError::InvalidCardField {
            field: "closing_day",
            message: "closing day is required".to_string(),
        })?;
        let due_day = self.due_day.ok_or(BillingError::InvalidCardField {
            field: "due_day",
            message: "due day is required".to_string(),
        })?;
        let due_offset_months = resolve_cycle(closing_day, due_day, self.policy)?;

        Ok(Card {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name,
            bank: self.bank,
            last_four: self.last_four,
            kind,
            limit,
            closing_day,
            due_day,
            corporate: self.corporate,
            settlement_account_id: self.settlement_account_id,
            is_default: self.is_default,
            active: self.active.unwrap_or(true),
            due_offset_months,
        })
    }
}
