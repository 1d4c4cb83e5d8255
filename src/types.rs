use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Rate;

/// unique identifier for a card
pub type CardId = Uuid;

/// unique identifier for an installment transaction
pub type TransactionId = Uuid;

/// unique identifier for a derived statement
pub type StatementId = Uuid;

/// card instrument kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Credit,
    /// no meaningful credit limit
    Debit,
}

/// installment transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// installments still being billed
    #[serde(rename = "ativa")]
    Active,
    /// every installment billed
    #[serde(rename = "concluida")]
    Completed,
    /// voided before completion
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl InstallmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstallmentStatus::Completed | InstallmentStatus::Cancelled)
    }
}

/// statement lifecycle status, derived from the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementStatus {
    /// still accepting purchases
    #[serde(rename = "aberta")]
    Open,
    /// closed, awaiting payment
    #[serde(rename = "fechada")]
    Closed,
    /// past the due date
    #[serde(rename = "vencida")]
    Overdue,
}

/// how a card handles a due day that does not come after its closing day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DueDayPolicy {
    /// the statement falls due in the month after it closes
    #[default]
    RollForward,
    /// refuse the configuration
    Reject,
}

/// utilization bands for a credit limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilizationState {
    /// nothing used
    Unused,
    /// below 30%
    Low,
    /// 30% up to 70%
    Moderate,
    /// 70% up to 90%
    High,
    /// 90% through 100%
    Maxed,
    /// above the limit
    Overlimit,
}

impl UtilizationState {
    pub fn from_rate(rate: Rate) -> Self {
        if rate <= Rate::ZERO {
            UtilizationState::Unused
        } else if rate < Rate::from_percentage(30) {
            UtilizationState::Low
        } else if rate < Rate::from_percentage(70) {
            UtilizationState::Moderate
        } else if rate < Rate::from_percentage(90) {
            UtilizationState::High
        } else if rate <= Rate::from_percentage(100) {
            UtilizationState::Maxed
        } else {
            UtilizationState::Overlimit
        }
    }
}
