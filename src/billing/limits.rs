use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::card::Card;
use crate::config::BillingConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{BillingError, Result};
use crate::types::UtilizationState;

/// how much of a card's limit is committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditUtilization {
    pub limit: Money,
    /// current statement plus future installments
    pub used: Money,
    /// limit minus used; negative when over the limit
    pub available: Money,
    /// used / limit * 100, two decimal places; 0 when the limit is 0
    pub percent_used: Decimal,
}

impl CreditUtilization {
    /// used / limit as a ratio, zero when the card has no limit
    pub fn rate(&self) -> Rate {
        self.used.ratio_of(self.limit).unwrap_or(Rate::ZERO)
    }

    pub fn state(&self) -> UtilizationState {
        UtilizationState::from_rate(self.rate())
    }

    pub fn is_overlimit(&self) -> bool {
        self.available.is_negative()
    }
}

/// limit usage for a card given its open statement and remaining installments
pub fn credit_utilization(
    card: &Card,
    current_statement_total: Money,
    future_installments_total: Money,
) -> CreditUtilization {
    let limit = card.limit();
    let used = current_statement_total + future_installments_total;
    let percent_used = used
        .ratio_of(limit)
        .map(|rate| rate.as_rounded_percentage())
        .unwrap_or(Decimal::ZERO);

    CreditUtilization {
        limit,
        used,
        available: limit - used,
        percent_used,
    }
}

/// advisory outcome of a purchase check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDecision {
    pub approved: bool,
    /// rejection cause, or a warning on an approved purchase
    pub reason: Option<String>,
    pub available_limit: Money,
}

impl PurchaseDecision {
    /// approved but flagged for high utilization
    pub fn has_warning(&self) -> bool {
        self.approved && self.reason.is_some()
    }
}

/// check whether a purchase fits the card's available limit
///
/// Rejects when the purchase exceeds the available limit and warns when it
/// would push utilization above `config.utilization_warning_threshold`.
/// Nothing is debited; the caller decides what to do with the decision.
pub fn approve_purchase(
    card: &Card,
    purchase_value: Money,
    current_statement_total: Money,
    future_installments_total: Money,
    config: &BillingConfig,
) -> Result<PurchaseDecision> {
    if !purchase_value.is_positive() {
        return Err(BillingError::InvalidAmount { amount: purchase_value });
    }
    for amount in [current_statement_total, future_installments_total] {
        if amount.is_negative() {
            return Err(BillingError::InvalidAmount { amount });
        }
    }

    let utilization = credit_utilization(card, current_statement_total, future_installments_total);
    let available_limit = utilization.available;

    if available_limit < purchase_value {
        let shortfall = purchase_value - available_limit;
        warn!(
            card_id = %card.id(),
            purchase = %purchase_value,
            available = %available_limit,
            shortfall = %shortfall,
            "purchase rejected"
        );
        return Ok(PurchaseDecision {
            approved: false,
            reason: Some(format!(
                "insufficient limit: available {}, purchase {}, short by {}",
                available_limit, purchase_value, shortfall
            )),
            available_limit,
        });
    }

    let projected = (utilization.used + purchase_value)
        .ratio_of(utilization.limit)
        .unwrap_or(Rate::ZERO);
    let threshold = config.utilization_warning_threshold;

    let reason = if projected > threshold {
        warn!(
            card_id = %card.id(),
            projected = %projected,
            "purchase approved above warning threshold"
        );
        Some(format!(
            "purchase raises limit usage to {}, above the {} warning level",
            projected, threshold
        ))
    } else {
        debug!(card_id = %card.id(), projected = %projected, "purchase approved");
        None
    };

    Ok(PurchaseDecision {
        approved: true,
        reason,
        available_limit,
    })
}
