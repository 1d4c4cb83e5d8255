use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{BillingConfig, INSTALLMENT_COUNT_CEILING};
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::installments::schedule::{generate_installment_dates, InstallmentPlan};
use crate::types::{CardId, InstallmentStatus, TransactionId};

/// purchase details supplied when a card purchase is registered
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub card_id: CardId,
    pub description: String,
    pub total_value: Money,
    pub installment_count: u32,
    pub purchase_date: NaiveDate,
    /// defaults to the purchase date
    pub first_installment_date: Option<NaiveDate>,
}

/// a purchase split into equal installments on one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct InstallmentTransaction {
    id: TransactionId,
    #[serde(rename = "descricao")]
    description: String,
    #[serde(rename = "valor_total")]
    total_value: Money,
    #[serde(rename = "valor_parcela")]
    installment_value: Money,
    #[serde(rename = "total_parcelas")]
    installment_count: u32,
    #[serde(rename = "parcela_atual")]
    current_installment: u32,
    #[serde(rename = "data_compra")]
    purchase_date: NaiveDate,
    #[serde(rename = "data_primeira_parcela")]
    first_installment_date: NaiveDate,
    #[serde(rename = "cartao_id")]
    card_id: CardId,
    status: InstallmentStatus,
}

/// stored transaction shape, validated on the way in
#[derive(Debug, Clone, Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    #[serde(rename = "descricao", default)]
    description: String,
    #[serde(rename = "valor_total")]
    total_value: Money,
    #[serde(rename = "valor_parcela")]
    installment_value: Money,
    #[serde(rename = "total_parcelas")]
    installment_count: u32,
    #[serde(rename = "parcela_atual")]
    current_installment: u32,
    #[serde(rename = "data_compra")]
    purchase_date: NaiveDate,
    #[serde(rename = "data_primeira_parcela")]
    first_installment_date: NaiveDate,
    #[serde(rename = "cartao_id")]
    card_id: CardId,
    status: InstallmentStatus,
}

impl TryFrom<TransactionRecord> for InstallmentTransaction {
    type Error = BillingError;

    fn try_from(r: TransactionRecord) -> Result<Self> {
        let transaction = InstallmentTransaction {
            id: r.id,
            description: r.description,
            total_value: r.total_value,
            installment_value: r.installment_value,
            installment_count: r.installment_count,
            current_installment: r.current_installment,
            purchase_date: r.purchase_date,
            first_installment_date: r.first_installment_date,
            card_id: r.card_id,
            status: r.status,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

impl InstallmentTransaction {
    /// register a new purchase, starting at installment 1 with status `ativa`
    pub fn from_purchase(purchase: NewPurchase, config: &BillingConfig) -> Result<Self> {
        if purchase.installment_count == 0 || purchase.installment_count > config.max_installments {
            return Err(BillingError::InvalidInstallmentCount {
                count: purchase.installment_count,
                maximum: config.max_installments,
            });
        }

        let first_installment_date = purchase
            .first_installment_date
            .unwrap_or(purchase.purchase_date);
        let plan = InstallmentPlan::split(
            purchase.total_value,
            purchase.installment_count,
            first_installment_date,
        )?;

        let transaction = InstallmentTransaction {
            id: Uuid::new_v4(),
            description: purchase.description,
            total_value: purchase.total_value,
            installment_value: plan.regular_value,
            installment_count: purchase.installment_count,
            current_installment: 1,
            purchase_date: purchase.purchase_date,
            first_installment_date,
            card_id: purchase.card_id,
            status: InstallmentStatus::Active,
        };
        transaction.validate()?;

        debug!(
            transaction_id = %transaction.id,
            card_id = %transaction.card_id,
            total = %transaction.total_value,
            installments = transaction.installment_count,
            "installment purchase registered"
        );

        Ok(transaction)
    }

    fn validate(&self) -> Result<()> {
        if !self.total_value.is_positive() {
            return Err(BillingError::InvalidAmount { amount: self.total_value });
        }
        if !self.installment_value.is_positive() {
            return Err(BillingError::InvalidAmount { amount: self.installment_value });
        }
        if self.installment_count == 0 || self.installment_count > INSTALLMENT_COUNT_CEILING {
            return Err(BillingError::InvalidInstallmentCount {
                count: self.installment_count,
                maximum: INSTALLMENT_COUNT_CEILING,
            });
        }
        if self.current_installment == 0 || self.current_installment > self.installment_count {
            return Err(BillingError::InvalidInstallmentIndex {
                current: self.current_installment,
                total: self.installment_count,
            });
        }
        if self.status == InstallmentStatus::Completed
            && self.current_installment != self.installment_count
        {
            return Err(BillingError::InvalidInstallmentIndex {
                current: self.current_installment,
                total: self.installment_count,
            });
        }
        if self.first_installment_date < self.purchase_date {
            return Err(BillingError::invalid_date(
                self.first_installment_date,
                "first installment before purchase date",
            ));
        }

        // rounding may leave up to one currency unit on the last installment
        let drift = (self.installment_value.times(self.installment_count) - self.total_value).abs();
        if drift > Money::ONE {
            return Err(BillingError::InstallmentMismatch {
                installment: self.installment_value,
                count: self.installment_count,
                total: self.total_value,
            });
        }

        Ok(())
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total_value(&self) -> Money {
        self.total_value
    }

    pub fn installment_value(&self) -> Money {
        self.installment_value
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    /// 1-based index of the installment currently being billed
    pub fn current_installment(&self) -> u32 {
        self.current_installment
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    pub fn first_installment_date(&self) -> NaiveDate {
        self.first_installment_date
    }

    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    pub fn status(&self) -> InstallmentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == InstallmentStatus::Active
    }

    /// installments after the current one
    pub fn remaining_installments(&self) -> u32 {
        self.installment_count - self.current_installment
    }

    /// value of the installments after the current one
    pub fn remaining_value(&self) -> Money {
        self.installment_value.times(self.remaining_installments())
    }

    /// dates of every installment
    pub fn schedule(&self) -> Vec<NaiveDate> {
        generate_installment_dates(self.first_installment_date, self.installment_count)
    }

    /// exact split of the total, last installment carrying the rounding
    pub fn plan(&self) -> Result<InstallmentPlan> {
        InstallmentPlan::split(
            self.total_value,
            self.installment_count,
            self.first_installment_date,
        )
    }

    fn ensure_open(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(BillingError::TransactionClosed {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// mark the current installment paid; completes after the last one
    pub fn advance(&mut self) -> Result<InstallmentStatus> {
        self.ensure_open()?;

        if self.current_installment < self.installment_count {
            self.current_installment += 1;
        } else {
            self.status = InstallmentStatus::Completed;
            debug!(transaction_id = %self.id, "installment transaction completed");
        }

        Ok(self.status)
    }

    /// void the remaining installments
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.status = InstallmentStatus::Cancelled;
        debug!(
            transaction_id = %self.id,
            remaining = %self.remaining_value(),
            "installment transaction cancelled"
        );
        Ok(())
    }
}
