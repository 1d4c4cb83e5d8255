use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::InstallmentStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("invalid {field}: day of month {day} is outside 1..=31")]
    InvalidDayOfMonth {
        field: &'static str,
        day: u32,
    },

    #[error("invalid credit limit: {limit}")]
    InvalidLimit {
        limit: Money,
    },

    #[error("invalid card field {field}: {message}")]
    InvalidCardField {
        field: &'static str,
        message: String,
    },

    #[error("due day {due_day} does not fall after closing day {closing_day}")]
    DueBeforeClosing {
        closing_day: u32,
        due_day: u32,
    },

    #[error("invalid statement month key: {input:?} (expected YYYY-MM)")]
    InvalidMonthKey {
        input: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid installment count: {count} (maximum {maximum})")]
    InvalidInstallmentCount {
        count: u32,
        maximum: u32,
    },

    #[error("invalid installment index: {current} of {total}")]
    InvalidInstallmentIndex {
        current: u32,
        total: u32,
    },

    #[error("installments do not reconcile: {installment} x {count} against total {total}")]
    InstallmentMismatch {
        installment: Money,
        count: u32,
        total: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("transaction {id} is {status:?} and can no longer change")]
    TransactionClosed {
        id: Uuid,
        status: InstallmentStatus,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl BillingError {
    pub(crate) fn invalid_date(date: NaiveDate, message: &str) -> Self {
        BillingError::InvalidDate {
            message: format!("{}: {}", date, message),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
