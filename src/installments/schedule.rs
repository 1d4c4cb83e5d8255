use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::add_months_rollover;
use crate::config::INSTALLMENT_COUNT_CEILING;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};

/// installment dates, one calendar month apart, starting at `first_date`
///
/// Each date is [`add_months_rollover`] of the previous one, so a schedule
/// starting on the 31st drifts into the next month after a short month and
/// stays there.
pub fn generate_installment_dates(first_date: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count.min(INSTALLMENT_COUNT_CEILING) as usize);
    let mut current = first_date;
    for _ in 0..count {
        dates.push(current);
        current = add_months_rollover(current, 1);
    }
    dates
}

/// one installment of a split purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInstallment {
    pub number: u32,
    pub date: NaiveDate,
    pub value: Money,
}

/// a purchase split into installments that sum exactly to its total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total: Money,
    /// value of every installment except possibly the last
    pub regular_value: Money,
    pub installments: Vec<PlannedInstallment>,
}

impl InstallmentPlan {
    /// split `total` into `count` installments rounded down to the cent;
    /// the last one absorbs the remainder
    pub fn split(total: Money, count: u32, first_date: NaiveDate) -> Result<Self> {
        if !total.is_positive() {
            return Err(BillingError::InvalidAmount { amount: total });
        }
        if count == 0 || count > INSTALLMENT_COUNT_CEILING {
            return Err(BillingError::InvalidInstallmentCount {
                count,
                maximum: INSTALLMENT_COUNT_CEILING,
            });
        }

        let regular_value = total.split_floor(count);
        let remainder = total - regular_value.times(count);

        let installments = generate_installment_dates(first_date, count)
            .into_iter()
            .zip(1..)
            .map(|(date, number)| PlannedInstallment {
                number,
                date,
                value: if number == count { regular_value + remainder } else { regular_value },
            })
            .collect();

        Ok(Self {
            total,
            regular_value,
            installments,
        })
    }

    pub fn count(&self) -> u32 {
        self.installments.len() as u32
    }

    pub fn get(&self, number: u32) -> Option<&PlannedInstallment> {
        number
            .checked_sub(1)
            .and_then(|index| self.installments.get(index as usize))
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.date)
    }

    /// sum of all installment values
    pub fn planned_total(&self) -> Money {
        self.installments.iter().map(|i| i.value).sum()
    }
}
