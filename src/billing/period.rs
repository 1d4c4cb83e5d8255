use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;
use crate::card::Card;

/// boundary dates of one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    /// first purchase date billed on this statement
    pub open: NaiveDate,
    /// last purchase date billed on this statement
    pub close: NaiveDate,
    pub due: NaiveDate,
}

impl StatementPeriod {
    /// whether a purchase on `date` is billed on this statement
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.open <= date && date <= self.close
    }
}

/// statement a purchase is billed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementAssignment {
    pub statement_month: MonthKey,
    /// purchase made after the closing day of its own month
    pub is_next_statement: bool,
}

/// statement month for a purchase made on `purchase_date`
pub fn statement_key_for_purchase(card: &Card, purchase_date: NaiveDate) -> StatementAssignment {
    let month = MonthKey::of(purchase_date);
    if purchase_date.day() > card.closing_day() {
        StatementAssignment {
            statement_month: month.next(),
            is_next_statement: true,
        }
    } else {
        StatementAssignment {
            statement_month: month,
            is_next_statement: false,
        }
    }
}

/// open, close and due dates of the `month` statement
///
/// Closing and due days are clamped to the month's last day. The period
/// opens the day after the previous month's close, so consecutive periods
/// tile the calendar without gaps or overlap.
pub fn statement_period(card: &Card, month: MonthKey) -> StatementPeriod {
    let previous_close = month.previous().day(card.closing_day());
    let close = month.day(card.closing_day());
    let due = month.plus(card.due_offset_months()).day(card.due_day());

    StatementPeriod {
        open: previous_close.succ_opt().unwrap_or(previous_close),
        close,
        due,
    }
}

/// due date of the statement a purchase on `purchase_date` is billed on
pub fn due_date_for_purchase(card: &Card, purchase_date: NaiveDate) -> NaiveDate {
    let assignment = statement_key_for_purchase(card, purchase_date);
    statement_period(card, assignment.statement_month).due
}

/// statement currently accepting purchases as of `today`
pub fn current_statement_month(card: &Card, today: NaiveDate) -> MonthKey {
    statement_key_for_purchase(card, today).statement_month
}
