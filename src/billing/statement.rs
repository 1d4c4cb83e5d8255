use chrono::{NaiveDate, TimeZone};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::billing::period::{statement_period, StatementPeriod};
use crate::calendar::MonthKey;
use crate::card::Card;
use crate::decimal::Money;
use crate::installments::InstallmentTransaction;
use crate::types::{CardId, StatementId, StatementStatus};

/// value of every installment still to be billed after the current one,
/// across active transactions
pub fn future_installments_total(transactions: &[InstallmentTransaction]) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.is_active())
        .map(|tx| tx.remaining_value())
        .sum()
}

/// active transactions of `card` purchased within `period`
fn billed_in<'a>(
    transactions: &'a [InstallmentTransaction],
    card: &'a Card,
    period: StatementPeriod,
) -> impl Iterator<Item = &'a InstallmentTransaction> + 'a {
    transactions.iter().filter(move |tx| {
        tx.is_active() && tx.card_id() == card.id() && period.contains(tx.purchase_date())
    })
}

/// per-installment value of the active purchases billed on the `month` statement
pub fn current_statement_total(
    transactions: &[InstallmentTransaction],
    card: &Card,
    month: MonthKey,
) -> Money {
    let period = statement_period(card, month);
    billed_in(transactions, card, period)
        .map(|tx| tx.installment_value())
        .sum()
}

/// status of a statement as seen on `as_of`
pub fn statement_status(period: &StatementPeriod, as_of: NaiveDate) -> StatementStatus {
    if as_of > period.due {
        StatementStatus::Overdue
    } else if as_of > period.close {
        StatementStatus::Closed
    } else {
        StatementStatus::Open
    }
}

/// a card's statement for one month, derived on read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub card_id: CardId,
    pub month: MonthKey,
    pub period: StatementPeriod,
    pub total_value: Money,
    /// still unpaid
    pub open_value: Money,
    pub transaction_count: usize,
    pub status: StatementStatus,
}

impl Statement {
    /// deterministic id for a card's statement month
    pub fn id_for(card_id: CardId, month: MonthKey) -> StatementId {
        Uuid::new_v5(&card_id, month.to_string().as_bytes())
    }

    /// copy of this statement after `paid` has been settled against it
    pub fn settle(&self, paid: Money) -> Statement {
        Statement {
            open_value: (self.total_value - paid).max(Money::ZERO),
            ..self.clone()
        }
    }

    pub fn is_paid(&self) -> bool {
        self.open_value.is_zero()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// summarize the `month` statement of `card` as of the given date
pub fn summarize_statement(
    card: &Card,
    month: MonthKey,
    transactions: &[InstallmentTransaction],
    as_of: NaiveDate,
) -> Statement {
    let period = statement_period(card, month);
    let (transaction_count, total_value) = billed_in(transactions, card, period)
        .fold((0, Money::ZERO), |(count, total), tx| {
            (count + 1, total + tx.installment_value())
        });
    let status = statement_status(&period, as_of);

    debug!(
        card_id = %card.id(),
        month = %month,
        total = %total_value,
        transactions = transaction_count,
        status = ?status,
        "statement summarized"
    );

    Statement {
        id: Statement::id_for(card.id(), month),
        card_id: card.id(),
        month,
        period,
        total_value,
        open_value: total_value,
        transaction_count,
        status,
    }
}

/// the provider's current date as seen in `tz`
///
/// Statement days are local calendar days; near midnight the UTC date
/// is a different day.
pub fn local_today<Tz: TimeZone>(time_provider: &SafeTimeProvider, tz: &Tz) -> NaiveDate {
    time_provider.now().with_timezone(tz).date_naive()
}

/// summarize using the provider's current date in `tz`
pub fn summarize_statement_with_time<Tz: TimeZone>(
    card: &Card,
    month: MonthKey,
    transactions: &[InstallmentTransaction],
    time_provider: &SafeTimeProvider,
    tz: &Tz,
) -> Statement {
    summarize_statement(card, month, transactions, local_today(time_provider, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;
    use crate::installments::NewPurchase;
    use chrono::{FixedOffset, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn card() -> Card {
        Card::builder()
            .name("Clinic card")
            .limit(Money::from_major(10_000))
            .closing_day(20)
            .due_day(28)
            .build()
            .unwrap()
    }

    fn purchase(card: &Card, total: i64, count: u32, on: NaiveDate) -> InstallmentTransaction {
        InstallmentTransaction::from_purchase(
            NewPurchase {
                card_id: card.id(),
                description: format!("purchase on {}", on),
                total_value: Money::from_major(total),
                installment_count: count,
                purchase_date: on,
                first_installment_date: None,
            },
            &BillingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_future_total_sums_remaining_active_installments() {
        let card = card();
        let mut advanced = purchase(&card, 1_200, 12, date(2024, 1, 5));
        for _ in 0..3 {
            advanced.advance().unwrap();
        }
        let fresh = purchase(&card, 300, 3, date(2024, 1, 6));
        let mut cancelled = purchase(&card, 900, 3, date(2024, 1, 7));
        cancelled.cancel().unwrap();
        let mut completed = purchase(&card, 100, 1, date(2024, 1, 8));
        completed.advance().unwrap();

        let transactions = vec![advanced, fresh, cancelled, completed];

        // 100 x (12 - 4) + 100 x (3 - 1)
        assert_eq!(future_installments_total(&transactions), Money::from_major(1_000));
        assert_eq!(future_installments_total(&[]), Money::ZERO);
    }

    #[test]
    fn test_current_total_only_counts_purchases_in_period() {
        let card = card();
        let other_card = Card::builder()
            .name("Other")
            .limit(Money::from_major(1_000))
            .closing_day(20)
            .due_day(28)
            .build()
            .unwrap();

        let mut cancelled = purchase(&card, 500, 1, date(2024, 3, 1));
        cancelled.cancel().unwrap();

        let transactions = vec![
            purchase(&card, 600, 3, date(2024, 2, 21)),      // opens march period
            purchase(&card, 150, 1, date(2024, 3, 20)),      // closing day
            purchase(&card, 400, 2, date(2024, 3, 21)),      // april statement
            purchase(&card, 80, 1, date(2024, 2, 20)),       // february statement
            purchase(&other_card, 999, 1, date(2024, 3, 10)),
            cancelled,
        ];

        assert_eq!(
            current_statement_total(&transactions, &card, month(2024, 3)),
            Money::from_major(350)
        );
        assert_eq!(
            current_statement_total(&transactions, &card, month(2024, 4)),
            Money::from_major(200)
        );
        assert_eq!(
            current_statement_total(&transactions, &card, month(2024, 2)),
            Money::from_major(80)
        );
    }

    #[test]
    fn test_status_derivation() {
        let period = StatementPeriod {
            open: date(2023, 12, 21),
            close: date(2024, 1, 20),
            due: date(2024, 1, 28),
        };

        assert_eq!(statement_status(&period, date(2024, 1, 10)), StatementStatus::Open);
        assert_eq!(statement_status(&period, date(2024, 1, 20)), StatementStatus::Open);
        assert_eq!(statement_status(&period, date(2024, 1, 25)), StatementStatus::Closed);
        assert_eq!(statement_status(&period, date(2024, 1, 28)), StatementStatus::Closed);
        assert_eq!(statement_status(&period, date(2024, 1, 30)), StatementStatus::Overdue);
    }

    #[test]
    fn test_summarize_statement() {
        let card = card();
        let transactions = vec![
            purchase(&card, 600, 3, date(2024, 1, 5)),
            purchase(&card, 250, 1, date(2024, 1, 15)),
            purchase(&card, 999, 1, date(2024, 1, 25)),
        ];

        let statement =
            summarize_statement(&card, month(2024, 1), &transactions, date(2024, 1, 25));

        assert_eq!(statement.card_id, card.id());
        assert_eq!(statement.month, month(2024, 1));
        assert_eq!(statement.period.close, date(2024, 1, 20));
        assert_eq!(statement.period.due, date(2024, 1, 28));
        assert_eq!(statement.total_value, Money::from_major(450));
        assert_eq!(statement.open_value, Money::from_major(450));
        assert_eq!(statement.transaction_count, 2);
        assert_eq!(statement.status, StatementStatus::Closed);
        assert_eq!(statement.id, Statement::id_for(card.id(), month(2024, 1)));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let card = card();
        let transactions = vec![
            purchase(&card, 600, 3, date(2024, 1, 5)),
            purchase(&card, 250, 1, date(2024, 1, 15)),
        ];

        let first = summarize_statement(&card, month(2024, 1), &transactions, date(2024, 1, 10));
        let second = summarize_statement(&card, month(2024, 1), &transactions, date(2024, 1, 10));

        assert_eq!(first, second);
        assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
    }

    #[test]
    fn test_summarize_with_controlled_time() {
        let card = card();
        let transactions = vec![purchase(&card, 300, 1, date(2024, 1, 5))];

        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        ));
        let control = time.test_control().unwrap();

        let statement =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &Utc);
        assert_eq!(statement.status, StatementStatus::Open);

        control.advance(chrono::Duration::days(15));
        let statement =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &Utc);
        assert_eq!(statement.status, StatementStatus::Closed);

        control.advance(chrono::Duration::days(5));
        let statement =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &Utc);
        assert_eq!(statement.status, StatementStatus::Overdue);
        assert_eq!(statement.total_value, Money::from_major(300));
    }

    #[test]
    fn test_status_follows_local_day_not_utc() {
        let card = card();
        let transactions = vec![purchase(&card, 300, 1, date(2024, 1, 5))];
        let brasilia = FixedOffset::west_opt(3 * 3600).unwrap();

        // 22:00 on the due date in UTC-3
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 29, 1, 0, 0).unwrap(),
        ));
        assert_eq!(local_today(&time, &brasilia), date(2024, 1, 28));

        let local =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &brasilia);
        assert_eq!(local.status, StatementStatus::Closed);

        let utc = summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &Utc);
        assert_eq!(utc.status, StatementStatus::Overdue);

        // 22:30 on the closing day in UTC-3 is still open locally
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 21, 1, 30, 0).unwrap(),
        ));
        let local =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &brasilia);
        assert_eq!(local.status, StatementStatus::Open);

        let control = time.test_control().unwrap();
        control.advance(chrono::Duration::hours(3));
        let local =
            summarize_statement_with_time(&card, month(2024, 1), &transactions, &time, &brasilia);
        assert_eq!(local.status, StatementStatus::Closed);
    }

    #[test]
    fn test_settle() {
        let card = card();
        let transactions = vec![purchase(&card, 500, 1, date(2024, 1, 5))];
        let statement =
            summarize_statement(&card, month(2024, 1), &transactions, date(2024, 1, 21));

        let partial = statement.settle(Money::from_major(200));
        assert_eq!(partial.open_value, Money::from_major(300));
        assert_eq!(partial.total_value, Money::from_major(500));
        assert!(!partial.is_paid());

        let overpaid = statement.settle(Money::from_major(800));
        assert_eq!(overpaid.open_value, Money::ZERO);
        assert!(overpaid.is_paid());

        // settling never mutates the summarized view
        assert_eq!(statement.open_value, Money::from_major(500));
    }

    #[test]
    fn test_statement_json_shape() {
        let card = card();
        let statement = summarize_statement(&card, month(2024, 2), &[], date(2024, 3, 1));
        let json = statement.to_json_pretty().unwrap();

        assert!(json.contains("\"month\": \"2024-02\""));
        assert!(json.contains("\"status\": \"vencida\""));
        assert!(json.contains("\"due\": \"2024-02-28\""));

        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, statement);
    }
}
