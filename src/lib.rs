pub mod billing;
pub mod calendar;
pub mod card;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod installments;
pub mod types;

// re-export key types
pub use billing::{
    approve_purchase, credit_utilization, current_statement_month, current_statement_total,
    due_date_for_purchase, future_installments_total, local_today, statement_key_for_purchase,
    statement_period, statement_status, summarize_statement, summarize_statement_with_time,
    CreditUtilization, PurchaseDecision, Statement, StatementAssignment, StatementPeriod,
};
pub use calendar::{add_months_rollover, clamp_day, days_in_month, MonthKey};
pub use card::{Card, CardBuilder};
pub use config::BillingConfig;
pub use decimal::{Money, Rate};
pub use errors::{BillingError, Result};
pub use installments::{
    generate_installment_dates, InstallmentPlan, InstallmentTransaction, NewPurchase,
    PlannedInstallment,
};
pub use types::{
    CardId, CardKind, DueDayPolicy, InstallmentStatus, StatementId, StatementStatus,
    TransactionId, UtilizationState,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
