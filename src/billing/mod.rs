pub mod limits;
pub mod period;
pub mod statement;

pub use limits::{approve_purchase, credit_utilization, CreditUtilization, PurchaseDecision};
pub use period::{
    current_statement_month, due_date_for_purchase, statement_key_for_purchase, statement_period,
    StatementAssignment, StatementPeriod,
};
pub use statement::{
    current_statement_total, future_installments_total, local_today, statement_status,
    summarize_statement, summarize_statement_with_time, Statement,
};
