pub mod schedule;
pub mod transaction;

pub use schedule::{generate_installment_dates, InstallmentPlan, PlannedInstallment};
pub use transaction::{InstallmentTransaction, NewPurchase};
