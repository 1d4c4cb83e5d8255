/// installment plan - split a purchase and walk it to completion
use billing_cycle_rs::chrono::NaiveDate;
use billing_cycle_rs::{
    statement_key_for_purchase, BillingConfig, Card, InstallmentPlan, InstallmentTransaction,
    Money, NewPurchase,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let card = Card::builder()
        .name("Nubank")
        .limit(Money::from_major(8_000))
        .closing_day(25)
        .due_day(5)
        .build()?;

    let purchase_date = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad date")?;
    let plan = InstallmentPlan::split(Money::from_major(1_000), 6, purchase_date)?;

    println!("=== {} in {} installments ===", plan.total, plan.count());
    for installment in &plan.installments {
        let assignment = statement_key_for_purchase(&card, installment.date);
        println!(
            "#{:<2} {}  {:>8}  statement {}",
            installment.number, installment.date, installment.value, assignment.statement_month
        );
    }

    let mut transaction = InstallmentTransaction::from_purchase(
        NewPurchase {
            card_id: card.id(),
            description: "Intraoral camera".to_string(),
            total_value: plan.total,
            installment_count: plan.count(),
            purchase_date,
            first_installment_date: None,
        },
        &BillingConfig::default(),
    )?;

    while transaction.is_active() {
        println!(
            "installment {}/{} - {} still to bill",
            transaction.current_installment(),
            transaction.installment_count(),
            transaction.remaining_value()
        );
        transaction.advance()?;
    }
    println!("final status: {:?}", transaction.status());

    Ok(())
}
