/// quick start - check a purchase against a card's limit
use billing_cycle_rs::chrono::NaiveDate;
use billing_cycle_rs::{
    approve_purchase, due_date_for_purchase, BillingConfig, Card, Money,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let card = Card::builder()
        .name("Clinic Mastercard")
        .limit(Money::from_major(5_000))
        .closing_day(20)
        .due_day(28)
        .build()?;

    let purchase_date = NaiveDate::from_ymd_opt(2024, 3, 22).ok_or("bad date")?;
    println!("purchase due on {}", due_date_for_purchase(&card, purchase_date));

    let decision = approve_purchase(
        &card,
        Money::from_major(1_200),
        Money::from_major(2_500),
        Money::from_major(800),
        &BillingConfig::default(),
    )?;
    println!("{}", serde_json::to_string_pretty(&decision)?);

    Ok(())
}
