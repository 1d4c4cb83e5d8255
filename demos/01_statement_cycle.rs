/// statement cycle - follow one statement from open to overdue with controlled time
use billing_cycle_rs::chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use billing_cycle_rs::{
    credit_utilization, current_statement_month, current_statement_total,
    future_installments_total, local_today, summarize_statement_with_time, BillingConfig, Card,
    InstallmentTransaction, Money, NewPurchase, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== statement cycle example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let config = BillingConfig::default();
    let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();

    let card = Card::builder()
        .name("Corporate Visa")
        .bank("Itau")
        .last_four("1234")
        .limit(Money::from_major(20_000))
        .closing_day(10)
        .due_day(17)
        .corporate(true)
        .build()?;

    let purchases = [
        ("Dental chair", 12_000, 10, (2024, 4, 15)),
        ("Composite resin", 900, 3, (2024, 5, 3)),
        ("Gloves", 240, 1, (2024, 5, 12)),
    ];

    let mut transactions = Vec::new();
    for (description, total, count, (y, m, d)) in purchases {
        let purchase_date = NaiveDate::from_ymd_opt(y, m, d).ok_or("bad purchase date")?;
        transactions.push(InstallmentTransaction::from_purchase(
            NewPurchase {
                card_id: card.id(),
                description: description.to_string(),
                total_value: Money::from_major(total),
                installment_count: count,
                purchase_date,
                first_installment_date: None,
            },
            &config,
        )?);
    }

    let month = current_statement_month(&card, local_today(&time, &sao_paulo));
    println!("current statement: {}", month);

    for _ in 0..3 {
        let statement =
            summarize_statement_with_time(&card, month, &transactions, &time, &sao_paulo);
        println!(
            "{}: {:?}, total {} across {} purchase(s)",
            time.now().format("%Y-%m-%d"),
            statement.status,
            statement.total_value,
            statement.transaction_count
        );
        controller.advance(Duration::days(10));
    }

    let utilization = credit_utilization(
        &card,
        current_statement_total(&transactions, &card, month),
        future_installments_total(&transactions),
    );
    println!(
        "\nlimit {} used {} available {} ({}%, {:?})",
        utilization.limit,
        utilization.used,
        utilization.available,
        utilization.percent_used,
        utilization.state()
    );

    Ok(())
}
