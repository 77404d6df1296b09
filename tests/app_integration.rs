use std::fs;
use tracing::info;

const TOLERANCE: f64 = 1e-9;

fn write_ledger(content: &str) -> tempfile::NamedTempFile {
    let ledger_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(ledger_file.path(), content).expect("Failed to write ledger file");
    ledger_file
}

#[test_log::test]
fn test_full_app_flow_summary() {
    let ledger_content = r#"
members:
  - id: "alice"
    name: "Alice"
accounts:
  - id: "a1"
    name: "Brokerage"
    member_id: "alice"
account_valuations:
  - entity_id: "a1"
    timestamp: "2024-06-01T10:00:00Z"
    currency: "USD"
    amount: 12500.0
quotes:
  - timestamp: "2024-06-01"
    base_currency: "CNY"
    quote_currency: "USD"
    rate: 7.21
base_currency: "CNY"
"#;
    let ledger_file = write_ledger(ledger_content);

    let result = nestworth::run_command(
        nestworth::AppCommand::Summary,
        Some(ledger_file.path().to_str().unwrap()),
    );
    assert!(
        result.is_ok(),
        "Summary command failed with: {:?}",
        result.err()
    );
}

#[test_log::test]
fn test_full_app_flow_loans() {
    let ledger_content = r#"
members:
  - id: "alice"
    name: "Alice"
loans:
  - member_id: "alice"
    counterparty_id: "cousin"
    direction: lend
    currency: "USD"
    amount: 1000.0
    timestamp: "2024-01-01"
  - member_id: "alice"
    counterparty_id: "cousin"
    direction: lend
    currency: "USD"
    amount: 1000.0
    timestamp: "2024-03-01"
    settled: true
quotes:
  - timestamp: "2024-06-01"
    base_currency: "CNY"
    quote_currency: "USD"
    rate: 7.21
base_currency: "CNY"
"#;
    let ledger_file = write_ledger(ledger_content);

    let result = nestworth::run_command(
        nestworth::AppCommand::Loans,
        Some(ledger_file.path().to_str().unwrap()),
    );
    assert!(
        result.is_ok(),
        "Loans command failed with: {:?}",
        result.err()
    );
}

#[test_log::test]
fn test_missing_ledger_file_fails() {
    let result = nestworth::run_command(
        nestworth::AppCommand::Summary,
        Some("/nonexistent/ledger.yaml"),
    );
    assert!(result.is_err());
}

// End-to-end aggregation over a realistic multi-member, multi-currency
// household, checked through the public engine API.
#[test_log::test]
fn test_household_aggregation_end_to_end() {
    let ledger_content = r#"
members:
  - id: "alice"
    name: "Alice"
  - id: "bob"
    name: "Bob"
accounts:
  - id: "a1"
    name: "Brokerage"
    member_id: "alice"
  - id: "a2"
    name: "Savings"
    member_id: "bob"
fixed_assets:
  - id: "f1"
    name: "Apartment"
    member_id: "bob"
    acquisition_price: 1800000.0
    acquisition_currency: "CNY"
account_valuations:
  - entity_id: "a1"
    timestamp: "2024-05-01"
    currency: "USD"
    amount: 11000.0
  - entity_id: "a1"
    timestamp: "2024-06-01"
    currency: "USD"
    amount: 12500.0
  - entity_id: "a2"
    timestamp: "2024-06-01"
    currency: "HKD"
    amount: 50000.0
quotes:
  - timestamp: "2024-06-01"
    base_currency: "CNY"
    quote_currency: "USD"
    rate: 7.21
  - timestamp: "2024-06-01"
    base_currency: "USD"
    quote_currency: "HKD"
    rate: 0.1278
loans:
  - member_id: "alice"
    counterparty_id: "cousin"
    direction: lend
    currency: "CNY"
    amount: 20000.0
    timestamp: "2024-04-01"
  - member_id: "bob"
    counterparty_id: "bank"
    direction: borrow
    currency: "CNY"
    amount: 900000.0
    timestamp: "2024-01-01"
base_currency: "CNY"
"#;
    let ledger_file = write_ledger(ledger_content);
    let ledger =
        nestworth::config::Ledger::load_from_path(ledger_file.path()).expect("Failed to load");

    let result = nestworth::engine::aggregate(&ledger.snapshot());
    info!(?result, "Aggregated household totals");

    // a1: latest valuation wins (12500, not 11000). a2: HKD -> USD -> CNY.
    let a1_cny = 12500.0 * 7.21;
    let a2_cny = 50000.0 * 0.1278 * 7.21;
    assert!((result.liquid_total - (a1_cny + a2_cny)).abs() < TOLERANCE);
    assert!((result.fixed_total - 1800000.0).abs() < TOLERANCE);
    assert!((result.lending_total - 20000.0).abs() < TOLERANCE);
    assert!((result.borrowing_total - 900000.0).abs() < TOLERANCE);
    assert_eq!(
        result.net_worth,
        result.liquid_total + result.fixed_total + result.lending_total - result.borrowing_total
    );

    assert!((result.per_member["alice"] - a1_cny).abs() < TOLERANCE);
    assert!((result.per_member["bob"] - (a2_cny + 1800000.0)).abs() < TOLERANCE);
    assert!(result.inconvertible.is_empty());
}

#[test_log::test]
fn test_inconvertible_currency_is_flagged_not_fatal() {
    let ledger_content = r#"
accounts:
  - id: "a1"
    name: "Gold stash"
    member_id: "alice"
account_valuations:
  - entity_id: "a1"
    timestamp: "2024-06-01"
    currency: "XAU"
    amount: 3.0
base_currency: "CNY"
"#;
    let ledger_file = write_ledger(ledger_content);
    let ledger =
        nestworth::config::Ledger::load_from_path(ledger_file.path()).expect("Failed to load");

    let result = nestworth::engine::aggregate(&ledger.snapshot());
    assert_eq!(result.net_worth, 0.0);
    assert!(result.inconvertible.contains("a1"));

    // The summary command still succeeds and renders the flagged row.
    let command_result = nestworth::run_command(
        nestworth::AppCommand::Summary,
        Some(ledger_file.path().to_str().unwrap()),
    );
    assert!(command_result.is_ok());
}
