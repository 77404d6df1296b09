use crate::config::Ledger;
use crate::engine::{self, RateGraph, RateResolver};
use crate::model::LoanDirection;
use crate::ui;
use anyhow::Result;
use comfy_table::Cell;

#[derive(Debug, Clone)]
pub struct ObligationSummary {
    pub member: String,
    pub counterparty: String,
    pub direction: LoanDirection,
    pub amount: f64,
    pub currency: String,
    pub converted_value: Option<f64>,
}

#[derive(Debug)]
pub struct ObligationsReport {
    pub base_currency: String,
    pub obligations: Vec<ObligationSummary>,
    pub lending_total: f64,
    pub borrowing_total: f64,
}

impl ObligationsReport {
    pub fn display_as_table(&self) -> String {
        let base = &self.base_currency;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Member"),
            ui::header_cell("Counterparty"),
            ui::header_cell("Direction"),
            ui::header_cell("Amount"),
            ui::header_cell(&format!("Amount ({base})")),
        ]);

        for obligation in &self.obligations {
            let currency = obligation.currency.clone();
            let converted =
                ui::format_optional_cell(obligation.converted_value, |v| format!("{v:.2}"));
            table.add_row(vec![
                Cell::new(&obligation.member),
                Cell::new(&obligation.counterparty),
                Cell::new(obligation.direction.to_string()),
                Cell::new(format!("{:.2} {currency}", obligation.amount)),
                converted,
            ]);
        }

        let mut output = format!(
            "Open obligations: {}\n\n",
            ui::style_text("current loan ledger", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {:.2}\n{}: {:.2}",
            ui::style_text(&format!("Lent out ({base})"), ui::StyleType::TotalLabel),
            self.lending_total,
            ui::style_text(&format!("Borrowed ({base})"), ui::StyleType::TotalLabel),
            self.borrowing_total,
        ));
        output
    }
}

/// Collapses the loan ledger into open obligations and converts each one
/// into the base currency. Subtotals skip inconvertible entries, matching
/// the aggregator's zero-contribution rule.
pub fn generate_report(ledger: &Ledger) -> ObligationsReport {
    let snapshot = ledger.snapshot();
    let graph = RateGraph::build(snapshot.quotes);
    let mut resolver = RateResolver::new(&graph, snapshot.base_currency);

    let mut report = ObligationsReport {
        base_currency: snapshot.base_currency.to_string(),
        obligations: Vec::new(),
        lending_total: 0.0,
        borrowing_total: 0.0,
    };

    for loan in engine::current_obligations(snapshot.loans) {
        let converted = resolver
            .rate_to_base(&loan.currency)
            .map(|rate| loan.amount * rate);

        if let Some(value) = converted {
            match loan.direction {
                LoanDirection::Lend => report.lending_total += value,
                LoanDirection::Borrow => report.borrowing_total += value,
            }
        }

        report.obligations.push(ObligationSummary {
            member: ledger.member_name(&loan.member_id).to_string(),
            counterparty: loan.counterparty_id.clone(),
            direction: loan.direction,
            amount: loan.amount,
            currency: loan.currency.clone(),
            converted_value: converted,
        });
    }

    report
}

pub fn generate_and_display_report(ledger: &Ledger) -> Result<()> {
    let report = generate_report(ledger);
    println!("{}", report.display_as_table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn test_ledger() -> Ledger {
        let yaml = r#"
members:
  - id: "alice"
    name: "Alice"
quotes:
  - timestamp: "2024-06-01"
    base_currency: "CNY"
    quote_currency: "USD"
    rate: 7.21
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
    amount: 400.0
    timestamp: "2024-02-01"
  - member_id: "alice"
    counterparty_id: "bank"
    direction: borrow
    currency: "CNY"
    amount: 50000.0
    timestamp: "2024-03-01"
base_currency: "CNY"
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_report_dedups_and_converts() {
        let report = generate_report(&test_ledger());

        assert_eq!(report.obligations.len(), 2);
        assert_eq!(report.obligations[0].member, "Alice");
        assert_eq!(report.obligations[0].amount, 400.0);
        assert!((report.lending_total - 400.0 * 7.21).abs() < TOLERANCE);
        assert!((report.borrowing_total - 50000.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_inconvertible_obligation_shows_na() {
        let mut ledger = test_ledger();
        ledger.loans[2].currency = "XAU".to_string();

        let report = generate_report(&ledger);
        assert_eq!(report.obligations[1].converted_value, None);
        assert_eq!(report.borrowing_total, 0.0);

        let rendered = report.display_as_table();
        assert!(rendered.contains("N/A"));
    }
}
