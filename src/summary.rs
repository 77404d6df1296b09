use crate::config::Ledger;
use crate::engine::{self, AggregateResult, RateGraph, RateResolver};
use crate::ui;
use anyhow::Result;
use comfy_table::Cell;
use console::style;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EntitySummary {
    pub name: String,
    pub owner: String,
    pub kind: &'static str,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub converted_value: Option<f64>,
}

#[derive(Debug)]
pub struct HouseholdSummary {
    pub base_currency: String,
    pub entities: Vec<EntitySummary>,
    pub per_member: Vec<(String, f64)>,
    pub totals: AggregateResult,
}

impl HouseholdSummary {
    pub fn display_as_table(&self) -> String {
        let base = &self.base_currency;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Name"),
            ui::header_cell("Owner"),
            ui::header_cell("Kind"),
            ui::header_cell("Value"),
            ui::header_cell(&format!("Value ({base})")),
        ]);

        for entity in &self.entities {
            let currency = entity.currency.as_deref().unwrap_or("N/A").to_string();

            let amount = ui::format_optional_cell(entity.amount, |a| format!("{a:.2} {currency}"));
            let converted =
                ui::format_optional_cell(entity.converted_value, |v| format!("{v:.2}"));

            table.add_row(vec![
                Cell::new(&entity.name),
                Cell::new(&entity.owner),
                Cell::new(entity.kind),
                amount,
                converted,
            ]);
        }

        let mut output = format!(
            "Household: {}\n\n",
            ui::style_text("net worth summary", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        // Totals block
        let totals = &self.totals;
        output.push_str(&format!(
            "\n\n{}: {:.2}\n{}: {:.2}\n{}: {:.2}\n{}: {:.2}",
            ui::style_text(&format!("Liquid ({base})"), ui::StyleType::TotalLabel),
            totals.liquid_total,
            ui::style_text(&format!("Fixed ({base})"), ui::StyleType::TotalLabel),
            totals.fixed_total,
            ui::style_text(&format!("Lent out ({base})"), ui::StyleType::TotalLabel),
            totals.lending_total,
            ui::style_text(&format!("Borrowed ({base})"), ui::StyleType::TotalLabel),
            totals.borrowing_total,
        ));
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text(&format!("Net worth ({base})"), ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", totals.net_worth), ui::StyleType::TotalValue),
        ));

        if !self.per_member.is_empty() {
            let mut member_table = ui::new_styled_table();
            member_table.set_header(vec![
                ui::header_cell("Member"),
                ui::header_cell(&format!("Assets ({base})")),
            ]);
            for (name, total) in &self.per_member {
                member_table.add_row(vec![Cell::new(name), ui::signed_money_cell(*total)]);
            }
            output.push_str(&format!("\n\n{member_table}"));
        }

        if !totals.inconvertible.is_empty() {
            let flagged: Vec<&str> = totals.inconvertible.iter().map(String::as_str).collect();
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    &format!(
                        "Warning: no conversion path to {base} for: {}",
                        flagged.join(", ")
                    ),
                    ui::StyleType::Error
                )
            ));
        }

        output
    }
}

/// Builds the summary: per-entity rows through the snapshot and rate
/// components, household totals through the aggregator.
pub fn generate_summary(ledger: &Ledger) -> HouseholdSummary {
    let snapshot = ledger.snapshot();
    let totals = engine::aggregate(&snapshot);

    let graph = RateGraph::build(snapshot.quotes);
    let mut resolver = RateResolver::new(&graph, snapshot.base_currency);
    let mut entities = Vec::new();

    for account in snapshot.accounts {
        let mut entity = EntitySummary {
            name: account.name.clone(),
            owner: ledger.member_name(&account.member_id).to_string(),
            kind: "account",
            amount: None,
            currency: None,
            converted_value: None,
        };
        match engine::latest_valuation(&account.id, snapshot.account_valuations) {
            Some(valuation) => {
                entity.amount = Some(valuation.amount);
                entity.currency = Some(valuation.currency.clone());
                entity.converted_value = resolver
                    .rate_to_base(&valuation.currency)
                    .map(|rate| valuation.amount * rate);
            }
            None => {
                // Unvalued accounts count as zero in the base currency.
                debug!(account = %account.id, "No valuation history, counting as zero");
                entity.converted_value = Some(0.0);
            }
        }
        entities.push(entity);
    }

    for asset in snapshot.fixed_assets {
        let (amount, currency) = match engine::latest_valuation(&asset.id, snapshot.asset_valuations)
        {
            Some(valuation) => (valuation.amount, valuation.currency.clone()),
            None => (asset.acquisition_price, asset.acquisition_currency.clone()),
        };
        entities.push(EntitySummary {
            name: asset.name.clone(),
            owner: ledger.member_name(&asset.member_id).to_string(),
            kind: "fixed asset",
            amount: Some(amount),
            currency: Some(currency.clone()),
            converted_value: resolver.rate_to_base(&currency).map(|rate| amount * rate),
        });
    }

    let per_member = totals
        .per_member
        .iter()
        .map(|(id, total)| (ledger.member_name(id).to_string(), *total))
        .collect();

    HouseholdSummary {
        base_currency: snapshot.base_currency.to_string(),
        entities,
        per_member,
        totals,
    }
}

pub fn generate_and_display_summary(ledger: &Ledger) -> Result<()> {
    let summary = generate_summary(ledger);
    println!("{}", summary.display_as_table());

    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    let total_str = format!(
        "Net Worth ({}): {:.2}",
        summary.base_currency, summary.totals.net_worth
    );
    let styled_total = style(&total_str).bold().green();
    println!("\n{styled_total:>term_width$}");

    Ok(())
}
