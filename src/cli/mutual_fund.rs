use super::ui;
use crate::calc::mutual_fund::{MutualFundInput, MutualFundProjection};

pub fn display_projection(input: &MutualFundInput, projection: &MutualFundProjection, currency: &str) {
    let title = match input.monthly_sip {
        Some(sip) if sip > 0.0 => format!(
            "Mutual Fund Projection ({} years, SIP {})",
            input.years,
            ui::format_amount(sip, currency)
        ),
        _ => format!("Mutual Fund Projection ({} years)", input.years),
    };
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);
    table.add_row(vec![
        ui::label_cell("Units"),
        ui::number_cell(ui::format_number(projection.total_units, 4)),
    ]);
    table.add_row(vec![
        ui::label_cell("Projected NAV"),
        ui::number_cell(ui::format_number(projection.projected_nav, 4)),
    ]);
    table.add_row(vec![
        ui::label_cell("Total Investment"),
        ui::number_cell(ui::format_amount(projection.total_investment, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Projected Value"),
        ui::total_cell(ui::format_amount(projection.projected_value, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Gain"),
        ui::signed_amount_cell(projection.gain, currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Total Return"),
        ui::optional_change_cell(projection.total_return_percent),
    ]);
    table.add_row(vec![
        ui::label_cell("Annualized (CAGR)"),
        ui::optional_change_cell(projection.annualized_return),
    ]);
    println!("{table}");
}
