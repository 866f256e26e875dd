use super::ui;
use crate::calc::currency::{ConversionResult, CurrencyInvestmentResult};

pub fn display_conversion(result: &ConversionResult) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);
    table.add_row(vec![
        ui::number_cell(ui::format_amount(result.amount, &result.from)),
        ui::total_cell(ui::format_amount(result.converted, &result.to)),
        ui::number_cell(format!(
            "1 {} = {:.4} {}",
            result.from, result.rate, result.to
        )),
    ]);
    println!("{table}");
}

pub fn display_investment(result: &CurrencyInvestmentResult, amount: f64, local_currency: &str) {
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} Investment", result.currency),
            ui::StyleType::Title
        )
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);
    table.add_row(vec![
        ui::label_cell("Invested"),
        ui::number_cell(ui::format_amount(amount, local_currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Units Held"),
        ui::number_cell(ui::format_amount(result.units, &result.currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Current Value"),
        ui::total_cell(ui::format_amount(result.current_value, local_currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Gain / Loss"),
        ui::signed_amount_cell(result.gain_loss, local_currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Return"),
        ui::optional_change_cell(result.return_percent),
    ]);
    println!("{table}");
}
