use super::ui;
use crate::calc::metals::{MetalInput, MetalValuation, WeightUnit, from_grams};

pub fn display_valuation(input: &MetalInput, valuation: &MetalValuation, currency: &str) {
    println!(
        "\n{}",
        ui::style_text(
            &format!(
                "{} {} {} ({:.2}% pure)",
                ui::format_number(input.quantity, 3),
                input.unit,
                valuation.metal,
                input.purity.percent()
            ),
            ui::StyleType::Title
        )
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);
    table.add_row(vec![
        ui::label_cell("Weight"),
        ui::number_cell(format!("{} g", ui::format_number(valuation.quantity_grams, 3))),
    ]);
    if input.unit != WeightUnit::Tola {
        table.add_row(vec![
            ui::label_cell("Weight (tola)"),
            ui::number_cell(ui::format_number(
                from_grams(valuation.quantity_grams, WeightUnit::Tola),
                3,
            )),
        ]);
    }
    table.add_row(vec![
        ui::label_cell("Current Price / Gram"),
        ui::number_cell(ui::format_amount(valuation.price_per_gram, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Total Investment"),
        ui::number_cell(ui::format_amount(valuation.total_investment, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Current Value"),
        ui::total_cell(ui::format_amount(valuation.current_value, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Profit / Loss"),
        ui::signed_amount_cell(valuation.profit_loss, currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Return"),
        ui::optional_change_cell(valuation.return_percent),
    ]);
    println!("{table}");
}
