use super::ui;
use crate::calc::savings::{SavingsInput, SavingsResult, ScheduleRow};

pub fn display_savings(
    input: &SavingsInput,
    result: &SavingsResult,
    schedule: &[ScheduleRow],
    currency: &str,
) {
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} Savings ({} months at {}%)", input.mode, result.months, input.annual_rate),
            ui::StyleType::Title
        )
    );

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![ui::header_cell("Item"), ui::header_cell("Amount")]);
    summary.add_row(vec![
        ui::label_cell("Total Contributed"),
        ui::number_cell(ui::format_amount(result.total_contributed, currency)),
    ]);
    summary.add_row(vec![
        ui::label_cell("Total Profit"),
        ui::signed_amount_cell(result.total_profit, currency),
    ]);
    summary.add_row(vec![
        ui::label_cell("Final Balance"),
        ui::total_cell(ui::format_amount(result.final_balance, currency)),
    ]);
    summary.add_row(vec![
        ui::label_cell("Effective Rate"),
        ui::number_cell(format!("{:.2}% / year", result.effective_rate)),
    ]);
    println!("{summary}");

    if schedule.len() > 1 {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Year"),
            ui::header_cell("Contributed"),
            ui::header_cell("Profit"),
            ui::header_cell("Balance"),
        ]);
        for row in schedule {
            table.add_row(vec![
                ui::number_cell(row.year.to_string()),
                ui::number_cell(ui::format_number(row.contributed, 2)),
                ui::number_cell(ui::format_number(row.profit, 2)),
                ui::number_cell(ui::format_number(row.balance, 2)),
            ]);
        }
        println!("{table}");
    }
}
