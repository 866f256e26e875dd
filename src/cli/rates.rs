use super::ui;
use crate::calc::currency::cross_rate;
use crate::calc::metals::price_per_gram;
use crate::core::market::{LoadedSnapshot, Metal, PIVOT_CURRENCY};
use chrono::{DateTime, Local, Utc};
use comfy_table::Cell;

/// "Just now", "N min ago", or the local time of day for older updates.
pub fn relative_update_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else {
        timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}

pub fn display_dashboard(loaded: &LoadedSnapshot, local_currency: &str) {
    let snapshot = &loaded.snapshot;

    println!(
        "\n{} {}",
        ui::style_text("Market Rates", ui::StyleType::Title),
        ui::style_text(
            &format!(
                "({} | Updated: {})",
                loaded.source,
                relative_update_time(snapshot.timestamp, Utc::now())
            ),
            ui::StyleType::Subtle
        )
    );

    let mut metals = ui::new_styled_table();
    metals.set_header(vec![
        ui::header_cell("Metal"),
        ui::header_cell(&format!("Per Tola ({local_currency})")),
        ui::header_cell(&format!("Per Gram ({local_currency})")),
        ui::header_cell("24h Change"),
    ]);
    for metal in [Metal::Gold, Metal::Silver] {
        let price = snapshot.metal_price(metal);
        metals.add_row(vec![
            ui::label_cell(&metal.to_string()),
            ui::number_cell(ui::format_number(price.price_per_tola, 2)),
            ui::number_cell(ui::format_number(price_per_gram(price.price_per_tola), 2)),
            ui::change_cell(price.change_percent_24h),
        ]);
    }
    println!("{metals}");

    let mut currencies = ui::new_styled_table();
    currencies.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per {PIVOT_CURRENCY}")),
        ui::header_cell(&format!("In {local_currency}")),
    ]);
    for (code, rate) in &snapshot.currency_rates {
        if code == local_currency {
            continue;
        }
        currencies.add_row(vec![
            Cell::new(code),
            ui::number_cell(ui::format_number(*rate, 4)),
            ui::format_optional_cell(cross_rate(code, local_currency, snapshot).ok(), |v| {
                ui::format_number(v, 2)
            }),
        ]);
    }
    if local_currency != PIVOT_CURRENCY && !snapshot.currency_rates.contains_key(PIVOT_CURRENCY) {
        currencies.add_row(vec![
            Cell::new(PIVOT_CURRENCY),
            ui::number_cell(ui::format_number(1.0, 4)),
            ui::format_optional_cell(snapshot.rate(local_currency), |v| ui::format_number(v, 2)),
        ]);
    }
    println!("{currencies}");
}
