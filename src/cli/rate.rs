use super::ui;
use crate::core::{Currency, RateResolver, Resolution};
use anyhow::{Result, bail};
use comfy_table::Cell;

impl Resolution {
    pub fn display_as_table(&self, from: Currency, to: Currency) -> String {
        let title = ui::style_text(&format!("{from} → {to}"), ui::StyleType::Title);

        let Resolution::Found {
            observation,
            source,
        } = self
        else {
            return format!(
                "{}\n{}",
                title,
                ui::style_text("No exchange rate available", ui::StyleType::Error)
            );
        };

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Pair"),
            ui::header_cell("Rate"),
            ui::header_cell("Date"),
            ui::header_cell("Source"),
        ]);
        table.add_row(vec![
            Cell::new(format!("{}/{}", observation.from, observation.to)),
            ui::value_cell(format!("{:.4}", observation.value)),
            Cell::new(observation.date.to_string()),
            ui::subtle_cell(&source.to_string()),
        ]);
        format!("{title}\n{table}")
    }
}

/// Resolves and prints the rate for a pair. Absence of any rate is an error
/// so the process exits non-zero.
pub async fn display_rate(resolver: &RateResolver, from: Currency, to: Currency) -> Result<()> {
    let resolution = resolver.resolve(from, to).await;
    println!("{}", resolution.display_as_table(from, to));

    if resolution == Resolution::NotAvailable {
        bail!("No exchange rate available for {}/{}", from, to);
    }
    Ok(())
}
