use super::ui;
use crate::core::Currency;

pub fn display_currencies() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Series")]);
    for currency in Currency::ALL {
        table.add_row(vec![
            comfy_table::Cell::new(currency.code()),
            ui::subtle_cell(currency.series_id()),
        ]);
    }
    format!(
        "{}\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        table
    )
}
