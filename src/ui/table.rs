use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Combined minima for the current direction, one column per file.
pub fn combined_table(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.label("No minima yet.");
        return;
    };
    let table = report.tables.get(state.direction);
    if table.is_empty() {
        ui.label(format!("No {} minima: no file could be processed.", state.direction));
        return;
    }

    let selected_id = state.selected().map(|f| f.file_id.as_str());
    let columns = table.columns();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto())
            .column(Column::auto())
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("residue_num");
                });
                header.col(|ui| {
                    ui.strong("residue_identity");
                });
                for col in columns {
                    header.col(|ui| {
                        // Reciprocal labels carry a suffix after the file id.
                        let is_selected =
                            selected_id.is_some_and(|id| col == id || col.starts_with(&format!("{id}_")));
                        let text = RichText::new(col).strong();
                        ui.label(if is_selected { text.underline() } else { text });
                    });
                }
            })
            .body(|mut body| {
                for (key, values) in table.rows() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(key.residue_num.to_string());
                        });
                        row.col(|ui| {
                            ui.label(key.residue_identity.to_string());
                        });
                        for value in values {
                            row.col(|ui| {
                                ui.label(value.map(|v| format!("{v:.2}")).unwrap_or_default());
                            });
                        }
                    });
                }
            });
    });
}
