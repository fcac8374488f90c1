use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use pae_minima::data::model::Direction;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – file list and residue selection
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.folder.is_none() {
        ui.label("No folder loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Loaded files ----
            let mut clicked = None;
            for (i, file) in state.files.iter().enumerate() {
                let failed = state
                    .report
                    .as_ref()
                    .is_some_and(|r| r.failures.iter().any(|f| f.file_id == file.file_id));
                let mut text = RichText::new(&file.file_id);
                if failed {
                    text = text.color(Color32::RED);
                }
                if ui
                    .selectable_label(state.selected_file == Some(i), text)
                    .clicked()
                {
                    clicked = Some(i);
                }
            }
            if clicked.is_some() {
                state.selected_file = clicked;
            }

            if !state.load_errors.is_empty() {
                let header = format!("Unreadable  ({})", state.load_errors.len());
                egui::CollapsingHeader::new(RichText::new(header).color(Color32::RED))
                    .id_salt("load_errors")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for (id, reason) in &state.load_errors {
                            ui.label(format!("{id}: {reason}"));
                        }
                    });
            }

            ui.separator();

            // ---- Residue selection ----
            let Some(peptide) = state.peptide.clone() else {
                ui.label("Enter the peptide sequence to select residues.");
                return;
            };

            ui.strong(format!("Residues  ({}/{})", state.residues.len(), peptide.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_residues();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_residues();
                }
            });

            for num in 1..=peptide.len() {
                let mut checked = state.residues.contains(&num);
                let text = RichText::new(peptide.residue_label(num)).color(state.palette.color_for(num));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_residue(num);
                }
            }

            // ---- Failures for the current peptide ----
            if let Some(report) = &state.report {
                if !report.failures.is_empty() {
                    ui.separator();
                    ui.strong("Skipped");
                    for failure in &report.failures {
                        ui.label(RichText::new(failure.to_string()).color(Color32::RED));
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Peptide");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.peptide_input)
                .desired_width(160.0)
                .hint_text("N-terminal sequence"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Apply").clicked() {
            state.apply_peptide();
        }

        ui.separator();

        ui.selectable_value(&mut state.direction, Direction::Forward, "Standard PAE");
        ui.selectable_value(&mut state.direction, Direction::Reciprocal, "Reciprocal PAE");

        ui.separator();

        if let Some(report) = &state.report {
            ui.label(format!(
                "{} of {} files summarized",
                report.processed.len(),
                state.files.len() + state.load_errors.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder of PAE JSON files")
        .pick_folder();

    if let Some(path) = folder {
        state.open_folder(&path);
    }
}
