use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, VLine};

use pae_minima::data::model::Direction;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// PAE trace plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected residues' PAE traces for the selected file.
pub fn pae_plot(ui: &mut Ui, state: &AppState) {
    let (Some(file), Some(peptide)) = (state.selected(), state.peptide.as_ref()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a folder and enter the peptide to view PAE traces  (File → Open folder…)");
        });
        return;
    };

    let title = match state.direction {
        Direction::Forward => "Standard PAE",
        Direction::Reciprocal => "Reciprocal PAE",
    };
    ui.heading(format!("{title} – {}   Peptide: {peptide}", file.file_id));

    let n = file.matrix.size();
    let boundary = peptide.len();

    Plot::new("pae_plot")
        .legend(Legend::default())
        .x_axis_label("Residue")
        .y_axis_label("PAE")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for &num in &state.residues {
                // Peptides longer than the complex have no trace to draw.
                if num == 0 || num > n {
                    continue;
                }
                let color = state.palette.color_for(num);
                let trace = file.matrix.trace(state.direction, num - 1);

                let points: PlotPoints = trace
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| [(j + 1) as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(peptide.residue_label(num))
                        .color(color)
                        .width(1.5),
                );

                // Mark where the minimum beyond the peptide sits.
                let tail_min = trace
                    .iter()
                    .enumerate()
                    .skip(boundary)
                    .min_by(|a, b| a.1.total_cmp(b.1));
                if let Some((j, &v)) = tail_min {
                    plot_ui.points(
                        Points::new(vec![[(j + 1) as f64, v]])
                            .radius(4.0)
                            .color(color),
                    );
                }
            }

            plot_ui.vline(
                VLine::new(boundary as f64 + 0.5)
                    .color(Color32::GRAY)
                    .name("peptide end"),
            );
        });
}
