use egui::{Grid, Ui};
use glam::Mat4;

use std::hash::Hash;

/// Shows `matrix` row by row, the way it reads on paper.
pub fn matrix_label(ui: &mut Ui, id: impl Hash, matrix: &Mat4) {
    Grid::new(id).striped(true).show(ui, |ui| {
        for row in 0..4 {
            let row = matrix.row(row);
            for value in row.to_array() {
                ui.monospace(format!("{:>6.2}", value));
            }
            ui.end_row()
        }
    });
}
