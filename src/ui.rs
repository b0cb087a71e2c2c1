//! Instructions drawer overlay (requires the `egui` feature).

use crate::control::ControlMode;

/// Open/closed state of the instructions drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionsPanel {
    open: bool,
}

impl Default for InstructionsPanel {
    fn default() -> Self {
        Self { open: true }
    }
}

impl InstructionsPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Draw the toggle button and, when open, the drawer itself.
    pub fn show(&mut self, ctx: &egui::Context, mode: ControlMode, equation: &str) {
        egui::Area::new(egui::Id::new("instructions_toggle"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .show(ctx, |ui| {
                let label = if self.open { "Hide instructions" } else { "Show instructions" };
                if ui.button(label).clicked() {
                    self.toggle();
                }
            });

        if !self.open {
            return;
        }

        egui::Window::new("Instructions")
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 44.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("Each arrow shows the direction of the slope field at a lattice point.");
                if !equation.is_empty() {
                    ui.separator();
                    ui.monospace(equation);
                }
                ui.separator();
                match mode {
                    ControlMode::Auto => {
                        ui.label("The camera is orbiting on its own. Click anywhere in the scene to take control.");
                    }
                    ControlMode::Manual => {
                        ui.label("Left-drag to rotate.");
                        ui.label("Right-drag to pan.");
                        ui.label("Scroll to zoom.");
                    }
                }
                ui.separator();
                ui.weak("Press H to toggle this panel. Esc quits.");
            });
    }
}
