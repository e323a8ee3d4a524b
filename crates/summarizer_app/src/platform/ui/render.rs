use eframe::egui;
use summarizer_core::{AppViewModel, ModelChoice, Msg};

use super::constants::*;

/// Draws the window contents and returns the messages produced by user input.
pub fn render(ui: &mut egui::Ui, view: &AppViewModel) -> Vec<Msg> {
    let mut msgs = Vec::new();

    ui.label(LABEL_URL);
    let mut url = view.url_input.clone();
    let url_field = ui.add(
        egui::TextEdit::singleline(&mut url)
            .hint_text(HINT_URL)
            .desired_width(f32::INFINITY),
    );
    if url_field.changed() {
        msgs.push(Msg::UrlChanged(url));
    }
    let enter_pressed =
        url_field.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

    ui.horizontal(|ui| {
        for choice in [ModelChoice::Hosted, ModelChoice::Local] {
            if ui.radio(view.model == choice, choice.label()).clicked() {
                msgs.push(Msg::ModelSelected(choice));
            }
        }
    });

    let clicked = ui
        .add_enabled(view.summarize_enabled, egui::Button::new(BUTTON_SUMMARIZE))
        .clicked();
    if clicked || enter_pressed {
        msgs.push(Msg::SummarizeClicked);
    }

    ui.horizontal(|ui| {
        if view.busy {
            ui.spinner();
        }
        ui.label(view.status_text.as_str());
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        // A `&str` buffer keeps the pane read-only while still selectable.
        let mut output = view.output.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut output)
                .desired_width(f32::INFINITY)
                .desired_rows(OUTPUT_ROWS),
        );
    });

    msgs
}
