use std::sync::mpsc::Sender;

use egui::{Align2, CollapsingHeader, Context, Id, Window};

use crate::{input::StoreRequest, transform::TransformStore};

use super::{matrix::matrix_label, GuiAction};

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn transform_state(
    ctx: &Context,
    store: &TransformStore,
    applied_texture: usize,
    texture_count: usize,
    gui_actions_tx: &mut Sender<GuiAction>,
) {
    Window::new("Transform State")
        .resizable([false, false])
        .pivot(Align2::LEFT_TOP)
        .show(ctx, |ui| {
            let selection = store.selection();
            match selection.selected_index {
                Some(index) => ui.label(format!("Selected: #{}", index)),
                None => ui.label("Selected: none"),
            };
            ui.label(format!("Rotating: {}", flag(selection.rotation_active)));
            ui.label(format!("Scale pending: {}", flag(selection.scale_pending)));
            ui.label(format!(
                "Recenter pending: {}",
                flag(selection.recenter_pending)
            ));
            ui.label(format!("Angle: {:.1}°", selection.accumulated_angle));

            ui.horizontal(|ui| {
                let requests = [
                    ("Select", StoreRequest::Select),
                    ("Scale", StoreRequest::Scale),
                    ("Recenter", StoreRequest::Recenter),
                    ("Reset", StoreRequest::Reset),
                ];
                for (text, request) in requests {
                    if ui.button(text).clicked() {
                        let _ = gui_actions_tx.send(GuiAction::Request(request));
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Texture:");
                for texture in 0..texture_count {
                    let text = format!("#{}", texture + 1);
                    if ui.selectable_label(applied_texture == texture, text).clicked() {
                        let _ = gui_actions_tx.send(GuiAction::ApplyTexture(texture));
                    }
                }
            });

            ui.separator();
            for object in store.objects() {
                let selected = selection.selected_index == Some(object.id());
                let title = if selected {
                    format!("Object #{} (selected)", object.id())
                } else {
                    format!("Object #{}", object.id())
                };
                CollapsingHeader::new(title)
                    .id_salt(Id::new("Object").with(object.id()))
                    .default_open(selected)
                    .show(ui, |ui| {
                        let center = object.world_center();
                        ui.label(format!(
                            "Pivot: ({:.2}, {:.2}, {:.2})",
                            center.x, center.y, center.z
                        ));
                        matrix_label(
                            ui,
                            Id::new("Object Matrix").with(object.id()),
                            object.transform(),
                        );
                    });
            }
        });
}
