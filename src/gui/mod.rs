use std::sync::mpsc::Sender;

use egui::Context;
use error::error_dialog;
use perf::perf_info;
use store::transform_state;

use crate::{input::StoreRequest, perf::PerformanceTracker, transform::TransformStore};

mod error;
mod matrix;
mod perf;
mod store;

#[derive(Default)]
pub struct GuiState {
    errors: Vec<String>,
}

impl GuiState {
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiAction {
    Request(StoreRequest),
    ApplyTexture(usize),
}

pub struct GuiContext<'a> {
    pub store: &'a TransformStore,
    pub perf_tracker: &'a PerformanceTracker,
    pub applied_texture: usize,
    pub texture_count: usize,
}

pub fn gui_main(
    ctx: &Context,
    gui_ctx: GuiContext<'_>,
    state: &mut GuiState,
    gui_actions_tx: &mut Sender<GuiAction>,
) {
    transform_state(
        ctx,
        gui_ctx.store,
        gui_ctx.applied_texture,
        gui_ctx.texture_count,
        gui_actions_tx,
    );
    perf_info(ctx, gui_ctx.perf_tracker);

    let mut remove_index = Vec::new();
    for (index, error) in state.errors.iter().enumerate() {
        error_dialog(ctx, index, error, || {
            remove_index.push(index);
        });
    }
    for index in remove_index.into_iter().rev() {
        state.errors.remove(index);
    }
}
