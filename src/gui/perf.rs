use egui::{Align2, Context, Window};

use crate::perf::PerformanceTracker;

pub fn perf_info(ctx: &Context, perf_tracker: &PerformanceTracker) {
    Window::new("Performance Info")
        .resizable([false, false])
        .pivot(Align2::RIGHT_BOTTOM)
        .show(ctx, |ui| {
            match perf_tracker.last_frame_time() {
                Some(time) => ui.label(format!("Frame time: {:.2}ms", time.as_secs_f32() * 1000.0)),
                None => ui.label("Frame time: unknown"),
            };
            match perf_tracker.avg_frame_time() {
                Some(time) => {
                    ui.label(format!("Avg frame time: {:.2}ms", time.as_secs_f32() * 1000.0))
                }
                None => ui.label("Avg frame time: unknown"),
            };
            match perf_tracker.fps() {
                Some(fps) => ui.label(format!("FPS: {:#.2}", fps)),
                None => ui.label("FPS: unknown"),
            };
        });
}
