pub mod asset;
pub mod config;
pub mod error;
pub mod gui;
pub mod input;
pub mod perf;
pub mod renderer;
pub mod scene;
pub mod transform;

pub use egui;
pub use egui_wgpu;
