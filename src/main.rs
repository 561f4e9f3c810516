mod state;
mod data;
mod processing;
mod ui;
mod app;

use app::EcoGeoApp;
use eframe::egui;
use eframe::egui_wgpu;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("EcoGeo Lab")
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([720.0, 560.0])
            .with_drag_and_drop(true),
        // DX12 first, with Vulkan and GL as fallbacks.
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "EcoGeo Lab",
        options,
        Box::new(|cc| Ok(Box::new(EcoGeoApp::new(cc)))),
    )
}
