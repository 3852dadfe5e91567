use std::sync::Arc;

use eframe::egui;

use crate::config::RenderConfig;
use crate::data::model::GroupRecord;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Figure viewer
// ---------------------------------------------------------------------------

/// What the viewer window shows.
pub enum Figure {
    /// Prepared group rows, redrawn as two interactive panels.
    Groups(Vec<GroupRecord>),
    /// An encoded raster image, shown as rendered.
    Raster { name: String, bytes: Arc<[u8]> },
}

pub struct FigureViewer {
    figure: Figure,
    config: RenderConfig,
}

impl FigureViewer {
    pub fn new(figure: Figure, config: RenderConfig) -> Self {
        Self { figure, config }
    }

    fn raster_uri(name: &str) -> String {
        format!("bytes://{name}")
    }
}

impl eframe::App for FigureViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| match &self.figure {
            Figure::Groups(groups) => plot::group_panels(ui, groups, &self.config.groups),
            Figure::Raster { name, .. } => plot::raster_image(ui, &Self::raster_uri(name)),
        });
    }
}

/// Open a window showing `figure` and block until it is closed.
pub fn show(title: &str, figure: Figure, config: RenderConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can decode the rendered png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            if let Figure::Raster { name, bytes } = &figure {
                cc.egui_ctx
                    .include_bytes(FigureViewer::raster_uri(name), bytes.clone());
            }
            Ok(Box::new(FigureViewer::new(figure, config)))
        }),
    )
}
