use std::io::Write;
use std::path::Path;

use eframe::egui;
use thiserror::Error;

use crate::processing::classification::Descriptors;
use crate::processing::grain_size::GrainSizeAnalysis;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("screenshot buffer does not match {width}x{height}")]
    BadBuffer { width: usize, height: usize },

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Write the cumulative curve followed by the statistics table.
pub fn write_analysis_csv<W: Write>(mut out: W, analysis: &GrainSizeAnalysis) -> Result<(), ExportError> {
    let dist = &analysis.distribution;
    let stats = &analysis.statistics;

    writeln!(out, "Phi,Weight (%),Cumulative (%)")?;
    for ((phi, w), cum) in dist
        .phi()
        .iter()
        .zip(dist.weight_percent())
        .zip(dist.cumulative_percent())
    {
        writeln!(out, "{phi},{w},{cum}")?;
    }

    writeln!(out)?;
    writeln!(out, "Statistic,Value")?;
    for (level, phi) in stats.percentiles.as_pairs() {
        writeln!(out, "Phi{level},{phi}")?;
    }
    writeln!(out, "Mean (Mz),{}", stats.mean)?;
    writeln!(out, "Sorting,{}", stats.sorting)?;
    writeln!(out, "Skewness (Sk),{}", stats.skewness)?;
    if let Some(k) = stats.kurtosis {
        writeln!(out, "Kurtosis (Kg),{k}")?;
    }

    let d = Descriptors::describe(stats);
    writeln!(out, "Mean class,{}", d.mean)?;
    writeln!(out, "Sorting class,{}", d.sorting)?;
    writeln!(out, "Skewness class,{}", d.skewness)?;
    if let Some(k) = d.kurtosis {
        writeln!(out, "Kurtosis class,{k}")?;
    }
    Ok(())
}

pub fn save_analysis_csv(path: &Path, analysis: &GrainSizeAnalysis) -> Result<(), ExportError> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_analysis_csv(file, analysis)?;
    tracing::info!("Exported analysis CSV to {:?}", path);
    Ok(())
}

/// RGBA pixels cropped out of a screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaCrop {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Crop `rect` (in points) out of a viewport screenshot. With no rect the
/// whole image is returned.
pub fn crop_screenshot(image: &egui::ColorImage, rect: Option<egui::Rect>, pixels_per_point: f32) -> RgbaCrop {
    let full_w = image.width();
    let full_h = image.height();

    let (x0, y0, x1, y1) = match rect {
        Some(rect) => (
            ((rect.left() * pixels_per_point) as usize).min(full_w),
            ((rect.top() * pixels_per_point) as usize).min(full_h),
            ((rect.right() * pixels_per_point).ceil() as usize).min(full_w),
            ((rect.bottom() * pixels_per_point).ceil() as usize).min(full_h),
        ),
        None => (0, 0, full_w, full_h),
    };

    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in y0..y1 {
        for col in x0..x1 {
            let c = image.pixels[row * full_w + col];
            rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }

    RgbaCrop { width, height, rgba }
}

pub fn save_png(path: &Path, crop: RgbaCrop) -> Result<(), ExportError> {
    let (width, height) = (crop.width, crop.height);
    let img = image::RgbaImage::from_raw(width as u32, height as u32, crop.rgba)
        .ok_or(ExportError::BadBuffer { width, height })?;
    img.save(path)?;
    tracing::info!("Saved plot image to {:?}", path);
    Ok(())
}

pub fn copy_to_clipboard(crop: RgbaCrop) -> Result<(), ExportError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width: crop.width,
        height: crop.height,
        bytes: std::borrow::Cow::Owned(crop.rgba),
    })?;
    tracing::info!("Copied plot image to clipboard");
    Ok(())
}
