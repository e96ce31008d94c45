//! Static Chart Renderer
//! Renders the dashboard charts to PNG images with plotters, for saving to disk.
//!
//! Drawing happens into an in-memory RGB buffer which is then encoded with
//! the `image` crate, so no temp files are involved.

use crate::charts::{category_tick, group_rgb, HISTOGRAM_RGB};
use crate::stats::{format_currency, GroupMean, Histogram};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("Chart buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render the price histogram as PNG bytes.
    pub fn histogram_png(
        histogram: &Histogram,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let (x_min, x_max) = match (histogram.bins.first(), histogram.bins.last()) {
                (Some(first), Some(last)) => (first.start, last.end),
                _ => (0.0, 1.0),
            };
            let y_max = histogram.max_count() as u32 + 1;

            let mut chart = ChartBuilder::on(&root)
                .caption("Price Distribution", ("sans-serif", 24))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x_min..x_max, 0u32..y_max)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Price")
                .y_desc("Count")
                .x_label_formatter(&|v: &f64| format_currency(*v))
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(histogram.bins.iter().map(|bin| {
                    Rectangle::new(
                        [(bin.start, 0u32), (bin.end, bin.count as u32)],
                        rgb(HISTOGRAM_RGB).filled(),
                    )
                }))
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    /// Render the mean-price-per-group bar chart as PNG bytes.
    pub fn group_means_png(
        means: &[GroupMean],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let labels: Vec<String> = means.iter().map(|g| g.group.clone()).collect();
        let finite: Vec<f64> = means
            .iter()
            .map(|g| g.mean)
            .filter(|m| m.is_finite())
            .collect();
        let y_max = finite.iter().copied().fold(0.0_f64, f64::max);
        let y_min = finite.iter().copied().fold(0.0_f64, f64::min);
        let y_max = if y_max > y_min { y_max * 1.1 } else { y_min + 1.0 };

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let x_max = means.len().max(1) as f64 - 0.5;
            let mut chart = ChartBuilder::on(&root)
                .caption("Average Price by Brand", ("sans-serif", 24))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(-0.5..x_max, y_min..y_max)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len().max(1))
                .x_label_formatter(&|v: &f64| category_tick(&labels, *v))
                .y_label_formatter(&|v: &f64| format_currency(*v))
                .x_desc("Make")
                .y_desc("Average Price")
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(
                    means
                        .iter()
                        .enumerate()
                        .filter(|(_, g)| g.mean.is_finite())
                        .map(|(i, g)| {
                            let x = i as f64;
                            Rectangle::new(
                                [(x - 0.3, 0.0), (x + 0.3, g.mean)],
                                rgb(group_rgb(i)).filled(),
                            )
                        }),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    /// Encode a packed RGB buffer as PNG.
    pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let buffer = vec![255u8; 4 * 3 * 3];
        let png = ChartRenderer::encode_png(buffer, 4, 3).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        let err = ChartRenderer::encode_png(vec![0u8; 5], 4, 3).unwrap_err();
        assert!(matches!(err, RenderError::Buffer(4, 3)));
    }
}
