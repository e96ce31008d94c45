//! Chart Plotter Module
//! Draws the interactive dashboard charts using egui_plot.

use crate::charts::{category_tick, group_rgb, HISTOGRAM_RGB};
use crate::stats::{format_currency, GroupMean, Histogram};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};

fn color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn group_color(index: usize) -> Color32 {
        color32(group_rgb(index))
    }

    /// Price distribution: one bar per bin, spanning the bin's range.
    pub fn draw_histogram(ui: &mut egui::Ui, histogram: &Histogram, height: f32) {
        let color = color32(HISTOGRAM_RGB);
        let bars: Vec<Bar> = histogram
            .bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width())
                    .name(format!(
                        "{} - {}",
                        format_currency(bin.start),
                        format_currency(bin.end)
                    ))
                    .fill(color)
            })
            .collect();

        Plot::new("price_histogram")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Price")
            .y_axis_label("Count")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name("Price"));
            });
    }

    /// Mean price per group, one colored bar per group.
    /// Groups with a NaN mean keep their axis slot but draw no bar.
    pub fn draw_group_means(ui: &mut egui::Ui, means: &[GroupMean], height: f32) {
        let labels: Vec<String> = means.iter().map(|g| g.group.clone()).collect();

        Plot::new("group_means")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Make")
            .y_axis_label("Average Price")
            .include_y(0.0)
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, group) in means.iter().enumerate() {
                    if !group.mean.is_finite() {
                        continue;
                    }
                    let color = Self::group_color(i);
                    let bar = Bar::new(i as f64, group.mean)
                        .width(0.6)
                        .name(format!("{} (n={})", group.group, group.count))
                        .fill(color);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(&group.group));
                }
            });
    }
}
