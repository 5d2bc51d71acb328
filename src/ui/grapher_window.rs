use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot};

use crate::processing::chart_data::ChartData;
use crate::state::session::GrapherSession;
use crate::state::settings::Settings;

/// Actions that the grapher window can request from the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrapherAction {
    None,
    Close,
    PlotValues,
    PlotVolumes,
    ExportCsv,
    SaveSnapshot,
}

/// Helper to create a footer button with consistent min size.
fn footer_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Footer button highlighted while its mode is shown.
fn footer_toggle_btn(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(0.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
    };
    ui.add(btn)
}

/// Render the "VOI Tool" window. Returns the requested action and the screen
/// rect of the chart, when one was drawn this frame.
pub fn show_grapher_window(
    ctx: &egui::Context,
    session: &mut GrapherSession,
    settings: &Settings,
) -> (GrapherAction, Option<egui::Rect>) {
    if !session.is_window_open() {
        return (GrapherAction::None, None);
    }

    let mut action = GrapherAction::None;
    let mut chart_rect = None;
    let mut open = true;

    let layout = *session.layout();
    let mode_buttons = session.mode_buttons_visible();
    let show_volume = session.show_volume();
    let background = settings.canvas_background.to_color32();
    let deferred = session.chart_for_frame().is_none();
    if deferred {
        ctx.request_repaint();
    }

    egui::Window::new("VOI Tool")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .fixed_pos(layout.dialog_pos)
        .fixed_size(layout.dialog_size)
        .frame(egui::Frame::window(&ctx.style()).fill(background))
        .show(ctx, |ui| {
            let [w, h] = layout.canvas_size;
            ui.allocate_ui(egui::Vec2::from(layout.widget_size), |ui| {
                match session.chart() {
                    Some(chart) if !deferred => {
                        chart_rect = Some(draw_chart(ui, chart, w, h));
                    }
                    _ => {
                        ui.allocate_space(egui::vec2(w, h));
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 10.0;
                if mode_buttons {
                    if footer_toggle_btn(ui, "Plot VOI Values", !show_volume)
                        .on_hover_text("Mean intensity of each region")
                        .clicked()
                    {
                        action = GrapherAction::PlotValues;
                    }
                    if footer_toggle_btn(ui, "Plot VOI Volumes", show_volume)
                        .on_hover_text("Voxel count of each region")
                        .clicked()
                    {
                        action = GrapherAction::PlotVolumes;
                    }
                    ui.separator();
                }
                if footer_btn(ui, "Export as CSV").on_hover_text("Export Data").clicked() {
                    action = GrapherAction::ExportCsv;
                }
                if footer_btn(ui, "Save Snapshot")
                    .on_hover_text("Save the chart as a PNG image")
                    .clicked()
                {
                    action = GrapherAction::SaveSnapshot;
                }
            });
        });

    if !open {
        action = GrapherAction::Close;
    }
    (action, chart_rect)
}

/// Draw the chart into a `width` x `height` area and return its rect.
fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, width: f32, height: f32) -> egui::Rect {
    let title_resp = ui.label(RichText::new(chart.title()).strong().color(Color32::WHITE));
    let plot_height = (height - title_resp.rect.height()).max(0.0);

    let plot = Plot::new("voi_chart")
        .width(width)
        .height(plot_height)
        .x_axis_label(chart.x_axis_label())
        .y_axis_label(chart.y_axis_label())
        .legend(Legend::default().position(Corner::RightTop).background_alpha(0.6));

    let response = match chart {
        ChartData::TimeSeries { x, series } => {
            plot.show(ui, |plot_ui| {
                for s in series {
                    let points: Vec<[f64; 2]> =
                        x.iter().zip(&s.values).map(|(&x, &y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(&s.label)
                            .color(s.color.to_color32())
                            .width(1.0),
                    );
                }
            })
            .response
        }
        ChartData::Bars { bars, .. } => {
            plot.include_y(0.0)
                .show(ui, |plot_ui| {
                    let bars: Vec<Bar> = bars
                        .iter()
                        .map(|b| {
                            Bar::new(b.index as f64, b.value)
                                .width(0.8)
                                .name(&b.label)
                                .fill(b.color.to_color32())
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(chart.title()));
                })
                .response
        }
    };

    title_resp.rect.union(response.rect)
}
