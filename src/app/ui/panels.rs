use std::cell::{Cell, RefCell};
use std::rc::Rc;

use eframe::egui::{self, Align, Area, Context, Frame, Id, Layout, Sense, Vec2, vec2};

use bubble_chart::chart::{BubbleChart, ClickHandler, SimulationConfig};
use bubble_chart::data::{ColorClass, Dataset, Datum};

use super::super::render_utils::{FILL_OPACITY, bubble_stroke, class_color, with_opacity};
use super::super::{ChartView, DataSource, TickStats};

const LEGEND_SWATCH: f32 = 14.0;

impl ChartView {
    pub(in crate::app) fn new(
        dataset: Dataset,
        available: Option<Vec2>,
        seed: Option<u64>,
    ) -> Self {
        let mut chart = BubbleChart::new(dataset, available, SimulationConfig::default(), seed);

        let selected = Rc::new(RefCell::new(None));
        let selection = Rc::clone(&selected);
        chart.set_click_handler(Some(ClickHandler::new(move |datum: &Datum| {
            *selection.borrow_mut() = Some(datum.clone());
        })));

        let stats = Rc::new(Cell::new(TickStats {
            generation: chart.generation(),
            running: chart.is_running(),
            alpha: chart.simulation().alpha(),
            ..TickStats::default()
        }));
        let sink = Rc::clone(&stats);
        let tick_subscription = chart.on_tick(move |event| {
            sink.set(TickStats {
                generation: event.generation,
                tick: event.tick,
                alpha: event.alpha,
                running: event.running,
            });
        });

        Self {
            chart,
            selected,
            stats,
            _tick_subscription: tick_subscription,
            hovered: None,
            mouse_drag: None,
            show_legend: true,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &DataSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    let stats = self.stats.get();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("bubbles: {}", self.chart.dataset().len()));
                    ui.label(format!("generation: {}", stats.generation));
                    ui.label(format!("tick: {}", stats.tick));
                    ui.label(format!("alpha: {:.3}", stats.alpha));
                    ui.label(if stats.running { "running" } else { "settled" });

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reheat").clicked() {
                        self.chart.reheat();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.checkbox(&mut self.show_legend, "Legend");
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.draw_chart(ui));

        if self.show_legend {
            Self::draw_legend(ctx);
        }
        self.draw_details(ctx);
    }

    fn draw_legend(ctx: &Context) {
        Area::new(Id::new("legend"))
            .anchor(egui::Align2::RIGHT_TOP, vec2(-12.0, 48.0))
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    for class in [ColorClass::Positive, ColorClass::Negative] {
                        ui.horizontal(|ui| {
                            let (rect, _) = ui.allocate_exact_size(
                                vec2(LEGEND_SWATCH, LEGEND_SWATCH),
                                Sense::hover(),
                            );
                            let color = class_color(class);
                            ui.painter().circle(
                                rect.center(),
                                LEGEND_SWATCH * 0.5 - 1.0,
                                with_opacity(color, FILL_OPACITY),
                                bubble_stroke(color, false),
                            );
                            ui.label(format!("{class} change"));
                        });
                    }
                });
            });
    }
}
