use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{error, info};

use bubble_chart::chart::{BodyId, BubbleChart, PointerId, Subscription};
use bubble_chart::data::{Dataset, Datum, load_dataset, sample_dataset};

mod chart;
mod render_utils;
mod ui;

type LoadResult = Result<Dataset, String>;

/// Where the viewer reads its records from.
#[derive(Clone, Debug)]
pub enum DataSource {
    File(PathBuf),
    Sample,
}

impl DataSource {
    fn load(&self) -> anyhow::Result<Dataset> {
        match self {
            Self::File(path) => load_dataset(path),
            Self::Sample => sample_dataset(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Sample => f.write_str("bundled sample"),
        }
    }
}

pub struct BubbleChartApp {
    source: DataSource,
    seed: Option<u64>,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ChartView>),
    Error(String),
}

/// Tick statistics mirrored out of the chart by a tick listener.
#[derive(Clone, Copy, Debug, Default)]
struct TickStats {
    generation: u64,
    tick: u64,
    alpha: f32,
    running: bool,
}

struct ChartView {
    chart: BubbleChart,
    selected: Rc<RefCell<Option<Datum>>>,
    stats: Rc<Cell<TickStats>>,
    _tick_subscription: Subscription,
    hovered: Option<BodyId>,
    mouse_drag: Option<PointerId>,
    show_legend: bool,
}

impl BubbleChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: DataSource, seed: Option<u64>) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            seed,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DataSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DataSource) -> AppState {
        info!(source:% = source; "Loading dataset");
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn loaded(&self, result: LoadResult) -> AppState {
        match result {
            // The first frame feeds the real panel size.
            Ok(dataset) => AppState::Ready(Box::new(ChartView::new(dataset, None, self.seed))),
            Err(message) => {
                error!(source:% = self.source; "Failed to load dataset: {message}");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for BubbleChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dataset");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(view) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                view.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!(source:% = self.source; "Reloading dataset");
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        // The chart keeps its bodies by name across a reload.
                        Ok(Ok(dataset)) => view.chart.set_data(dataset),
                        Ok(Err(message)) => transition = Some(Err(message)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
        } else if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.loaded(result);
        }
    }
}
