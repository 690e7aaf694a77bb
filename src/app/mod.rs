use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::config::AnalysisConfig;
use crate::graph::DependencyGraph;
use crate::layout::LayoutSession;
use crate::records::{ComparisonRecord, IngestReport, RecordStore, generate};
use crate::scoring::{FundingPriority, ScoreTable};

mod graph;
mod render_utils;
mod ui;

/// Where the viewer gets its comparison records from.
#[derive(Clone, Debug)]
pub enum DataSource {
    File(PathBuf),
    Synthetic {
        count: usize,
        seed: u64,
        extended_multiplier: bool,
    },
}

impl DataSource {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Synthetic { count, seed, .. } => format!("synthetic ({count} records, seed {seed})"),
        }
    }

    fn load(&self, config: &AnalysisConfig) -> Result<LoadedRecords, String> {
        let (store, report) = match self {
            Self::File(path) => {
                RecordStore::load(path, &config.import).map_err(|error| error.to_string())?
            }
            Self::Synthetic {
                count,
                seed,
                extended_multiplier,
            } => RecordStore::from_records(generate(*count, *seed, *extended_multiplier)),
        };

        Ok(LoadedRecords {
            records: store.records().to_vec(),
            report,
        })
    }
}

struct LoadedRecords {
    records: Vec<ComparisonRecord>,
    report: IngestReport,
}

type LoadResult = Result<LoadedRecords, String>;

pub struct CriticalityApp {
    source: DataSource,
    config: AnalysisConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    config: AnalysisConfig,
    records: Vec<ComparisonRecord>,
    ingest_summary: String,
    scores: ScoreTable,
    priorities: Vec<FundingPriority>,
    min_edge_count: u32,
    max_edge_count: u32,
    largest_component_only: bool,
    graph: DependencyGraph,
    session: LayoutSession,
    graph_dirty: bool,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<String>,
    priority_rows_visible: usize,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<HashSet<usize>>,
}

impl CriticalityApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: DataSource, config: AnalysisConfig) -> Self {
        let state = Self::start_load(source.clone(), config.clone());
        Self {
            source,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DataSource, config: AnalysisConfig) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(source.load(&config));
        });

        rx
    }

    fn start_load(source: DataSource, config: AnalysisConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source, config),
        }
    }

    fn ready_state(&self, result: LoadResult) -> AppState {
        match result {
            Ok(loaded) if loaded.records.is_empty() => {
                AppState::Error(format!("No usable comparison records ({})", loaded.report.summary()))
            }
            Ok(loaded) => AppState::Ready(Box::new(ViewModel::new(loaded, self.config.clone()))),
            Err(error) => AppState::Error(error),
        }
    }
}

impl eframe::App for CriticalityApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;
        let source_label = self.source.describe();

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
                        ui.heading("Loading comparison records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load comparison records");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &source_label, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone(), self.config.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone(), self.config.clone());
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.ready_state(result);
        }
    }
}
