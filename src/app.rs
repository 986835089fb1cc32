//! The egui application shell.
//!
//! Remote work never blocks the UI thread: a button press spawns one worker
//! thread that runs the matching command and delivers a [`JobResult`] over
//! an mpsc channel. While a job is in flight the action buttons are
//! disabled and a spinner with a status line is shown. A failed job only
//! produces an inline error message — the session state is applied solely
//! from successful results, on this thread.

use crate::canvas::SketchCanvas;
use crate::client::{ClientConfig, ModelClient};
use crate::commands::{self, Analysis, Enhanced};
use crate::components::results::ResultsPanel;
use crate::session::SessionState;
use crate::{log_err, log_info, t};
use eframe::egui;
use egui::{Color32, RichText};
use image::RgbaImage;
use std::sync::mpsc;

// ============================================================================
// BACKGROUND JOB PIPELINE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Analyze,
    Pack,
    Story,
    Enhance,
}

impl JobKind {
    fn status_key(self) -> &'static str {
        match self {
            JobKind::Analyze => "status.analyzing",
            JobKind::Pack => "status.packing",
            JobKind::Story => "status.storifying",
            JobKind::Enhance => "status.enhancing",
        }
    }
}

/// Result delivered from a worker thread.
pub enum JobResult {
    Analyzed(Analysis),
    PackReady(String),
    StoryReady(String),
    EnhancedReady(Enhanced),
    Failed { kind: JobKind, message: String },
}

/// One unit of background work, carrying exactly the input it needs — a
/// kind/payload mismatch is unrepresentable.
enum Job {
    Analyze(RgbaImage),
    Pack(String),
    Story(String),
    Enhance(String),
}

impl Job {
    fn kind(&self) -> JobKind {
        match self {
            Job::Analyze(_) => JobKind::Analyze,
            Job::Pack(_) => JobKind::Pack,
            Job::Story(_) => JobKind::Story,
            Job::Enhance(_) => JobKind::Enhance,
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct TableroApp {
    canvas: SketchCanvas,
    session: SessionState,
    results: ResultsPanel,

    // Brush configuration
    stroke_width: f32,
    stroke_color: Color32,
    background_color: Color32,

    // Credential — session memory only, never persisted
    api_key: String,

    // Worker channel; at most one job in flight
    job_sender: mpsc::Sender<JobResult>,
    job_receiver: mpsc::Receiver<JobResult>,
    pending_job: Option<JobKind>,

    /// Inline error from the last failed job, cleared on the next attempt.
    last_error: Option<String>,
    /// Decoded pixels behind `session.enhanced_image_url`.
    enhanced_image: Option<RgbaImage>,
}

impl TableroApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (job_sender, job_receiver) = mpsc::channel();
        Self {
            canvas: SketchCanvas::new(),
            session: SessionState::new(),
            results: ResultsPanel::default(),
            stroke_width: 5.0,
            stroke_color: Color32::BLACK,
            background_color: Color32::WHITE,
            api_key: String::new(),
            job_sender,
            job_receiver,
            pending_job: None,
            last_error: None,
            enhanced_image: None,
        }
    }

    fn spawn_job(&mut self, ctx: &egui::Context, job: Job) {
        let config = ClientConfig::new(self.api_key.trim());
        let sender = self.job_sender.clone();
        let ctx = ctx.clone();

        self.pending_job = Some(job.kind());
        self.last_error = None;
        log_info!("job started: {:?}", job.kind());

        std::thread::spawn(move || {
            let result = run_job(job, config);
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Apply finished jobs. Only successful outcomes touch the session.
    fn drain_job_results(&mut self) {
        while let Ok(result) = self.job_receiver.try_recv() {
            self.pending_job = None;
            match result {
                JobResult::Analyzed(analysis) => {
                    log_info!("analysis done ({} chars)", analysis.description.len());
                    self.enhanced_image = None;
                    self.session
                        .apply_analysis(analysis.base64_image, analysis.description);
                }
                JobResult::PackReady(pack) => {
                    log_info!("creative pack ready ({} chars)", pack.len());
                    self.session.apply_pack(pack);
                }
                JobResult::StoryReady(story) => {
                    log_info!("story ready ({} chars)", story.len());
                    self.session.apply_story(story);
                }
                JobResult::EnhancedReady(enhanced) => match image::load_from_memory(
                    &enhanced.bytes,
                ) {
                    Ok(img) => {
                        log_info!("enhanced image ready: {}", enhanced.url);
                        self.enhanced_image = Some(img.into_rgba8());
                        self.session.apply_enhanced(enhanced.url);
                    }
                    Err(e) => {
                        log_err!("enhanced image decode failed: {}", e);
                        self.last_error = Some(t!("status.error", detail = e));
                    }
                },
                JobResult::Failed { kind, message } => {
                    log_err!("job {:?} failed: {}", kind, message);
                    self.last_error = Some(t!("status.error", detail = message));
                }
            }
        }
    }

    // ---- panels ------------------------------------------------------------

    fn show_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading(t!("sidebar.about_title"));
        ui.label(t!("sidebar.about_body"));
        ui.separator();

        ui.label(RichText::new(t!("sidebar.brush")).strong());
        ui.add(
            egui::Slider::new(&mut self.stroke_width, 1.0..=30.0)
                .integer()
                .text(t!("sidebar.stroke_width")),
        );
        ui.horizontal(|ui| {
            ui.color_edit_button_srgba(&mut self.stroke_color);
            ui.label(t!("sidebar.stroke_color"));
        });
        ui.horizontal(|ui| {
            ui.color_edit_button_srgba(&mut self.background_color);
            ui.label(t!("sidebar.background"));
        });
        self.canvas.set_background(self.background_color);

        // Clearing the sketch also drops everything derived from it.
        if ui.button(t!("sidebar.clear")).clicked() {
            self.canvas.clear();
            self.session.reset();
            self.enhanced_image = None;
            self.last_error = None;
        }
        ui.separator();

        ui.label(RichText::new(t!("sidebar.credential")).strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.api_key)
                .password(true)
                .hint_text(t!("sidebar.credential_hint")),
        );
        if self.api_key.trim().is_empty() {
            ui.label(RichText::new(t!("sidebar.credential_warning")).color(Color32::GOLD));
        }
        ui.separator();

        ui.horizontal(|ui| {
            ui.label(t!("sidebar.language"));
            let current = crate::i18n::current_language();
            let current_name = crate::i18n::LANGUAGES
                .iter()
                .find(|(code, _)| *code == current)
                .map(|(_, name)| *name)
                .unwrap_or("English");
            egui::ComboBox::from_id_source("language_select")
                .selected_text(current_name)
                .show_ui(ui, |ui| {
                    for (code, name) in crate::i18n::LANGUAGES {
                        if ui.selectable_label(current == *code, *name).clicked() {
                            crate::i18n::set_language(code);
                        }
                    }
                });
        });
    }

    fn show_actions(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let has_key = !self.api_key.trim().is_empty();
        let idle = self.pending_job.is_none();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_key && idle, egui::Button::new(t!("action.analyze")))
                .clicked()
            {
                let snapshot = self.canvas.snapshot();
                self.spawn_job(ctx, Job::Analyze(snapshot));
            }

            let derived_ready = has_key && idle && self.session.analysis_done;
            if ui
                .add_enabled(derived_ready, egui::Button::new(t!("action.pack")))
                .clicked()
            {
                let description = self.session.full_response.clone();
                self.spawn_job(ctx, Job::Pack(description));
            }
            if ui
                .add_enabled(derived_ready, egui::Button::new(t!("action.story")))
                .clicked()
            {
                let description = self.session.full_response.clone();
                self.spawn_job(ctx, Job::Story(description));
            }
            if ui
                .add_enabled(derived_ready, egui::Button::new(t!("action.enhance")))
                .clicked()
            {
                let description = self.session.full_response.clone();
                self.spawn_job(ctx, Job::Enhance(description));
            }
        });

        if let Some(kind) = self.pending_job {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(t!(kind.status_key()));
            });
        }
        if let Some(error) = &self.last_error {
            ui.label(RichText::new(error).color(Color32::LIGHT_RED));
        }
    }
}

impl eframe::App for TableroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_job_results();

        egui::SidePanel::left("sidebar")
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_sidebar(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(t!("app.title"));
            ui.add_space(4.0);
            let _canvas_response = self.canvas.show(ui, self.stroke_width, self.stroke_color);
            ui.add_space(4.0);
            self.show_actions(ui, ctx);
            ui.separator();
            egui::ScrollArea::vertical()
                .id_source("results_scroll")
                .show(ui, |ui| {
                    self.results
                        .show(ui, &self.session, self.enhanced_image.as_ref());
                });
        });
    }
}

/// Runs on the worker thread: build the client, run the command, map the
/// outcome. Never touches app state.
fn run_job(job: Job, config: ClientConfig) -> JobResult {
    let kind = job.kind();
    let client = match ModelClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            return JobResult::Failed {
                kind,
                message: e.to_string(),
            }
        }
    };

    let outcome = match job {
        Job::Analyze(snapshot) => commands::analyze(&client, &snapshot).map(JobResult::Analyzed),
        Job::Pack(description) => {
            commands::create_pack(&client, &description).map(JobResult::PackReady)
        }
        Job::Story(description) => {
            commands::create_story(&client, &description).map(JobResult::StoryReady)
        }
        Job::Enhance(description) => {
            commands::enhance(&client, &description).map(JobResult::EnhancedReady)
        }
    };

    outcome.unwrap_or_else(|e| JobResult::Failed {
        kind,
        message: e.to_string(),
    })
}
