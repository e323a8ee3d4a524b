use anyhow::Context;
use eframe::egui;
use summarizer_core::{update, AppState, Msg};
use summarizer_engine::{EngineConfig, EngineHandle, Summarizer};
use summarizer_logging::{summarizer_error, summarizer_info};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;
use super::ui::constants::{APP_ID, BUSY_POLL_INTERVAL, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};

pub fn run_app() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::initialize(LogDestination::from_env());

    let engine = start_engine().map_err(|err| {
        summarizer_error!("{:#}", err);
        err
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        APP_ID,
        options,
        Box::new(move |_cc| Ok(Box::new(SummarizerApp::new(EffectRunner::new(engine))))),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

fn start_engine() -> anyhow::Result<EngineHandle> {
    let config = EngineConfig::from_env().context("invalid configuration")?;
    let summarizer = Summarizer::from_config(&config).context("failed to build HTTP clients")?;
    let engine = EngineHandle::new(summarizer).context("failed to start engine")?;
    summarizer_info!(
        "Engine ready (hosted {} at {}, local {} at {})",
        config.hosted.model,
        config.hosted.base_url,
        config.local.model,
        config.local.base_url
    );
    Ok(engine)
}

struct SummarizerApp {
    state: AppState,
    effects: EffectRunner,
}

impl SummarizerApp {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let mut pending = vec![msg];
        while let Some(msg) = pending.pop() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            pending.extend(self.effects.enqueue(effects));
        }
    }
}

impl eframe::App for SummarizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for msg in self.effects.drain_events() {
            self.dispatch_msg(msg);
        }

        let view = self.state.view();
        let msgs = egui::CentralPanel::default()
            .show(ctx, |ui| ui::render::render(ui, &view))
            .inner;
        for msg in msgs {
            self.dispatch_msg(msg);
        }

        if self.state.consume_dirty() {
            ctx.request_repaint();
        } else if self.state.is_busy() {
            ctx.request_repaint_after(BUSY_POLL_INTERVAL);
        }
    }
}
