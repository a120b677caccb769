use std::path::Path;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use dashboard_client::ClientHandle;
use dashboard_core::{update, AppState, AppViewModel, JobId, Msg};
use dashboard_logging::dash_info;
use ratatui::widgets::TableState;
use ratatui::DefaultTerminal;

use super::config;
use super::effects::EffectRunner;
use super::keys::{self, KeyAction};
use super::logging;
use super::ui;

pub fn run_app() -> Result<()> {
    logging::initialize(Path::new(logging::LOG_PATH));

    let config = config::load_from_environment();
    let api = config.api_settings().context("invalid dashboard configuration")?;
    let poll = config.poll_settings().context("invalid dashboard configuration")?;
    dash_info!("Dashboard starting against {}", api.base_url);
    let client = ClientHandle::new(api, poll).context("failed to start the API client")?;

    let mut terminal = ratatui::try_init().context("failed to set up the terminal")?;
    let result = App::new(EffectRunner::new(client)).run(&mut terminal);
    ratatui::try_restore().context("failed to restore the terminal")?;
    dash_info!("Dashboard exited");
    result
}

struct App {
    state: AppState,
    effects: EffectRunner,
    view: AppViewModel,
    table: TableState,
    needs_render: bool,
}

impl App {
    fn new(effects: EffectRunner) -> Self {
        let state = AppState::new();
        let view = state.view();
        Self {
            state,
            effects,
            view,
            table: TableState::default(),
            needs_render: true,
        }
    }

    fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.dispatch_msg(Msg::Started);

        loop {
            for msg in self.effects.drain() {
                self.dispatch_msg(msg);
            }
            if self.state.is_quitting() {
                break;
            }

            if self.needs_render {
                terminal.draw(|frame| ui::render::render(frame, &self.view, &mut self.table))?;
                self.needs_render = false;
            }

            if event::poll(ui::constants::TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(..) => self.needs_render = true,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        let view = state.view();
        let mut state = state;
        if state.consume_dirty() {
            self.view = view;
            self.clamp_selection();
            self.needs_render = true;
        }
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match keys::translate(key, &self.view, self.selected_job()) {
            KeyAction::Dispatch(msg) => self.dispatch_msg(msg),
            KeyAction::MoveSelection(delta) => self.move_selection(delta),
            KeyAction::Ignore => {}
        }
    }

    fn selected_job(&self) -> Option<JobId> {
        self.table
            .selected()
            .and_then(|index| self.view.jobs.get(index))
            .map(|row| row.job_id)
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.view.jobs.len().checked_sub(1) else {
            return;
        };
        let current = self.table.selected().unwrap_or(0);
        self.table
            .select(Some(current.saturating_add_signed(delta).min(last)));
        self.needs_render = true;
    }

    /// Keeps the cursor on a real row after the list was replaced.
    fn clamp_selection(&mut self) {
        let selection = match self.view.jobs.len().checked_sub(1) {
            None => None,
            Some(last) => Some(self.table.selected().map_or(0, |index| index.min(last))),
        };
        self.table.select(selection);
    }
}
