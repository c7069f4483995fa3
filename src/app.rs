use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{Event as CEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{ExecutableCommand, execute, terminal};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::config::CatalogLoadReport;
use crate::domain::{CatalogItem, assemble_message};
use crate::git::{CommandResult, GitClient};
use crate::ui;
use crate::widgets::{SelectList, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectType,
    SelectScope,
    EnterTitle,
    Confirm,
    Done,
}

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Self::SelectType => "Select commit type",
            Self::SelectScope => "Select commit scope",
            Self::EnterTitle => "Enter commit title",
            Self::Confirm => "Confirm commit",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed { message: String },
    CommitFailed { detail: String },
    Cancelled,
}

#[derive(Debug)]
pub enum AppEvent {
    CommitFinished {
        result: Result<CommandResult, String>,
    },
}

pub struct App {
    pub stage: Stage,
    pub type_list: SelectList,
    pub scope_list: SelectList,
    pub title_input: TextInput,
    pub selected_type: Option<CatalogItem>,
    pub selected_scope: Option<CatalogItem>,
    pub title: Option<String>,
    pub status_line: String,
    pub outcome: Option<SessionOutcome>,
    pub should_quit: bool,
    commit_in_flight: bool,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    git: Arc<dyn GitClient>,
}

impl App {
    pub fn new(report: CatalogLoadReport, git: Arc<dyn GitClient>) -> Self {
        let status_line = if report.issues.is_empty() {
            "Type to filter, Enter to select, Esc to cancel.".to_string()
        } else {
            format!(
                "Config warning: {} ({} dropped)",
                report.issues.join("; "),
                report.dropped
            )
        };
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            stage: Stage::SelectType,
            type_list: SelectList::new(report.types),
            scope_list: SelectList::new(report.scopes),
            title_input: TextInput::new(),
            selected_type: None,
            selected_scope: None,
            title: None,
            status_line,
            outcome: None,
            should_quit: false,
            commit_in_flight: false,
            event_tx,
            event_rx,
            git,
        }
    }

    pub fn assembled_message(&self) -> String {
        assemble_message(
            self.selected_type
                .as_ref()
                .map(|item| item.code.as_str())
                .unwrap_or(""),
            self.selected_scope
                .as_ref()
                .map(|item| item.code.as_str())
                .unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
        )
    }

    pub async fn run(&mut self) -> Result<SessionOutcome> {
        enable_raw_mode().context("failed enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen)
            .context("failed entering alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed creating terminal")?;
        terminal.clear().ok();

        let mut event_stream = EventStream::new();
        let run_result = loop {
            if let Err(err) = terminal.draw(|f| {
                let rects = ui::compute_ui_rects(f.area());
                self.sync_viewports(&rects);
                ui::render(f, self, &rects);
            }) {
                break Err(anyhow::anyhow!("terminal draw failed: {err}"));
            }
            if self.should_quit {
                break Ok(());
            }

            tokio::select! {
                maybe_ui_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_ui_event {
                        match event {
                            CEvent::Key(key) => self.handle_key(key),
                            CEvent::Resize(width, height) => self.handle_resize(width, height),
                            _ => {}
                        }
                    }
                }
                maybe_app_event = self.event_rx.recv() => {
                    if let Some(app_event) = maybe_app_event {
                        self.handle_app_event(app_event);
                    }
                }
            }
        };

        restore_terminal(terminal);
        run_result?;
        Ok(self
            .outcome
            .clone()
            .unwrap_or(SessionOutcome::Cancelled))
    }

    fn sync_viewports(&mut self, rects: &ui::UiRects) {
        let rows = ui::list_body_rows(rects);
        self.type_list.resize(rows);
        self.scope_list.resize(rows);
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        // Layout-only: the stage never changes on resize.
        let rects = ui::compute_ui_rects(ratatui::layout::Rect::new(0, 0, width, height));
        match self.stage {
            Stage::SelectType => self.type_list.resize(ui::list_body_rows(&rects)),
            Stage::SelectScope => self.scope_list.resize(ui::list_body_rows(&rects)),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.commit_in_flight {
            // The commit subprocess runs to completion; no cancellation here.
            return;
        }

        if is_cancel_key(key) {
            self.cancel();
            return;
        }
        if key.code == KeyCode::Enter {
            self.confirm_stage();
            return;
        }

        match self.stage {
            Stage::SelectType => route_list_key(&mut self.type_list, key),
            Stage::SelectScope => route_list_key(&mut self.scope_list, key),
            Stage::EnterTitle => route_input_key(&mut self.title_input, key),
            Stage::Confirm => match key.code {
                KeyCode::Char('y') => self.confirm_stage(),
                KeyCode::Char('n') => self.cancel(),
                _ => {}
            },
            Stage::Done => {}
        }
    }

    fn confirm_stage(&mut self) {
        match self.stage {
            Stage::SelectType => {
                // An empty filtered view swallows the confirm; the list
                // itself already shows there is nothing to pick.
                if let Some(item) = self.type_list.confirm() {
                    self.status_line = format!("Type '{}' selected. Pick a scope.", item.code);
                    self.selected_type = Some(item);
                    self.stage = Stage::SelectScope;
                }
            }
            Stage::SelectScope => {
                if let Some(item) = self.scope_list.confirm() {
                    self.status_line =
                        format!("Scope '{}' selected. Write the commit title.", item.code);
                    self.selected_scope = Some(item);
                    self.stage = Stage::EnterTitle;
                }
            }
            Stage::EnterTitle => {
                self.title = Some(self.title_input.value().to_string());
                self.status_line = "Review the commit message.".to_string();
                self.stage = Stage::Confirm;
            }
            Stage::Confirm => self.start_commit(),
            Stage::Done => {}
        }
    }

    fn start_commit(&mut self) {
        if self.commit_in_flight {
            return;
        }
        self.commit_in_flight = true;
        self.status_line = "Committing…".to_string();

        let message = self.assembled_message();
        let tx = self.event_tx.clone();
        let git = Arc::clone(&self.git);
        tokio::spawn(async move {
            let result = git.commit(&message).await.map_err(|err| err.to_string());
            let _ = tx.send(AppEvent::CommitFinished { result });
        });
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CommitFinished { result } => {
                self.outcome = Some(match result {
                    Ok(out) if out.success => SessionOutcome::Committed {
                        message: self.assembled_message(),
                    },
                    Ok(out) => SessionOutcome::CommitFailed {
                        detail: command_failure_detail(&out),
                    },
                    Err(err) => SessionOutcome::CommitFailed { detail: err },
                });
                self.stage = Stage::Done;
                self.should_quit = true;
            }
        }
    }

    fn cancel(&mut self) {
        self.outcome = Some(SessionOutcome::Cancelled);
        self.should_quit = true;
    }
}

fn is_cancel_key(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn route_list_key(list: &mut SelectList, key: KeyEvent) {
    match key.code {
        KeyCode::Up => list.move_cursor(-1),
        KeyCode::Down => list.move_cursor(1),
        KeyCode::Backspace => list.pop_filter(),
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                list.push_filter(c);
            }
        }
        _ => {}
    }
}

fn route_input_key(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                input.insert(c);
            }
        }
        _ => {}
    }
}

fn command_failure_detail(result: &CommandResult) -> String {
    let mut sections = vec![result.command_preview.clone()];
    if !result.stdout.trim().is_empty() {
        sections.push(result.stdout.trim().to_string());
    }
    if !result.stderr.trim().is_empty() {
        sections.push(result.stderr.trim().to_string());
    }
    sections.join("\n")
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    terminal
        .backend_mut()
        .execute(terminal::LeaveAlternateScreen)
        .ok();
    terminal.show_cursor().ok();
}

pub async fn run_app(report: CatalogLoadReport, git: Arc<dyn GitClient>) -> Result<SessionOutcome> {
    let mut app = App::new(report, git);
    app.run().await
}
