use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use termweb_proto::CommandResponse;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::input::{InputAction, translate};
use super::view;
use crate::remote::{RemoteError, RemoteShell};
use crate::session::{KeyOutcome, PendingCommand, Session};
use crate::terminal::error::CliError;

const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

pub type Completion = Result<CommandResponse, RemoteError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Couples a [`Session`] with the remote shell that runs its commands.
///
/// Each submitted command runs on its own task; the outcome comes back
/// through the completion channel returned by [`App::new`] and must be
/// passed to [`App::complete`].
pub struct App {
    session: Session,
    remote: Arc<dyn RemoteShell>,
    in_flight: Option<PendingCommand>,
    completions: mpsc::UnboundedSender<Completion>,
    spinner_frame: usize,
}

impl App {
    pub fn new(
        session: Session,
        remote: Arc<dyn RemoteShell>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let app = Self {
            session,
            remote,
            in_flight: None,
            completions,
            spinner_frame: 0,
        };
        (app, receiver)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn handle_event(&mut self, event: &Event) -> Flow {
        match translate(event) {
            Some(action) => self.apply(action),
            None => Flow::Continue,
        }
    }

    pub fn apply(&mut self, action: InputAction) -> Flow {
        let key = match action {
            InputAction::Quit => return Flow::Quit,
            InputAction::Session(key) => key,
        };
        if let KeyOutcome::Submit(pending) = self.session.apply_key(key) {
            self.dispatch(pending);
        }
        Flow::Continue
    }

    /// Run the command on a task of its own. A second task waits on it so a
    /// panicking or cancelled execution still produces a completion.
    fn dispatch(&mut self, pending: PendingCommand) {
        let remote = Arc::clone(&self.remote);
        let command = pending.command().to_string();
        let execution = tokio::spawn(async move { remote.execute(&command).await });

        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = match execution.await {
                Ok(outcome) => outcome,
                Err(err) => Err(RemoteError::Aborted(err.to_string())),
            };
            if completions.send(outcome).is_err() {
                debug!(target: "termweb::remote", "client exited before the command completed");
            }
        });

        self.spinner_frame = 0;
        self.in_flight = Some(pending);
    }

    pub fn complete(&mut self, outcome: Completion) {
        match self.in_flight.take() {
            Some(pending) => self.session.apply_response(pending, outcome),
            None => warn!(target: "termweb::remote", "completion arrived with no command in flight"),
        }
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus the alternate screen for as long as it lives.
struct TuiGuard {
    terminal: Tui,
}

impl TuiGuard {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(err.into());
            }
        };
        Ok(Self { terminal })
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        self.terminal.show_cursor().ok();
        restore_terminal();
    }
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        error!(target: "termweb::client", error = %err, "failed to leave raw mode");
    }
    if let Err(err) = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen) {
        error!(target: "termweb::client", error = %err, "failed to leave alternate screen");
    }
}

/// Drive the interactive terminal until the user quits or input ends.
pub async fn run(
    mut app: App,
    mut completions: mpsc::UnboundedReceiver<Completion>,
) -> Result<(), CliError> {
    let mut tui = TuiGuard::enter()?;
    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);

    loop {
        tui.terminal
            .draw(|frame| view::render(frame, app.session(), app.spinner_frame()))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    if app.handle_event(&event) == Flow::Quit {
                        break;
                    }
                }
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(outcome) = completions.recv() => app.complete(outcome),
            _ = spinner.tick(), if app.session().is_pending() => app.tick(),
        }
    }
    Ok(())
}
