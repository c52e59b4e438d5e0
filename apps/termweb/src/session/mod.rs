//! Interactive session controller.
//!
//! [`Session`] owns the edit buffer, command history, transcript and the
//! in-flight request. Every change happens through one of three transitions:
//!
//! * [`Session::apply_key`] for keystrokes,
//! * [`Session::begin_submit`] (reached through `Enter`) which echoes the
//!   command and mints the [`PendingCommand`] handle,
//! * [`Session::apply_response`] which consumes that handle together with
//!   the remote outcome and always returns the session to idle.
//!
//! A `PendingCommand` can only be obtained while the session is idle, so at
//! most one remote execution is ever outstanding.

pub mod buffer;
pub mod history;
pub mod keys;
pub mod prompt;
pub mod transcript;

use std::sync::atomic::{AtomicU64, Ordering};
use termweb_proto::CommandResponse;
use tracing::{debug, info, warn};

use crate::remote::RemoteError;

pub use buffer::EditBuffer;
pub use history::{HistoryBuffer, Recall};
pub use keys::Key;
pub use prompt::Identity;
pub use transcript::{LineId, LineKind, Transcript, TranscriptLine};

/// Working directory shown before the server has reported one.
pub const INITIAL_CWD: &str = "/";

/// Shown instead of the transport error, which only goes to the log.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error: could not reach the command server.";

/// Tickets are unique across every session in the process, so a handle
/// minted by one session never matches another session's in-flight ticket.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending,
}

/// Handle for the single in-flight command. Obtained from a successful
/// submit and handed back to [`Session::apply_response`].
#[derive(Debug)]
#[must_use = "a pending command must be completed with Session::apply_response"]
pub struct PendingCommand {
    ticket: u64,
    command: String,
}

impl PendingCommand {
    /// Trimmed command text to send to the remote shell.
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[derive(Debug)]
pub enum KeyOutcome {
    /// The key changed session state.
    Handled,
    /// The key had no effect (input disabled or nothing to recall).
    Ignored,
    /// `Enter` submitted a command; run it and report back.
    Submit(PendingCommand),
}

#[derive(Debug)]
pub struct Session {
    identity: Identity,
    cwd: String,
    prompt: String,
    transcript: Transcript,
    history: HistoryBuffer,
    buffer: EditBuffer,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        let prompt = identity.prompt(INITIAL_CWD);
        Self {
            identity,
            cwd: INITIAL_CWD.to_string(),
            prompt,
            transcript: Transcript::new(),
            history: HistoryBuffer::new(),
            buffer: EditBuffer::new(),
            in_flight: None,
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn request_state(&self) -> RequestState {
        if self.in_flight.is_some() {
            RequestState::Pending
        } else {
            RequestState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    fn set_cwd(&mut self, cwd: String) {
        if cwd != self.cwd {
            debug!(target: "termweb::session", from = %self.cwd, to = %cwd, "working directory changed");
            self.prompt = self.identity.prompt(&cwd);
            self.cwd = cwd;
        }
    }

    /// Interpret one key. Clearing the screen works at any time; everything
    /// else is ignored while a command is running.
    pub fn apply_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ClearScreen => {
                self.transcript.clear();
                KeyOutcome::Handled
            }
            _ if self.is_pending() => KeyOutcome::Ignored,
            Key::Enter => match self.begin_submit() {
                Some(pending) => KeyOutcome::Submit(pending),
                None => KeyOutcome::Handled,
            },
            Key::Up => match self.history.recall_previous() {
                Some(command) => {
                    self.buffer.set(command);
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
            Key::Down => match self.history.recall_next() {
                Recall::Unchanged => KeyOutcome::Ignored,
                Recall::Entry(command) => {
                    self.buffer.set(command);
                    KeyOutcome::Handled
                }
                Recall::Fresh => {
                    self.buffer.clear();
                    KeyOutcome::Handled
                }
            },
            Key::Char(ch) => {
                self.buffer.insert(ch);
                KeyOutcome::Handled
            }
            Key::Paste(text) => {
                self.buffer.insert_str(&text);
                KeyOutcome::Handled
            }
            Key::Backspace => {
                self.buffer.backspace();
                KeyOutcome::Handled
            }
            Key::Delete => {
                self.buffer.delete();
                KeyOutcome::Handled
            }
            Key::Left => {
                self.buffer.move_left();
                KeyOutcome::Handled
            }
            Key::Right => {
                self.buffer.move_right();
                KeyOutcome::Handled
            }
            Key::Home => {
                self.buffer.move_home();
                KeyOutcome::Handled
            }
            Key::End => {
                self.buffer.move_end();
                KeyOutcome::Handled
            }
        }
    }

    /// Submit the edit buffer. The buffer is emptied either way; blank input
    /// stops there. Otherwise the command is echoed with the current prompt,
    /// recorded in history and the session becomes pending.
    ///
    /// Returns `None` while another command is still running.
    pub fn begin_submit(&mut self) -> Option<PendingCommand> {
        if self.is_pending() {
            return None;
        }
        let raw = self.buffer.take();
        let command = raw.trim();
        if command.is_empty() {
            return None;
        }

        self.transcript.push_input(self.prompt.clone(), command);
        self.history.record(command);
        self.history.reset_cursor();

        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        self.in_flight = Some(ticket);
        info!(target: "termweb::session", ticket, command, cwd = %self.cwd, "command submitted");

        Some(PendingCommand {
            ticket,
            command: command.to_string(),
        })
    }

    /// Complete the in-flight command. The session is idle again afterwards
    /// no matter what `result` holds.
    ///
    /// A response always updates the working directory, even for
    /// `status = "error"`. `clear` empties the transcript and suppresses any
    /// output; otherwise non-empty output becomes one output or error line.
    /// A transport failure adds a single fixed error line and leaves the
    /// working directory alone.
    pub fn apply_response(
        &mut self,
        pending: PendingCommand,
        result: Result<CommandResponse, RemoteError>,
    ) {
        let PendingCommand { ticket, command } = pending;
        if self.in_flight != Some(ticket) {
            warn!(target: "termweb::session", ticket, command = %command, "ignoring response for a command that is not in flight");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                debug!(
                    target: "termweb::session",
                    ticket,
                    status = ?response.status,
                    clear = response.clear,
                    "command completed"
                );
                let is_error = response.is_error();
                self.set_cwd(response.cwd);
                if response.clear {
                    self.transcript.clear();
                } else if !response.output.is_empty() {
                    if is_error {
                        self.transcript.push_error(response.output);
                    } else {
                        self.transcript.push_output(response.output);
                    }
                }
            }
            Err(err) => {
                // The TUI shares stderr with the default log sink; keep the
                // transport detail below the default level.
                info!(target: "termweb::session", ticket, command = %command, "command failed to reach the server");
                debug!(target: "termweb::session", ticket, error = %err, "transport failure detail");
                self.transcript.push_error(TRANSPORT_FAILURE_MESSAGE);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Identity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termweb_proto::CommandStatus;

    fn type_line(session: &mut Session, text: &str) {
        session.apply_key(Key::Paste(text.to_string()));
    }

    fn submit(session: &mut Session, text: &str) -> Option<PendingCommand> {
        type_line(session, text);
        match session.apply_key(Key::Enter) {
            KeyOutcome::Submit(pending) => Some(pending),
            _ => None,
        }
    }

    fn run(session: &mut Session, text: &str, response: CommandResponse) {
        let pending = submit(session, text).expect("command should submit");
        session.apply_response(pending, Ok(response));
    }

    fn refused() -> RemoteError {
        RemoteError::Aborted("connection refused".into())
    }

    #[test]
    fn starts_idle_at_root() {
        let session = Session::default();
        assert_eq!(session.cwd(), "/");
        assert_eq!(session.prompt(), "guest@termweb:/$");
        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn blank_submit_only_clears_buffer() {
        let mut session = Session::default();
        for blank in ["", "   ", "\t "] {
            assert!(submit(&mut session, blank).is_none());
            assert!(session.buffer().is_empty());
        }
        assert!(session.transcript().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.request_state(), RequestState::Idle);
    }

    #[test]
    fn submit_echoes_trimmed_command_with_prompt_snapshot() {
        let mut session = Session::default();
        let pending = submit(&mut session, "  ls -a  ").unwrap();
        assert_eq!(pending.command(), "ls -a");

        let echo = session.transcript().last().unwrap();
        assert_eq!(echo.kind, LineKind::Input);
        assert_eq!(echo.text, "ls -a");
        assert_eq!(echo.prompt.as_deref(), Some("guest@termweb:/$"));
        assert!(session.buffer().is_empty());
        assert_eq!(session.history().entries(), ["ls -a"]);
        assert_eq!(session.request_state(), RequestState::Pending);

        session.apply_response(pending, Ok(CommandResponse::ok("", "/srv")));
        let echo = &session.transcript().lines()[0];
        assert_eq!(echo.prompt.as_deref(), Some("guest@termweb:/$"));
        assert_eq!(session.prompt(), "guest@termweb:/srv$");
    }

    #[test]
    fn pwd_scenario() {
        let mut session = Session::default();
        run(&mut session, "pwd", CommandResponse::ok("/home/user", "/home/user"));

        let lines = session.transcript().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].kind, lines[0].text.as_str()), (LineKind::Input, "pwd"));
        assert_eq!(
            (lines[1].kind, lines[1].text.as_str()),
            (LineKind::Output, "/home/user")
        );
        assert_eq!(session.prompt(), "guest@termweb:/home/user$");
        assert_eq!(session.request_state(), RequestState::Idle);
    }

    #[test]
    fn clear_wins_over_output() {
        let mut session = Session::default();
        run(&mut session, "echo hi", CommandResponse::ok("hi", "/"));
        run(
            &mut session,
            "clear",
            CommandResponse {
                output: "ignored".into(),
                cwd: "/".into(),
                status: CommandStatus::Ok,
                clear: true,
            },
        );
        assert_eq!(session.transcript().len(), 0);
    }

    #[test]
    fn clear_scenario() {
        let mut session = Session::default();
        run(&mut session, "clear", CommandResponse::cleared("/"));
        assert!(session.transcript().is_empty());
        assert_eq!(session.history().entries(), ["clear"]);
    }

    #[test]
    fn remote_error_appends_error_line_and_updates_cwd() {
        let mut session = Session::default();
        run(
            &mut session,
            "cd nowhere",
            CommandResponse::error("Path not found", "/tmp"),
        );
        let lines = session.transcript().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].kind, LineKind::Error);
        assert_eq!(lines[1].text, "Path not found");
        assert_eq!(session.cwd(), "/tmp");
        assert_eq!(session.history().entries(), ["cd nowhere"]);
    }

    #[test]
    fn empty_output_appends_nothing() {
        let mut session = Session::default();
        run(&mut session, "mkdir x", CommandResponse::ok("", "/"));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn transport_failure_adds_fixed_error_and_keeps_cwd() {
        let mut session = Session::default();
        run(&mut session, "cd /", CommandResponse::ok("", "/home"));

        let pending = submit(&mut session, "ls").unwrap();
        session.apply_response(pending, Err(refused()));

        let lines = session.transcript().lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].kind, LineKind::Error);
        assert_eq!(lines[2].text, TRANSPORT_FAILURE_MESSAGE);
        assert_eq!(session.cwd(), "/home");
        assert_eq!(session.request_state(), RequestState::Idle);
    }

    #[test]
    fn input_is_disabled_while_pending() {
        let mut session = Session::default();
        let pending = submit(&mut session, "sleep").unwrap();

        assert!(matches!(session.apply_key(Key::Char('x')), KeyOutcome::Ignored));
        assert!(matches!(session.apply_key(Key::Enter), KeyOutcome::Ignored));
        assert!(matches!(session.apply_key(Key::Up), KeyOutcome::Ignored));
        assert!(session.begin_submit().is_none());
        assert!(session.buffer().is_empty());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.history().len(), 1);

        session.apply_response(pending, Ok(CommandResponse::ok("", "/")));
        assert!(matches!(session.apply_key(Key::Char('x')), KeyOutcome::Handled));
        assert_eq!(session.buffer().text(), "x");
    }

    #[test]
    fn ctrl_l_while_pending_only_clears_transcript() {
        let mut session = Session::default();
        run(&mut session, "echo a", CommandResponse::ok("a", "/"));
        let pending = submit(&mut session, "cd /var").unwrap();

        assert!(matches!(session.apply_key(Key::ClearScreen), KeyOutcome::Handled));
        assert!(session.transcript().is_empty());
        assert_eq!(session.request_state(), RequestState::Pending);
        assert_eq!(session.cwd(), "/");

        session.apply_response(pending, Ok(CommandResponse::ok("", "/var")));
        assert_eq!(session.cwd(), "/var");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn ctrl_l_keeps_buffer_and_history() {
        let mut session = Session::default();
        run(&mut session, "pwd", CommandResponse::ok("/", "/"));
        type_line(&mut session, "draft");
        session.apply_key(Key::ClearScreen);
        assert_eq!(session.buffer().text(), "draft");
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn history_recall_round_trip() {
        let mut session = Session::default();
        for command in ["one", "two", "three"] {
            run(&mut session, command, CommandResponse::ok("", "/"));
        }

        session.apply_key(Key::Up);
        assert_eq!(session.buffer().text(), "three");
        session.apply_key(Key::Up);
        session.apply_key(Key::Up);
        assert_eq!(session.buffer().text(), "one");
        session.apply_key(Key::Up);
        assert_eq!(session.buffer().text(), "one");

        session.apply_key(Key::Down);
        assert_eq!(session.buffer().text(), "two");
        session.apply_key(Key::Down);
        session.apply_key(Key::Down);
        assert!(session.buffer().is_empty());
        assert_eq!(session.history().cursor(), None);

        assert!(matches!(session.apply_key(Key::Down), KeyOutcome::Ignored));
    }

    #[test]
    fn single_entry_up_then_down_returns_to_fresh_input() {
        let mut session = Session::default();
        run(&mut session, "ls", CommandResponse::ok("", "/"));
        session.apply_key(Key::Up);
        session.apply_key(Key::Down);
        assert!(session.buffer().is_empty());
        assert_eq!(session.history().cursor(), None);
    }

    #[test]
    fn up_with_empty_history_is_ignored() {
        let mut session = Session::default();
        type_line(&mut session, "draft");
        assert!(matches!(session.apply_key(Key::Up), KeyOutcome::Ignored));
        assert_eq!(session.buffer().text(), "draft");
    }

    #[test]
    fn submit_resets_history_cursor() {
        let mut session = Session::default();
        run(&mut session, "first", CommandResponse::ok("", "/"));
        session.apply_key(Key::Up);
        assert_eq!(session.history().cursor(), Some(0));
        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.command(), "first");
        assert_eq!(session.history().cursor(), None);
        assert_eq!(session.history().entries(), ["first", "first"]);
        session.apply_response(pending, Ok(CommandResponse::ok("", "/")));
    }

    #[test]
    fn result_follows_echo() {
        let mut session = Session::default();
        let pending = submit(&mut session, "whoami").unwrap();
        let echo_id = session.transcript().last().unwrap().id;
        session.apply_response(pending, Ok(CommandResponse::ok("guest", "/")));
        let result = session.transcript().last().unwrap();
        assert!(result.id > echo_id);
        assert_eq!(result.text, "guest");
    }

    #[test]
    fn foreign_handle_is_ignored() {
        let mut first = Session::default();
        let mut second = Session::default();
        let stray = submit(&mut first, "a").unwrap();
        second.apply_response(stray, Ok(CommandResponse::ok("x", "/elsewhere")));
        assert_eq!(second.cwd(), "/");
        assert!(second.transcript().is_empty());
    }

    #[test]
    fn handles_do_not_cross_between_busy_sessions() {
        let mut first = Session::default();
        let mut second = Session::default();
        let from_first = submit(&mut first, "a").unwrap();
        let from_second = submit(&mut second, "b").unwrap();

        second.apply_response(from_first, Ok(CommandResponse::ok("x", "/elsewhere")));
        assert!(second.is_pending());
        assert_eq!(second.cwd(), "/");

        first.apply_response(from_second, Ok(CommandResponse::ok("y", "/other")));
        assert!(first.is_pending());
        assert_eq!(first.cwd(), "/");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_at(level: tracing::level_filters::LevelFilter, body: impl FnOnce()) -> String {
        use crate::telemetry::logging::default_filter_for;

        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(default_filter_for(
                level, false,
            )))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, body);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn transport_detail_stays_out_of_the_default_log() {
        use crate::telemetry::logging::LogLevel;

        let detail = "tcp connect error: Connection refused to 10.0.0.5:3000";
        let failing_run = || {
            let mut session = Session::default();
            let pending = submit(&mut session, "ls").unwrap();
            session.apply_response(pending, Err(RemoteError::Aborted(detail.into())));
        };

        let default_logs = logs_at(LogLevel::default().to_filter(), failing_run);
        assert!(default_logs.is_empty(), "default sink got: {default_logs}");

        let debug_logs = logs_at(LogLevel::Debug.to_filter(), failing_run);
        assert!(debug_logs.contains(detail));
    }
}
