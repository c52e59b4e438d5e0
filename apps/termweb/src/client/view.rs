//! Draws a [`Session`] into a ratatui frame.
//!
//! The transcript fills everything above the last row and follows its tail:
//! when it is taller than the viewport only the newest rows are shown. The
//! last row is the input line. While a command is in flight it shows a
//! spinner instead of the edit buffer and the terminal cursor is hidden.
//! Rows wider than the terminal are clipped.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::session::{LineKind, Session, Transcript};

pub const SPINNER_FRAMES: &[&str] = &["-", "\\", "|", "/"];

fn prompt_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

/// One display row per line of transcript text, oldest first.
pub fn transcript_rows(transcript: &Transcript) -> Vec<Line<'_>> {
    let mut rows = Vec::with_capacity(transcript.len());
    for line in transcript.lines() {
        match line.kind {
            LineKind::Input => {
                let prompt = line.prompt.as_deref().unwrap_or_default();
                rows.push(Line::from(vec![
                    Span::styled(prompt, prompt_style()),
                    Span::raw(" "),
                    Span::raw(line.text.as_str()),
                ]));
            }
            LineKind::Output => {
                rows.extend(line.text.split('\n').map(Line::raw));
            }
            LineKind::Error => {
                rows.extend(
                    line.text
                        .split('\n')
                        .map(|row| Line::styled(row, error_style())),
                );
            }
        }
    }
    rows
}

/// Rows to display in a viewport `height` rows tall.
pub fn visible_rows<'a>(rows: &'a [Line<'a>], height: usize) -> &'a [Line<'a>] {
    &rows[rows.len().saturating_sub(height)..]
}

fn input_line(session: &Session, spinner_frame: usize) -> Line<'_> {
    if session.is_pending() {
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        return Line::from(vec![
            Span::styled(session.prompt(), prompt_style().add_modifier(Modifier::DIM)),
            Span::raw(" "),
            Span::styled(
                format!("{spinner} running"),
                Style::default().fg(Color::Yellow),
            ),
        ]);
    }
    Line::from(vec![
        Span::styled(session.prompt(), prompt_style()),
        Span::raw(" "),
        Span::raw(session.buffer().text()),
    ])
}

/// Column of the edit cursor within the input line, before scrolling.
fn cursor_column(session: &Session) -> u16 {
    let buffer = session.buffer().text();
    let before_cursor: String = buffer.chars().take(session.buffer().cursor()).collect();
    let width = Span::raw(session.prompt()).width() + 1 + Span::raw(before_cursor).width();
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Horizontal scroll that keeps the cursor inside an input row `width` wide.
fn input_scroll(session: &Session, width: u16) -> u16 {
    if session.is_pending() || width == 0 {
        return 0;
    }
    cursor_column(session).saturating_sub(width.saturating_sub(1))
}

/// Where the terminal cursor belongs, or `None` while input is disabled.
pub fn input_cursor(session: &Session, area: Rect) -> Option<Position> {
    if session.is_pending() || area.width == 0 {
        return None;
    }
    let column = cursor_column(session) - input_scroll(session, area.width);
    Some(Position::new(area.x + column, area.y))
}

pub fn split(area: Rect) -> (Rect, Rect) {
    let [body, input] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    (body, input)
}

pub fn render(frame: &mut Frame<'_>, session: &Session, spinner_frame: usize) {
    let (body, input) = split(frame.area());

    let rows = transcript_rows(session.transcript());
    let visible = visible_rows(&rows, usize::from(body.height));
    frame.render_widget(Paragraph::new(visible.to_vec()), body);

    let scroll = input_scroll(session, input.width);
    frame.render_widget(
        Paragraph::new(input_line(session, spinner_frame)).scroll((0, scroll)),
        input,
    );

    if let Some(position) = input_cursor(session, input) {
        frame.set_cursor_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteError;
    use crate::session::{Key, KeyOutcome, PendingCommand};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use termweb_proto::CommandResponse;

    fn submit(session: &mut Session, text: &str) -> PendingCommand {
        session.apply_key(Key::Paste(text.to_string()));
        match session.apply_key(Key::Enter) {
            KeyOutcome::Submit(pending) => pending,
            other => panic!("expected submit, got {other:?}"),
        }
    }

    fn run(session: &mut Session, text: &str, response: CommandResponse) {
        let pending = submit(session, text);
        session.apply_response(pending, Ok(response));
    }

    fn draw(session: &Session, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, session, 0)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        let width = buffer.area.width;
        (0..width)
            .map(|x| buffer.content[usize::from(y * width + x)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn echo_uses_prompt_from_submission_time() {
        let mut session = Session::default();
        run(&mut session, "cd docs", CommandResponse::ok("", "/docs"));
        run(&mut session, "pwd", CommandResponse::ok("/docs", "/docs"));

        let buffer = draw(&session, 40, 4);
        assert_eq!(row(&buffer, 0), "guest@termweb:/$ cd docs");
        assert_eq!(row(&buffer, 1), "guest@termweb:/docs$ pwd");
        assert_eq!(row(&buffer, 2), "/docs");
        assert_eq!(row(&buffer, 3), "guest@termweb:/docs$");
    }

    #[test]
    fn errors_are_red() {
        let mut session = Session::default();
        run(&mut session, "nope", CommandResponse::error("Unknown command: nope", "/"));

        let buffer = draw(&session, 40, 3);
        assert_eq!(row(&buffer, 1), "Unknown command: nope");
        assert_eq!(buffer.content[usize::from(buffer.area.width)].fg, Color::Red);
    }

    #[test]
    fn transcript_follows_the_tail() {
        let mut session = Session::default();
        for n in 0..10 {
            run(&mut session, &format!("echo {n}"), CommandResponse::ok(n.to_string(), "/"));
        }

        let buffer = draw(&session, 30, 3);
        assert_eq!(row(&buffer, 0), "guest@termweb:/$ echo 9");
        assert_eq!(row(&buffer, 1), "9");
        assert_eq!(row(&buffer, 2), "guest@termweb:/$");
    }

    #[test]
    fn multiline_output_spans_rows() {
        let mut session = Session::default();
        run(&mut session, "cat a b", CommandResponse::ok("one\ntwo", "/"));
        let rows = transcript_rows(session.transcript());
        assert_eq!(rows.len(), 3);
        assert_eq!(visible_rows(&rows, 2).len(), 2);
        assert_eq!(visible_rows(&rows, 10).len(), 3);
    }

    #[test]
    fn pending_hides_cursor_and_shows_spinner() {
        let mut session = Session::default();
        let pending = submit(&mut session, "ls");
        let area = Rect::new(0, 5, 40, 1);
        assert_eq!(input_cursor(&session, area), None);

        let buffer = draw(&session, 40, 2);
        assert_eq!(row(&buffer, 0), "guest@termweb:/$ ls");
        assert_eq!(row(&buffer, 1), "guest@termweb:/$ - running");

        session.apply_response(pending, Err(RemoteError::Aborted("gone".into())));
        assert_eq!(input_cursor(&session, area), Some(Position::new(17, 5)));
    }

    #[test]
    fn cursor_tracks_edit_position() {
        let mut session = Session::default();
        session.apply_key(Key::Paste("echo hi".into()));
        session.apply_key(Key::Left);
        session.apply_key(Key::Left);
        let area = Rect::new(0, 0, 80, 1);
        assert_eq!(input_cursor(&session, area), Some(Position::new(22, 0)));
    }

    #[test]
    fn long_input_scrolls_to_keep_cursor_visible() {
        let mut session = Session::default();
        session.apply_key(Key::Paste("x".repeat(40)));
        let area = Rect::new(0, 0, 20, 1);
        assert_eq!(input_cursor(&session, area), Some(Position::new(19, 0)));
    }
}
