//! Bounded rolling log panel.
//!
//! [`LiveLogView`] keeps the most recent N lines of a running sequence in a
//! [`LogBuffer`] and redraws them as a fixed-height bordered panel after every
//! append. In `Live` mode the panel is the message of an `indicatif` progress
//! bar on stderr, so it is redrawn in place; `Plain` mode prints each line once
//! for terminals that cannot redraw (CI logs, pipes).

use crate::ui::icons::{BOLT, DONE, FAILED, HOURGLASS, WARN};
use console::{
    Alignment, Style, Term, measure_text_width, pad_str, strip_ansi_codes, style, truncate_str,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::VecDeque;

/// Number of log lines shown when nothing else is configured.
pub const DEFAULT_LOG_HEIGHT: usize = 12;

const DEFAULT_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;

/// How a buffered line is decorated when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// "now executing" marker emitted before a step starts
    Command,
    /// A line produced by the running command
    Output,
    /// A note from the runner itself (ignored failure, spawn error)
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
}

impl LogLine {
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Command,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Warning,
            text: text.into(),
        }
    }

    /// Undecorated text as shown in plain output.
    fn plain(&self) -> String {
        let text = sanitize(&self.text);
        match self.kind {
            LineKind::Command => format!("{}running: {}", BOLT, text),
            LineKind::Output => text,
            LineKind::Warning => format!("{}{}", WARN, text),
        }
    }
}

/// Drop escape sequences and control characters so a line occupies exactly
/// one row. Carriage returns from progress output are removed, tabs expand.
fn sanitize(text: &str) -> String {
    let stripped = strip_ansi_codes(text);
    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Fixed-capacity FIFO of display lines. The oldest line is evicted first.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl LogBuffer {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: LogLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Texts of the buffered lines, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Lifecycle shown in the panel title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Running,
    Succeeded,
    Failed,
}

/// Where the panel goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Redraw the panel in place on stderr
    #[default]
    Live,
    /// Print every line once to stdout
    Plain,
    /// Render nothing (tests, quiet runs)
    Hidden,
}

impl ViewMode {
    /// `Live` when stderr is a terminal, `Plain` otherwise.
    pub fn detect() -> Self {
        if Term::stderr().is_term() {
            Self::Live
        } else {
            Self::Plain
        }
    }
}

/// Titled rolling log panel for one sequence run.
pub struct LiveLogView {
    title: String,
    buffer: LogBuffer,
    status: ViewStatus,
    width: usize,
    mode: ViewMode,
    bar: Option<ProgressBar>,
}

impl LiveLogView {
    /// Create the view and draw the empty panel.
    ///
    /// # Arguments
    /// * `title`: sequence title shown in the top border
    /// * `capacity`: number of log lines kept on screen
    /// * `mode`: output target, see [`ViewMode`]
    pub fn new(title: impl Into<String>, capacity: usize, mode: ViewMode) -> Self {
        let width = Term::stderr()
            .size_checked()
            .map(|(_, cols)| usize::from(cols).saturating_sub(1))
            .unwrap_or(DEFAULT_WIDTH);

        let bar = match mode {
            ViewMode::Live => {
                let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
                bar.set_style(
                    ProgressStyle::with_template("{msg}")
                        .expect("progress bar template is a valid static string"),
                );
                Some(bar)
            }
            ViewMode::Plain | ViewMode::Hidden => None,
        };

        let view = Self {
            title: title.into(),
            buffer: LogBuffer::new(capacity),
            status: ViewStatus::Running,
            width: width.max(MIN_WIDTH),
            mode,
            bar,
        };

        if view.mode == ViewMode::Plain {
            println!("{}{}", HOURGLASS, style(&view.title).bold().blue());
        }
        view.refresh();
        view
    }

    /// A view that draws nothing.
    pub fn hidden(title: impl Into<String>, capacity: usize) -> Self {
        Self::new(title, capacity, ViewMode::Hidden)
    }

    /// Override the panel width (in terminal columns).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(MIN_WIDTH);
        self.refresh();
        self
    }

    /// Append one line and redraw.
    pub fn append(&mut self, line: LogLine) {
        if self.mode == ViewMode::Plain {
            let plain = line.plain();
            match line.kind {
                LineKind::Command => println!("{}", style(plain).dim()),
                LineKind::Output => println!("  {}", plain),
                LineKind::Warning => println!("{}", style(plain).yellow()),
            }
        }
        self.buffer.push(line);
        self.refresh();
    }

    /// Mark the sequence finished and leave the final panel on screen.
    pub fn finish(&mut self, status: ViewStatus) {
        self.status = status;
        self.refresh();
        if let Some(ref bar) = self.bar {
            bar.finish();
        }
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Render the panel: a rounded border of `capacity + 2` rows, the title in
    /// the top edge and one buffered line per body row.
    pub fn render(&self) -> String {
        let width = self.width;
        let inner = width - 4;
        let border = self.border_style();

        let icon = match self.status {
            ViewStatus::Running => HOURGLASS,
            ViewStatus::Succeeded => DONE,
            ViewStatus::Failed => FAILED,
        };
        let heading = format!(" {}{} ", icon, self.title);
        let heading = truncate_str(&heading, width - 4, "… ");
        let fill = width.saturating_sub(3 + measure_text_width(&heading));

        let mut out = String::new();
        out.push_str(&border.apply_to("╭─").to_string());
        out.push_str(&border.clone().bold().apply_to(heading).to_string());
        out.push_str(&border.apply_to(format!("{}╮", "─".repeat(fill))).to_string());

        let mut lines = self.buffer.iter();
        for _ in 0..self.buffer.capacity() {
            let body = match lines.next() {
                Some(line) => Self::format_line(line, inner),
                None => " ".repeat(inner),
            };
            out.push('\n');
            out.push_str(&border.apply_to("│").to_string());
            out.push(' ');
            out.push_str(&body);
            out.push(' ');
            out.push_str(&border.apply_to("│").to_string());
        }

        out.push('\n');
        out.push_str(
            &border
                .apply_to(format!("╰{}╯", "─".repeat(width - 2)))
                .to_string(),
        );
        out
    }

    fn format_line(line: &LogLine, inner: usize) -> String {
        let plain = line.plain();
        let fitted = truncate_str(&plain, inner, "…");
        let padded = pad_str(&fitted, inner, Alignment::Left, None).into_owned();
        match line.kind {
            LineKind::Command => style(padded).dim().to_string(),
            LineKind::Output => padded,
            LineKind::Warning => style(padded).yellow().to_string(),
        }
    }

    fn border_style(&self) -> Style {
        match self.status {
            ViewStatus::Running => Style::new().blue(),
            ViewStatus::Succeeded => Style::new().green(),
            ViewStatus::Failed => Style::new().red(),
        }
    }

    fn refresh(&self) {
        if let Some(ref bar) = self.bar {
            bar.set_message(self.render());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_render(view: &LiveLogView) -> Vec<String> {
        strip_ansi_codes(&view.render())
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_buffer_length_is_min_of_appends_and_capacity() {
        for capacity in 1..=5 {
            for appended in 0..=12 {
                let mut buffer = LogBuffer::new(capacity);
                for i in 0..appended {
                    buffer.push(LogLine::output(format!("line {}", i)));
                }
                assert_eq!(buffer.len(), appended.min(capacity));

                let expected: Vec<String> = (appended.saturating_sub(capacity)..appended)
                    .map(|i| format!("line {}", i))
                    .collect();
                assert_eq!(buffer.texts(), expected);
            }
        }
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let mut buffer = LogBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.push(LogLine::output("a"));
        buffer.push(LogLine::output("b"));
        assert_eq!(buffer.texts(), vec!["b"]);
    }

    #[test]
    fn test_view_append_keeps_last_lines() {
        let mut view = LiveLogView::hidden("Building", 3);
        for i in 0..10 {
            view.append(LogLine::output(format!("{}", i)));
        }
        assert_eq!(view.buffer().texts(), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_render_has_fixed_height_and_width() {
        let mut view = LiveLogView::hidden("Building project", 4).with_width(40);
        view.append(LogLine::command("mvn clean package"));
        view.append(LogLine::output("[INFO] Scanning for projects..."));

        let rows = plain_render(&view);
        assert_eq!(rows.len(), 6);
        for row in &rows {
            assert_eq!(measure_text_width(row), 40, "row {:?}", row);
        }
        assert!(rows[0].starts_with("╭─"));
        assert!(rows[0].contains("Building project"));
        assert!(rows[1].contains("running: mvn clean package"));
        assert!(rows[2].contains("[INFO] Scanning for projects..."));
        assert!(rows[5].starts_with("╰"));
    }

    #[test]
    fn test_render_truncates_long_lines_to_panel() {
        let mut view = LiveLogView::hidden("t", 1).with_width(30);
        view.append(LogLine::output("x".repeat(100)));
        let rows = plain_render(&view);
        assert_eq!(measure_text_width(&rows[1]), 30);
        assert!(rows[1].contains('…'));
    }

    #[test]
    fn test_render_expands_tabs() {
        let mut view = LiveLogView::hidden("t", 1).with_width(30);
        view.append(LogLine::output("a\tb"));
        let rows = plain_render(&view);
        assert!(rows[1].contains("a    b"));
        assert_eq!(measure_text_width(&rows[1]), 30);
    }

    #[test]
    fn test_render_strips_carriage_returns_and_controls() {
        let mut view = LiveLogView::hidden("t", 2).with_width(40);
        view.append(LogLine::output(
            "Counting objects:  50% (1/2)\rCounting objects: 100% (2/2), done.",
        ));
        view.append(LogLine::output("\u{1b}[1;32mOK\u{1b}[0m\x07\x08 done\x0b\x0c"));
        let rows = plain_render(&view);
        for row in &rows {
            assert_eq!(measure_text_width(row), 40, "row {:?}", row);
            assert!(!row.chars().any(char::is_control), "row {:?}", row);
        }
        assert!(rows[1].starts_with("│ Counting objects:  50% (1/2)Count"));
        assert!(rows[2].contains("OK done"));
    }

    #[test]
    fn test_finish_updates_status() {
        let mut view = LiveLogView::hidden("Tagging", 2);
        assert_eq!(view.status(), ViewStatus::Running);
        view.finish(ViewStatus::Failed);
        assert_eq!(view.status(), ViewStatus::Failed);
        assert!(plain_render(&view)[0].contains("Tagging"));
    }

    #[test]
    fn test_warning_line_is_rendered_with_text() {
        let mut view = LiveLogView::hidden("t", 2).with_width(60);
        view.append(LogLine::warning("step failed (exit 1) but is allowed to fail"));
        let rows = plain_render(&view);
        assert!(rows[1].contains("step failed (exit 1)"));
    }
}
