//! One-shot terminal output around sequence runs: banners, rules and the
//! failure / success panels printed after a sequence completes.

use crate::sequence::ExecutionResult;
use crate::ui::icons::{CHECK, CROSS, SPARKLE};
use console::{Style, Term, measure_text_width, pad_str, style};

/// Build a box around `body` sized to its widest line (title included).
pub fn fit_box(title: Option<&str>, body: &[String], border: &Style) -> String {
    let content_width = body
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0);
    let title_width = title.map(|t| measure_text_width(t) + 2).unwrap_or(0);
    let inner = content_width.max(title_width);

    let mut out = String::new();
    match title {
        Some(t) => {
            let heading = format!(" {} ", t);
            let fill = (inner + 2).saturating_sub(measure_text_width(&heading));
            let left = fill / 2;
            let right = fill - left;
            out.push_str(&border.apply_to(format!("╭{}", "─".repeat(left))).to_string());
            out.push_str(&heading);
            out.push_str(&border.apply_to(format!("{}╮", "─".repeat(right))).to_string());
        }
        None => out.push_str(&border.apply_to(format!("╭{}╮", "─".repeat(inner + 2))).to_string()),
    }
    for line in body {
        out.push('\n');
        out.push_str(&border.apply_to("│ ").to_string());
        out.push_str(&pad_str(line, inner, console::Alignment::Left, None));
        out.push_str(&border.apply_to(" │").to_string());
    }
    out.push('\n');
    out.push_str(&border.apply_to(format!("╰{}╯", "─".repeat(inner + 2))).to_string());
    out
}

/// Print a boxed panel to stdout.
pub fn print_box(title: Option<&str>, body: &[String], border: Style) {
    println!("{}", fit_box(title, body, &border));
}

/// Print a full-width horizontal rule with a centred label.
pub fn print_rule(label: &str) {
    let width = Term::stdout()
        .size_checked()
        .map(|(_, cols)| usize::from(cols))
        .unwrap_or(80);
    let label = format!(" {} ", label);
    let fill = width.saturating_sub(measure_text_width(&label));
    let left = fill / 2;
    println!();
    println!(
        "{}{}{}",
        style("─".repeat(left)).green(),
        label,
        style("─".repeat(fill - left)).green()
    );
}

/// Dim one-line notice.
pub fn print_note(msg: &str) {
    println!("{}", style(msg).dim());
}

/// Report the verdict of one sequence run.
///
/// On failure the failing command is named and the user is pointed at the
/// log panel above; on success the sequence's success message is printed.
pub fn print_sequence_outcome(result: &ExecutionResult, success_message: &str) {
    match result.failure.as_ref() {
        None => println!("{}{}", CHECK, style(success_message).green().bold()),
        Some(failure) => {
            let body = vec![
                format!("{}", style(format!("{}Execution failed!", CROSS)).red().bold()),
                format!("Command: {}", failure.step.command),
                format!("Reason: {}", failure.reason),
                "Check the log above for details.".to_string(),
            ];
            print_box(None, &body, Style::new().red());
        }
    }
}

/// Final celebration panel after a successful release.
pub fn print_release_summary(project: &str, tag: &str) {
    let body = vec![
        format!("{}{}", SPARKLE, style("Release published!").green().bold()),
        String::new(),
        format!("Project: {}", style(project).bold()),
        format!("Tag:     {}", style(tag).cyan().bold()),
        String::new(),
        format!(
            "Next step: publish {} on the GitHub Releases page.",
            style(tag).cyan()
        ),
    ];
    print_box(Some("shipit"), &body, Style::new().green());
}
