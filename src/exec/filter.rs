//! Display policy for raw command output lines.

/// Rules applied to every raw line before it reaches the log panel.
///
/// Lines are trimmed and blank lines are dropped. A line longer than
/// `truncate_over` characters that contains one of the `noise_markers`
/// (Maven's `Downloading ...` lines, typically) is cut to `truncate_to`
/// characters followed by `...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPolicy {
    pub truncate_over: usize,
    pub truncate_to: usize,
    pub noise_markers: Vec<String>,
}

pub const DEFAULT_TRUNCATE_OVER: usize = 100;
pub const DEFAULT_TRUNCATE_TO: usize = 97;
pub const DEFAULT_NOISE_MARKER: &str = "Downloading";

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            truncate_over: DEFAULT_TRUNCATE_OVER,
            truncate_to: DEFAULT_TRUNCATE_TO,
            noise_markers: vec![DEFAULT_NOISE_MARKER.to_string()],
        }
    }
}

impl OutputPolicy {
    /// Clean one raw line. Returns `None` when the line should not be shown.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let len = line.chars().count();
        if len > self.truncate_over && self.is_noise(line) {
            let mut short: String = line.chars().take(self.truncate_to).collect();
            short.push_str("...");
            return Some(short);
        }

        Some(line.to_string())
    }

    fn is_noise(&self, line: &str) -> bool {
        self.noise_markers
            .iter()
            .any(|marker| !marker.is_empty() && line.contains(marker.as_str()))
    }
}
