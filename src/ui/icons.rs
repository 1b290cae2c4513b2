//! Shared UI icons and emojis.
//!
//! Each icon carries a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static SPARKLE: Emoji<'_, '_> = Emoji("🎉 ", "* ");
pub static STOP: Emoji<'_, '_> = Emoji("🚫 ", "[X] ");

// Panel title indicators
pub static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "[..] ");
pub static DONE: Emoji<'_, '_> = Emoji("✔ ", "[OK] ");
pub static FAILED: Emoji<'_, '_> = Emoji("✘ ", "[ERR] ");

// Step markers
pub static BOLT: Emoji<'_, '_> = Emoji("⚡ ", "> ");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+ ");
