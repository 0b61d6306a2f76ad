use brainrot_protocol::Rarity;
use console::{strip_ansi_codes, Term};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use std::default::Default;
use std::time::Duration;

use crate::entry::Entry;
use crate::store::SessionState;

/// Terminal output helpers
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a success message (color only if supported)
    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    /// Print an error message (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Print a warning message (color only if supported)
    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print an info message (color only if supported)
    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    pub fn format_api_key_status(&self, present: bool) -> String {
        let text = if present { "Configured" } else { "Missing" };
        if present {
            self.colorize(text, |t| t.green().to_string())
        } else {
            self.colorize(text, |t| t.red().to_string())
        }
    }

    /// Rarity name in its tier color
    pub fn format_rarity(&self, rarity: Option<Rarity>) -> String {
        let Some(rarity) = rarity else {
            return "-".to_string();
        };
        let text = rarity.as_str();
        if !self.supports_color() {
            return text.to_string();
        }
        match rarity {
            Rarity::Common => text.white().to_string(),
            Rarity::Uncommon => text.green().to_string(),
            Rarity::Rare => text.blue().bold().to_string(),
            Rarity::Epic => text.magenta().bold().to_string(),
            Rarity::Legendary => text.yellow().bold().to_string(),
            Rarity::Mythic => text.red().bold().to_string(),
        }
    }

    /// Print a blank line for spacing
    pub fn blank_line(&self) {
        println!();
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.width() + 4; // 2 spaces on each side
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len.min(30));

        println!();
        if self.supports_color() {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    /// Print a separator line
    pub fn separator(&self) {
        let width = self.width();
        let line = "─".repeat(width.min(80));
        if self.supports_color() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    /// Create a card-style display for information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let card_width = self.card_width();
        let supports_color = self.supports_color();

        // Card header
        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_plain = strip_ansi_codes(title);
        let title_spaces = card_width.saturating_sub(title_plain.width() + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        // Card content
        for (label, value) in content {
            // Strip ANSI codes for width calculations
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let content_width = label_plain.width() + value_plain.width() + 4; // ": " + 2 spaces padding

            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1 // At least one space
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        // Card footer
        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Collectible card for one entry; lore is wrapped to the card width
    pub fn entry_card(&self, entry: &Entry) {
        let title = format!("#{}  {}", entry.short_id(), entry.name());
        let lore_width = self.card_width().saturating_sub(12);

        let mut rows: Vec<(&str, String)> = Vec::new();
        for (i, line) in wrap(entry.lore(), lore_width).into_iter().enumerate() {
            rows.push((if i == 0 { "Lore" } else { "    " }, line));
        }
        rows.push(("Rarity", self.format_rarity(entry.rarity())));
        rows.push(("Image", self.format_image_status(entry.has_image())));
        rows.push(("3D sheet", self.format_sheet_status(entry)));
        rows.push((
            "Created",
            entry.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
        ));

        self.card(&title, rows);
    }

    /// Print every entry of a session, newest first
    pub fn collection(&self, state: &SessionState) {
        if state.is_empty() {
            self.info("Your dex is empty. Generate a pack to create some abominations.");
            return;
        }

        self.header(&format!("Collection ({})", state.len()));
        for entry in &state.entries {
            self.entry_card(entry);
        }
        if let Some(error) = &state.error {
            self.error(error);
        }
    }

    fn format_image_status(&self, present: bool) -> String {
        if present {
            self.colorize("Ready", |t| t.green().to_string())
        } else {
            self.colorize("Failed", |t| t.red().to_string())
        }
    }

    fn format_sheet_status(&self, entry: &Entry) -> String {
        if entry.is_model_loading() {
            self.colorize("Generating...", |t| t.yellow().to_string())
        } else if entry.model_sheet_url().is_some() {
            self.colorize("Ready", |t| t.green().to_string())
        } else {
            "-".to_string()
        }
    }

    fn card_width(&self) -> usize {
        self.width()
            .saturating_sub(4) // Leave more space for terminal margins
            .clamp(50, 80) // Minimum and maximum width
    }

    /// Get terminal width for responsive layout
    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    /// Check if terminal supports color
    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy word wrap by display width
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Spinner shown while requests are in flight
pub fn create_spinner(message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.magenta} [{elapsed:.dim}] {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("uno dos tres cuatro cinco seis siete ocho", 12);
        assert!(lines.iter().all(|l| l.width() <= 12));
        assert_eq!(lines.join(" "), "uno dos tres cuatro cinco seis siete ocho");
    }

    #[test]
    fn test_wrap_keeps_long_words_whole() {
        let lines = wrap("supercalifragilisticoespialidoso ok", 10);
        assert_eq!(lines[0], "supercalifragilisticoespialidoso");
        assert_eq!(lines[1], "ok");
    }

    #[test]
    fn test_wrap_empty_text() {
        assert_eq!(wrap("", 20), vec![String::new()]);
    }
}
