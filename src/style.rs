//! Terminal styling for gitnav's CLI output.
//!
//! Messages go to stderr so that reports and layouts written to stdout can be
//! piped. Colors follow the GitHub dark palette used by the graph view.

use colored::Colorize;
use crossterm::style::Color;
use std::io::{self, IsTerminal, Write};

const ACCENT: Color = Color::Rgb {
    r: 0x58,
    g: 0xa6,
    b: 0xff,
};
const MUTED: Color = Color::Rgb {
    r: 0x8b,
    g: 0x94,
    b: 0x9e,
};
const WARN: Color = Color::Rgb {
    r: 0xd2,
    g: 0x99,
    b: 0x22,
};

pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Dimmed follow-up advice, printed after an error or summary.
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Progress line, e.g. while fetching.
pub fn status(msg: &str) {
    eprintln!("{} {}", "→".blue(), msg);
}

pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Indented `label: value` line for summaries.
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Render a Markdown report with termimad on a TTY. Pipes and files get the
/// plain Markdown.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    write_markdown(markdown, output, is_terminal())
}

fn write_markdown(markdown: &str, output: &mut dyn Write, styled: bool) -> io::Result<()> {
    if styled {
        let skin = report_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        write!(output, "{}", markdown)
    }
}

fn report_skin() -> termimad::MadSkin {
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(ACCENT);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(ACCENT, '•');
    // dependency versions and file paths
    skin.inline_code.set_fg(WARN);
    skin.code_block.set_fg(WARN);
    skin.italic.set_fg(MUTED);
    skin.horizontal_rule = StyledChar::from_fg_char(MUTED, '─');
    skin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_markdown_keeps_text() {
        let mut out = Vec::new();
        write_markdown("# Report\n\nplain words\n", &mut out, true).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Report"));
        assert!(out.contains("plain words"));
    }

    #[test]
    fn test_plain_markdown_is_verbatim() {
        let mut out = Vec::new();
        write_markdown("# Report\n", &mut out, false).unwrap();
        assert_eq!(out, b"# Report\n");
    }
}
