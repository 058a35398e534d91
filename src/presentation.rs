//! Terminal presentation surface
//!
//! Renders session events and the static panels. Nothing here changes
//! session state: the surface is driven entirely by `SessionEvent`s and the
//! applied theme.

use crate::content::{self, DIAGNOSTIC_TOOLS, FEATURES, QUICK_ACTIONS, TIPS};
use crate::session::{SessionEvent, SessionObserver, SessionStatus};
use crate::theme::{Palette, ThemePreference};
use crate::transcript::{Message, Role};
use colored::Colorize;
use prettytable::{cell, row, Table};
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

/// Column width used when wrapping panel text
const WRAP_WIDTH: usize = 60;

/// Outer width of the framed titles, borders included
const BOX_WIDTH: usize = 64;

/// Shared handle to the applied theme
///
/// The chat loop updates it after a theme change; the surface reads it on
/// every render so the change shows up on the next line printed.
pub type ThemeHandle = Rc<Cell<ThemePreference>>;

/// Session observer writing to a terminal stream
pub struct TerminalSurface<W: Write> {
    out: RefCell<W>,
    theme: ThemeHandle,
}

impl TerminalSurface<io::Stdout> {
    /// Surface printing to standard output
    pub fn stdout(theme: ThemeHandle) -> Self {
        Self::new(io::stdout(), theme)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, theme: ThemeHandle) -> Self {
        Self {
            out: RefCell::new(out),
            theme,
        }
    }

    fn palette(&self) -> Palette {
        self.theme.get().palette()
    }

    fn render(&self, event: &SessionEvent) -> io::Result<()> {
        let palette = self.palette();
        let mut out = self.out.borrow_mut();
        match event {
            SessionEvent::MessageAppended(message) => {
                write_message(&mut *out, message, &palette)?;
            }
            SessionEvent::LoadingChanged(true) => {
                writeln!(
                    out,
                    "{}",
                    format!("{} is thinking...", content::TITLE)
                        .color(palette.muted)
                        .italic()
                )?;
            }
            SessionEvent::LoadingChanged(false) => {}
            SessionEvent::DraftChanged(draft) => {
                tracing::trace!(len = draft.len(), "Draft changed");
            }
            SessionEvent::Notification(notice) => {
                writeln!(
                    out,
                    "{} {}\n",
                    format!("{}:", notice.title).color(palette.error).bold(),
                    notice.description.color(palette.error)
                )?;
            }
        }
        out.flush()
    }
}

impl<W: Write> SessionObserver for TerminalSurface<W> {
    fn on_event(&self, event: &SessionEvent) {
        if let Err(e) = self.render(event) {
            tracing::warn!("Failed to render session event: {}", e);
        }
    }
}

/// Write one transcript message with its author and time
pub fn write_message(out: &mut dyn Write, message: &Message, palette: &Palette) -> io::Result<()> {
    let (label, color) = match message.role() {
        Role::User => ("You", palette.user),
        Role::Assistant => (content::TITLE, palette.assistant),
    };
    writeln!(
        out,
        "{} {}",
        format!("[{}]", message.display_time()).color(palette.muted),
        format!("{}:", label).color(color).bold()
    )?;
    writeln!(out, "{}\n", message.content().color(color))
}

/// Welcome banner printed when a chat starts
pub fn write_banner(out: &mut dyn Write, theme: ThemePreference) -> io::Result<()> {
    let palette = theme.palette();
    writeln!(out)?;
    write_boxed_title(out, &format!("{} - {}", content::TITLE, content::TAGLINE))?;
    writeln!(out)?;
    writeln!(out, "{}\n", wrap(content::INTRO, BOX_WIDTH))?;
    writeln!(
        out,
        "Theme: {}   Quick actions: {}",
        theme.as_str().color(palette.accent),
        "/quick".color(palette.accent)
    )?;
    writeln!(out, "Type '/help' for available commands, 'exit' to quit\n")
}

/// Help text for the chat prompt
pub fn write_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\nAvailable commands:\n")?;
    let mut table = Table::new();
    table.add_row(row!["Command", "Description"]);
    table.add_row(row!["/tips", "iPhone pro tips and tricks"]);
    table.add_row(row!["/features", "Feature highlights"]);
    table.add_row(row!["/tools", "Diagnostic tools and quick actions"]);
    table.add_row(row!["/quick <n>", "Fill the prompt with quick action n"]);
    table.add_row(row![
        "/diagnose <tool>",
        "Fill the prompt with a diagnostic (battery, performance, security, storage)"
    ]);
    table.add_row(row!["/theme [light|dark]", "Show, set or toggle the theme"]);
    table.add_row(row!["/status", "Show session status"]);
    table.add_row(row!["/clear", "Discard the pending draft"]);
    table.add_row(row!["/help", "Show this help"]);
    table.add_row(row!["exit, quit", "Leave the session"]);
    table.print(&mut *out)?;
    writeln!(out)
}

/// iPhone tips panel
pub fn write_tips(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\niPhone Pro Tips & Tricks\n")?;
    let mut table = Table::new();
    table.add_row(row!["Category", "Tip", "Details"]);
    for tip in TIPS {
        table.add_row(row![tip.category, tip.title, wrap(tip.content, WRAP_WIDTH)]);
    }
    table.print(&mut *out)?;
    writeln!(out, "\nAsk in chat for personalized tips.\n")
}

/// Feature highlights panel
pub fn write_features(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\nFeatures\n")?;
    let mut table = Table::new();
    table.add_row(row!["Feature", "Description"]);
    for feature in FEATURES {
        table.add_row(row![feature.title, wrap(feature.description, WRAP_WIDTH)]);
    }
    table.print(&mut *out)?;
    writeln!(out)
}

/// Diagnostic tools and quick actions panel
pub fn write_tools(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\niPhone Diagnostic Tools\n")?;
    let mut table = Table::new();
    table.add_row(row!["Command", "Tool", "Description"]);
    for tool in DIAGNOSTIC_TOOLS {
        table.add_row(row![
            format!("/diagnose {}", tool.key),
            tool.title,
            wrap(tool.description, WRAP_WIDTH)
        ]);
    }
    table.print(&mut *out)?;
    write_quick_actions(out)
}

/// Numbered quick actions
pub fn write_quick_actions(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\nQuick actions:\n")?;
    let mut table = Table::new();
    table.add_row(row!["#", "Topic", "Question"]);
    for (i, action) in QUICK_ACTIONS.iter().enumerate() {
        table.add_row(row![i + 1, action.title, action.query]);
    }
    table.print(&mut *out)?;
    writeln!(out)
}

/// Session status summary
pub fn write_status(
    out: &mut dyn Write,
    status: &SessionStatus,
    theme: ThemePreference,
    model: &str,
) -> io::Result<()> {
    writeln!(out)?;
    write_boxed_title(out, &format!("{} Session Status", content::TITLE))?;
    writeln!(out)?;
    writeln!(out, "State:             {}", status.state)?;
    writeln!(out, "Model:             {}", model)?;
    writeln!(out, "Theme:             {}", theme)?;
    writeln!(out, "Transcript Size:   {} messages", status.messages)?;
    writeln!(out, "Questions Asked:   {}", status.user_turns)?;
    writeln!(out, "Draft:             {} chars", status.draft_len)?;
    writeln!(out)
}

/// Title centered in a double-line frame of `BOX_WIDTH` columns
fn write_boxed_title(out: &mut dyn Write, title: &str) -> io::Result<()> {
    let inner = BOX_WIDTH - 2;
    let rule = "═".repeat(inner);
    writeln!(out, "╔{}╗", rule)?;
    writeln!(out, "║{:^inner$}║", title, inner = inner)?;
    writeln!(out, "╚{}╝", rule)
}

/// Greedy word wrap for panel cells
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Notification, SessionState};

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn surface() -> (TerminalSurface<SharedBuffer>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let theme = Rc::new(Cell::new(ThemePreference::Light));
        (TerminalSurface::new(buffer.clone(), theme), buffer)
    }

    #[test]
    fn test_renders_messages_with_labels() {
        let (surface, buffer) = surface();
        surface.on_event(&SessionEvent::MessageAppended(Message::user("How?")));
        surface.on_event(&SessionEvent::MessageAppended(Message::assistant("Like this")));
        let text = buffer.contents();
        assert!(text.contains("You:"));
        assert!(text.contains("How?"));
        assert!(text.contains("iPhone Expert:"));
        assert!(text.contains("Like this"));
    }

    #[test]
    fn test_renders_loading_and_notification() {
        let (surface, buffer) = surface();
        surface.on_event(&SessionEvent::LoadingChanged(true));
        surface.on_event(&SessionEvent::Notification(Notification {
            title: "Error".to_string(),
            description: "Failed to get response. Please try again.".to_string(),
        }));
        let text = buffer.contents();
        assert!(text.contains("is thinking..."));
        assert!(text.contains("Failed to get response. Please try again."));
    }

    #[test]
    fn test_draft_change_prints_nothing() {
        let (surface, buffer) = surface();
        surface.on_event(&SessionEvent::DraftChanged("draft".to_string()));
        surface.on_event(&SessionEvent::LoadingChanged(false));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_panels_list_content() {
        let mut out = Vec::new();
        write_tips(&mut out).unwrap();
        write_features(&mut out).unwrap();
        write_tools(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Battery Health Optimization"));
        assert!(text.contains("Smart Diagnostics"));
        assert!(text.contains("/diagnose security"));
        assert!(text.contains("Wi-Fi Issues"));
    }

    #[test]
    fn test_status_display() {
        let status = SessionStatus {
            state: SessionState::Idle,
            messages: 3,
            user_turns: 1,
            draft_len: 0,
        };
        let mut out = Vec::new();
        write_status(&mut out, &status, ThemePreference::Dark, "sonar").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("idle"));
        assert!(text.contains("3 messages"));
        assert!(text.contains("dark"));
    }

    #[test]
    fn test_banner_frame_lines_align() {
        let mut out = Vec::new();
        write_banner(&mut out, ThemePreference::Light).unwrap();
        let text = String::from_utf8(out).unwrap();
        let framed: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with('╔') || l.starts_with('║') || l.starts_with('╚'))
            .collect();
        assert_eq!(framed.len(), 3);
        for line in framed {
            assert_eq!(line.chars().count(), BOX_WIDTH, "misaligned: {}", line);
        }
        assert!(text.contains("iPhone Expert - Your AI-Powered iPhone Assistant"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a b c", 3), "a b\nc");
        assert_eq!(wrap("", 10), "");
        assert_eq!(wrap("single", 2), "single");
    }
}
