//! Terminal stand-in for the LCD, drawn inline below the prompt.

use super::{printable_glyphs, Display};
use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Terminal, TerminalOptions, Viewport,
};
use std::io::{self, Stdout};

pub struct ConsoleDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    width: u16,
    height: u16,
    backlight: bool,
    active: bool,
}

impl ConsoleDisplay {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let width = u16::try_from(width).context("display width")?;
        let height = u16::try_from(height).context("display height")?;

        enable_raw_mode().context("enable raw mode")?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height + 2),
            },
        )
        .context("create terminal")?;

        Ok(Self {
            terminal,
            width,
            height,
            backlight: true,
            active: true,
        })
    }

    fn draw(&mut self, text: &str) -> io::Result<()> {
        let style = if self.backlight {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let lines: Vec<Line> = printable_glyphs(text)
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        let (width, height) = (self.width + 2, self.height + 2);

        self.terminal.draw(|f| {
            let full = f.area();
            let area = Rect {
                x: full.x,
                y: full.y,
                width: width.min(full.width),
                height: height.min(full.height),
            };
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" mpd-lcd ");
            f.render_widget(Paragraph::new(lines).block(block), area);
        })?;
        Ok(())
    }
}

impl Display for ConsoleDisplay {
    fn display(&mut self, text: &str) {
        if !self.active {
            return;
        }
        if let Err(e) = self.draw(text) {
            tracing::error!("console display: {e}");
            self.active = false;
        }
    }

    fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("disable raw mode: {e}");
        }
        let _ = self.terminal.show_cursor();
        println!();
    }

    fn toggle_backlight(&mut self) {
        self.backlight = !self.backlight;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ConsoleDisplay {
    fn drop(&mut self) {
        self.close();
    }
}
