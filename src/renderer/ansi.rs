//! ANSI terminal sink.
//!
//! Draws a decoding frame in place on the current terminal line. Each frame
//! returns the cursor to the starting column, writes every cell (noise in
//! the glyph style, resolved characters in the text style), clears the
//! rest of the line and flushes once.
//!
//! Write errors are logged and dropped: a broken pipe must not take the
//! host down over a cosmetic effect.
//!
//! # Accessible text
//!
//! A terminal has no hidden text node, so the line itself carries the noise
//! while a run decodes. [`AnsiSink::with_title_label`] also puts the plain
//! text in the window title (an OSC sequence), which screen readers and
//! window lists see unanimated. Without it the label is only available via
//! [`AnsiSink::label`]; hosts that pipe output should use reduced motion,
//! which writes the plain text once.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, SetTitle};

use super::sink::RenderSink;
use crate::types::{Attr, CharacterState, RevealState, Rgba};

/// Look of one class of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgba,
    pub attrs: Attr,
}

impl CellStyle {
    pub const PLAIN: Self = Self {
        fg: Rgba::TERMINAL_DEFAULT,
        attrs: Attr::NONE,
    };

    /// Dimmed, the terminal take on the faded glyph font.
    pub const GLYPH: Self = Self {
        fg: Rgba::TERMINAL_DEFAULT,
        attrs: Attr::DIM,
    };
}

/// Sink that renders to a terminal (or any writer that understands ANSI).
pub struct AnsiSink<W: Write> {
    out: W,
    column: u16,
    label: String,
    text_style: CellStyle,
    glyph_style: CellStyle,
    title_label: bool,
}

impl AnsiSink<io::Stdout> {
    /// Render on stdout, starting at column 0.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AnsiSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            column: 0,
            label: String::new(),
            text_style: CellStyle::PLAIN,
            glyph_style: CellStyle::GLYPH,
            title_label: false,
        }
    }

    /// Start drawing at `column` instead of 0.
    pub fn at_column(mut self, column: u16) -> Self {
        self.column = column;
        self
    }

    pub fn with_text_style(mut self, style: CellStyle) -> Self {
        self.text_style = style;
        self
    }

    pub fn with_glyph_style(mut self, style: CellStyle) -> Self {
        self.glyph_style = style;
        self
    }

    /// Mirror the label into the terminal window title.
    pub fn with_title_label(mut self) -> Self {
        self.title_label = true;
        self
    }

    /// The accessible, unanimated text.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, state: &RevealState) -> io::Result<()> {
        queue!(self.out, MoveToColumn(self.column))?;

        let mut current: Option<CellStyle> = None;
        for cell in state {
            let style = match cell {
                CharacterState::Resolved(_) => self.text_style,
                CharacterState::Noise(_) => self.glyph_style,
            };
            if current != Some(style) {
                apply_style(&mut self.out, style)?;
                current = Some(style);
            }
            queue!(self.out, Print(cell.value()))?;
        }

        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Clear(ClearType::UntilNewLine)
        )?;
        self.out.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            MoveToColumn(self.column),
            Clear(ClearType::UntilNewLine)
        )?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for AnsiSink<W> {
    fn set_label(&mut self, text: &str) {
        self.label = text.to_string();
        if self.title_label {
            let written = queue!(self.out, SetTitle(text)).and_then(|()| self.out.flush());
            if let Err(e) = written {
                log::warn!("decoder label not written to title: {e}");
            }
        }
    }

    fn render(&mut self, state: &RevealState) {
        debug_assert_eq!(
            state.len(),
            self.label.chars().count(),
            "frame length does not match label {:?}",
            self.label
        );
        if let Err(e) = self.draw(state) {
            log::warn!("decoder frame not written: {e}");
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.erase() {
            log::warn!("decoder line not cleared: {e}");
        }
    }
}

/// Reset, then switch to `style`.
fn apply_style<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;

    const MAPPING: [(Attr, Attribute); 8] = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ];
    for (flag, attribute) in MAPPING {
        if style.attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }

    match to_color(style.fg) {
        Some(color) => queue!(out, SetForegroundColor(color)),
        None => queue!(out, ResetColor),
    }
}

/// Map our color to crossterm's; `None` means terminal default.
fn to_color(color: Rgba) -> Option<Color> {
    if color.is_terminal_default() {
        None
    } else if color.is_ansi() {
        Some(Color::AnsiValue(color.ansi_index()))
    } else {
        Some(Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
