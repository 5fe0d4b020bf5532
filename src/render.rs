//! Drawing boundary: the glyph vocabulary and a crossterm-backed canvas.
//!
//! The game core only talks to the [`Canvas`] trait. Requests outside the
//! field are dropped silently, so the core never has to clip.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color},
    terminal::{self, ClearType},
};

pub const DEFAULT_FG: Color = Color::Green;
pub const DEFAULT_BG: Color = Color::Black;
pub const EXPLOSION_FG: Color = Color::Yellow;
pub const FAILED_FG: Color = Color::Red;
pub const ACCOMPLISHED_FG: Color = Color::Yellow;

/// A single drawable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Blank,
    TubeCell,
    PixelCell,
    ExplosionCell,
}

impl Glyph {
    fn cell(self) -> (char, Color) {
        match self {
            Glyph::Blank => (' ', DEFAULT_FG),
            Glyph::TubeCell => ('#', DEFAULT_FG),
            Glyph::PixelCell => ('>', DEFAULT_FG),
            Glyph::ExplosionCell => ('*', EXPLOSION_FG),
        }
    }
}

/// Where the game puts cells and text runs.
///
/// Coordinates outside `[0, width) x [0, height)` are a no-op, not an error.
pub trait Canvas {
    fn draw(&mut self, glyph: Glyph, x: i32, y: i32) -> io::Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, fg: Color) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Canvas that queues crossterm commands into any writer.
pub struct TermCanvas<W: Write> {
    out: W,
    width: i32,
    height: i32,
}

impl<W: Write> TermCanvas<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width: width as i32,
            height: height as i32,
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }
}

impl<W: Write> Canvas for TermCanvas<W> {
    fn draw(&mut self, glyph: Glyph, x: i32, y: i32) -> io::Result<()> {
        if !self.in_bounds(x, y) {
            return Ok(());
        }
        let (ch, fg) = glyph.cell();
        queue!(
            self.out,
            cursor::MoveTo(x as u16, y as u16),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(DEFAULT_BG),
            style::Print(ch),
        )
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, fg: Color) -> io::Result<()> {
        if !self.in_bounds(x, y) {
            return Ok(());
        }
        queue!(
            self.out,
            cursor::MoveTo(x as u16, y as u16),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(DEFAULT_BG),
            style::Print(text),
        )
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            style::SetForegroundColor(DEFAULT_FG),
            style::SetBackgroundColor(DEFAULT_BG),
            terminal::Clear(ClearType::All),
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Clear the field and print an end-of-session banner, centered.
pub fn draw_banner(
    canvas: &mut impl Canvas,
    width: i32,
    height: i32,
    message: &str,
    fg: Color,
) -> io::Result<()> {
    canvas.clear()?;
    let x = width / 2 - message.len() as i32 / 2;
    canvas.draw_text(message, x, height / 2, fg)?;
    canvas.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(buf: &mut Vec<u8>) -> TermCanvas<&mut Vec<u8>> {
        TermCanvas::new(buf, 40, 20)
    }

    #[test]
    fn out_of_bounds_draw_is_a_silent_no_op() {
        let mut buf = Vec::new();
        let mut canvas = canvas(&mut buf);

        canvas.draw(Glyph::TubeCell, -1, 5).unwrap();
        canvas.draw(Glyph::TubeCell, 40, 5).unwrap();
        canvas.draw(Glyph::PixelCell, 3, -2).unwrap();
        canvas.draw(Glyph::PixelCell, 3, 20).unwrap();
        canvas.draw_text("hi", 41, 0, DEFAULT_FG).unwrap();
        canvas.flush().unwrap();

        assert!(buf.is_empty());
    }

    #[test]
    fn in_bounds_draw_emits_terminal_commands() {
        let mut buf = Vec::new();
        let mut canvas = canvas(&mut buf);

        canvas.draw(Glyph::TubeCell, 0, 0).unwrap();
        canvas.draw(Glyph::ExplosionCell, 39, 19).unwrap();
        canvas.flush().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('#'));
        assert!(text.contains('*'));
    }

    #[test]
    fn banner_is_centered_on_the_field() {
        let mut buf = Vec::new();
        let mut canvas = canvas(&mut buf);

        draw_banner(&mut canvas, 40, 20, "Mission failed!!!", FAILED_FG).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Mission failed!!!"));
        // MoveTo(12, 10); the escape sequence is 1-based row;column.
        assert!(text.contains("\u{1b}[11;13H"));
    }
}
