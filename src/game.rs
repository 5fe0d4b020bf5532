//! Game core: the tube field, the pixel, collision, and the tick/lift
//! state machine.
//!
//! Everything here is deterministic given the RNG handed to [`Game::new`];
//! the clock and keyboard live in `session`.

use std::io;
use std::ops::Range;
use std::time::Duration;

use rand::Rng;

use crate::render::{Canvas, Glyph};

/// Session parameters, captured once at start.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: u16,
    pub height: u16,
    /// Number of simultaneous tubes; none are recycled.
    pub tube_count: usize,
    pub tick_period: Duration,
    /// Cells every tube scrolls left per tick.
    pub scroll_step: i32,
    /// Bounds for the one-time tube height draw.
    pub height_range: Range<i32>,
    /// The pixel's column, fixed for the whole session.
    pub player_x: i32,
}

impl Config {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            tube_count: 25,
            tick_period: Duration::from_millis(250),
            scroll_step: 2,
            height_range: 5..18,
            player_x: 10,
        }
    }
}

/// A vertical barrier scrolling toward the pixel. `height` is measured up
/// from the field floor and never changes after creation; `x` decreases
/// every tick with no lower bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tube {
    pub x: i32,
    pub height: i32,
}

/// The player marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Failed,
    /// Declared and rendered, but no transition sets it yet.
    #[allow(dead_code)]
    Accomplished,
}

/// True iff some tube occupies the pixel's exact column while the pixel is
/// at or below that tube's top edge.
///
/// The match is on column equality, not overlap: a tube whose scroll step
/// carries it across the column between ticks passes uncounted. That is the
/// contract, not an oversight.
pub fn collided(pixel: &Pixel, tubes: &[Tube], field_height: i32) -> bool {
    tubes
        .iter()
        .any(|tube| tube.x == pixel.x && field_height - tube.height <= pixel.y)
}

pub struct Game {
    height: i32,
    scroll_step: i32,
    pub tubes: Vec<Tube>,
    pub pixel: Pixel,
    pub status: Status,
}

impl Game {
    /// Build the starting state. Each tube lands one field-width past the
    /// right edge at a random offset, so entries stagger; heights are drawn
    /// once from the configured range. Tubes may overlap each other.
    pub fn new(config: &Config, rng: &mut impl Rng) -> Self {
        let width = config.width as i32;
        let height = config.height as i32;
        let tubes = (0..config.tube_count)
            .map(|_| Tube {
                x: rng.random_range(0..width) + width,
                height: rng.random_range(config.height_range.clone()),
            })
            .collect();
        Self {
            height,
            scroll_step: config.scroll_step,
            tubes,
            pixel: Pixel {
                x: config.player_x,
                y: height / 2,
            },
            status: Status::Ongoing,
        }
    }

    /// Draw every tube and the pixel; called once after initialization.
    pub fn draw_field(&self, canvas: &mut impl Canvas) -> io::Result<()> {
        for tube in &self.tubes {
            for y in (self.height - tube.height)..=self.height {
                canvas.draw(Glyph::TubeCell, tube.x, y)?;
            }
        }
        canvas.draw(Glyph::PixelCell, self.pixel.x, self.pixel.y)
    }

    /// One clock period: advance the tube field, then apply passive descent.
    /// No-op once the game has reached a terminal state.
    pub fn on_tick(&mut self, canvas: &mut impl Canvas) -> io::Result<()> {
        if self.status != Status::Ongoing {
            return Ok(());
        }
        self.move_tubes(canvas)?;
        if self.status != Status::Ongoing {
            return Ok(());
        }
        self.shift_pixel(canvas, 1)
    }

    /// One jump input: move the pixel up one row. No-op once terminal.
    pub fn on_lift(&mut self, canvas: &mut impl Canvas) -> io::Result<()> {
        if self.status != Status::Ongoing {
            return Ok(());
        }
        self.shift_pixel(canvas, -1)
    }

    fn move_tubes(&mut self, canvas: &mut impl Canvas) -> io::Result<()> {
        self.check_collision(canvas)?;
        if self.status != Status::Ongoing {
            return Ok(());
        }
        for i in 0..self.tubes.len() {
            let tube = self.tubes[i];
            let new_x = tube.x - self.scroll_step;
            // Clear the vacated column and draw the new one; the canvas
            // drops whatever falls outside the field.
            for y in (self.height - tube.height)..=self.height {
                canvas.draw(Glyph::Blank, tube.x, y)?;
                canvas.draw(Glyph::TubeCell, new_x, y)?;
            }
            self.tubes[i].x = new_x;
        }
        self.check_collision(canvas)
    }

    /// Move the pixel by `dy` rows, redrawing its cell. Collision is checked
    /// on both sides of the move so contact is caught no matter which party
    /// stepped into the other. The row is deliberately unclamped.
    fn shift_pixel(&mut self, canvas: &mut impl Canvas, dy: i32) -> io::Result<()> {
        self.check_collision(canvas)?;
        if self.status != Status::Ongoing {
            return Ok(());
        }
        canvas.draw(Glyph::Blank, self.pixel.x, self.pixel.y)?;
        self.pixel.y += dy;
        canvas.draw(Glyph::PixelCell, self.pixel.x, self.pixel.y)?;
        self.check_collision(canvas)
    }

    fn check_collision(&mut self, canvas: &mut impl Canvas) -> io::Result<()> {
        if self.status == Status::Ongoing && collided(&self.pixel, &self.tubes, self.height) {
            canvas.draw(Glyph::ExplosionCell, self.pixel.x, self.pixel.y)?;
            self.status = Status::Failed;
            log::debug!(
                "pixel hit a tube at column {} row {}",
                self.pixel.x,
                self.pixel.y
            );
        }
        Ok(())
    }
}
