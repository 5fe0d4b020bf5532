//! flappy-pixel: dodge the scrolling tubes.
//!
//! Space or Up lifts the pixel one row, gravity drops it every tick,
//! Esc or `q` quits. Touching a tube ends the run.

use std::io::{self, stdout};
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{cursor, execute, terminal};
use rand::SeedableRng;
use rand_pcg::Pcg32;

mod game;
mod render;
mod session;

use game::{Config, Game};
use render::TermCanvas;

fn main() -> io::Result<()> {
    env_logger::init();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let config = Config::new(cols, rows);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::debug!("rng seed {seed}");
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut game = Game::new(&config, &mut rng);

    let result = {
        let mut canvas = TermCanvas::new(&mut out, cols, rows);
        session::run(&config, &mut game, &mut canvas)
    };

    cleanup(&mut out)?;

    match result {
        Ok(outcome) => {
            log::info!("exiting: {outcome:?}");
            Ok(())
        }
        Err(err) => {
            // Keyboard failures end the run with a message, not a backtrace.
            eprintln!("flappy-pixel: input source failed: {err}");
            Ok(())
        }
    }
}
