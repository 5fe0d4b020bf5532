//! Session wiring: a clock thread and a blocking input thread funnel into
//! one channel, consumed by the loop that exclusively owns the game state.
//!
//! The channel serializes ticks against key presses, so a tick can never
//! overlap itself or interleave with a lift mid-update.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::style::Color;

use crate::game::{Config, Game, Status};
use crate::render::{ACCOMPLISHED_FG, Canvas, FAILED_FG, draw_banner};

/// Everything that may touch the game funnels through this type.
#[derive(Debug)]
pub enum Event {
    Tick,
    Lift,
    Quit,
    /// An unmapped key. Ignored during play; any key releases the final wait.
    OtherKey,
    /// The input source failed; the session ends with this error.
    Fault(io::Error),
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Verdict(Status),
    Aborted,
}

/// Run one session to its end: terminal verdict, user abort, or input fault.
pub fn run(config: &Config, game: &mut Game, canvas: &mut impl Canvas) -> io::Result<Outcome> {
    canvas.clear()?;
    game.draw_field(canvas)?;
    canvas.flush()?;

    let (tx, rx) = mpsc::channel();
    let running = Arc::new(AtomicBool::new(true));
    let clock = spawn_clock(config.tick_period, tx.clone(), running.clone());
    // Not joined: it sits in a blocking read until the process exits.
    let _input = spawn_input(tx, running.clone());

    log::info!(
        "session started: {}x{} field, {} tubes, tick every {:?}",
        config.width,
        config.height,
        config.tube_count,
        config.tick_period
    );

    let outcome = loop {
        let event = match rx.recv() {
            Ok(event) => event,
            // Both producers gone; nothing can move the game anymore.
            Err(_) => break Outcome::Aborted,
        };
        match event {
            Event::Tick => game.on_tick(canvas)?,
            Event::Lift => game.on_lift(canvas)?,
            Event::OtherKey => {}
            Event::Quit => {
                log::info!("session aborted by the player");
                break Outcome::Aborted;
            }
            Event::Fault(err) => {
                running.store(false, Ordering::Relaxed);
                return Err(err);
            }
        }
        canvas.flush()?;
        if game.status != Status::Ongoing {
            break Outcome::Verdict(game.status);
        }
    };
    // Stop the clock; any tick already queued is a no-op against a
    // terminal game.
    running.store(false, Ordering::Relaxed);

    if let Outcome::Verdict(status) = outcome {
        if let Some((message, fg)) = banner_for(status) {
            log::info!("session ended: {status:?}");
            draw_banner(
                canvas,
                config.width as i32,
                config.height as i32,
                message,
                fg,
            )?;
            wait_for_key(&rx);
        }
    }

    drop(rx);
    let _ = clock.join();
    Ok(outcome)
}

fn banner_for(status: Status) -> Option<(&'static str, Color)> {
    match status {
        Status::Failed => Some(("Mission failed!!!", FAILED_FG)),
        Status::Accomplished => Some(("Mission accomplished!!!", ACCOMPLISHED_FG)),
        Status::Ongoing => None,
    }
}

/// Hold the banner on screen until the player presses something.
fn wait_for_key(rx: &Receiver<Event>) {
    loop {
        match rx.recv() {
            Ok(Event::Lift | Event::Quit | Event::OtherKey) | Err(_) => return,
            // Stray ticks drained from the channel.
            Ok(_) => {}
        }
    }
}

/// Fixed-period tick source. Strictly periodic and non-reentrant: firings
/// queue on the channel and are applied one at a time by the consumer.
fn spawn_clock(period: Duration, tx: Sender<Event>, running: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(period);
            if tx.send(Event::Tick).is_err() {
                return;
            }
        }
    })
}

/// Blocking key reader. Space or Up lifts, Esc or `q` quits, anything else
/// is forwarded as an unmapped key. Read errors are handed to the consumer.
fn spawn_input(tx: Sender<Event>, running: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("input source failed: {err}");
                    let _ = tx.send(Event::Fault(err));
                    return;
                }
            };
            let mapped = match event {
                TermEvent::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char(' ') | KeyCode::Up => Event::Lift,
                    KeyCode::Esc | KeyCode::Char('q') => Event::Quit,
                    _ => Event::OtherKey,
                },
                _ => continue,
            };
            let quitting = matches!(mapped, Event::Quit);
            if tx.send(mapped).is_err() || quitting {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_matches_outcome() {
        let (message, fg) = banner_for(Status::Failed).unwrap();
        assert_eq!(message, "Mission failed!!!");
        assert_eq!(fg, FAILED_FG);

        let (message, fg) = banner_for(Status::Accomplished).unwrap();
        assert_eq!(message, "Mission accomplished!!!");
        assert_eq!(fg, ACCOMPLISHED_FG);

        assert!(banner_for(Status::Ongoing).is_none());
    }

    #[test]
    fn final_wait_skips_stray_ticks() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Tick).unwrap();
        tx.send(Event::Tick).unwrap();
        tx.send(Event::OtherKey).unwrap();
        wait_for_key(&rx);
        // Ticks were consumed along the way.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clock_stops_once_flag_clears() {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let clock = spawn_clock(Duration::from_millis(1), tx, running.clone());

        // At least one tick arrives while the flag is set.
        assert!(matches!(rx.recv(), Ok(Event::Tick)));

        running.store(false, Ordering::Relaxed);
        drop(rx);
        clock.join().unwrap();
    }
}
