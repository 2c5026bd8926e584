//! Terminal versus-Tetris runner.
//!
//! Wires input, session ticking, and rendering into a fixed-cadence loop.
//! Logging goes to a file because the alternate screen owns stdout.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};
use flexi_logger::{FileSpec, Logger};

use tetris_duel::input::{map_key, should_quit, InputCommand};
use tetris_duel::session::GameSession;
use tetris_duel::term::{GameView, TerminalRenderer};
use tetris_duel::types::TICK_MS;

fn parse_seed(args: &[String]) -> Result<u32> {
    let mut seed: u32 = 1;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(seed)
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .basename("tetris-duel")
                .suppress_timestamp(),
        )
        .start()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = parse_seed(&args)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, seed: u32) -> Result<()> {
    let mut session = GameSession::new(seed);
    session.start();

    let view = GameView;
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let fb = view.render(&session.snapshot());
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match map_key(key) {
                        Some(InputCommand::Game(action)) => session.handle_action(action),
                        Some(InputCommand::TogglePause) => session.toggle_pause(),
                        Some(InputCommand::Restart) => session.restart(),
                        None => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_seed;

    #[test]
    fn test_parse_seed_default_and_value() {
        assert_eq!(parse_seed(&[]).unwrap(), 1);
        let args = vec!["--seed".to_string(), "99".to_string()];
        assert_eq!(parse_seed(&args).unwrap(), 99);
    }

    #[test]
    fn test_parse_seed_rejects_bad_input() {
        assert!(parse_seed(&["--seed".to_string()]).is_err());
        assert!(parse_seed(&["--seed".to_string(), "abc".to_string()]).is_err());
        assert!(parse_seed(&["--bogus".to_string()]).is_err());
    }
}
