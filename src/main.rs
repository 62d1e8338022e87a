//! Headless board runner (default binary).
//!
//! Reads one command per line from stdin (`spawn`, `left`, `right`, `down`, `rotate`,
//! `rotateCcw`, `drop`, `lock`, `tick`, `restart`; blank lines and `#` comments are skipped) and
//! writes one JSON record per command to stdout. When the game ends the final score
//! report is written and the runner stops.
//!
//! Configuration comes from `TETRIS_BOARD_WIDTH`, `TETRIS_BOARD_HEIGHT` and `TETRIS_SEED`.
//! Logs go to stderr at the level named by `TETRIS_LOG` (default `warn`).

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use tetris_board::core::{EngineConfig, GameSession, PieceSource};
use tetris_board::types::{Command, CommandOutcome, GravityOutcome};

const LOG_ENV: &str = "TETRIS_LOG";

fn main() -> Result<()> {
    init_tracing();

    let config = EngineConfig::from_env().context("invalid engine configuration")?;
    let mut session = GameSession::from_config(&config).context("failed to create session")?;
    info!(
        width = config.width,
        height = config.height,
        seed = ?config.seed,
        "session ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock(), &mut session)
}

fn init_tracing() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

fn run<R: BufRead, W: Write, S: PieceSource>(
    input: R,
    mut output: W,
    session: &mut GameSession<S>,
) -> Result<()> {
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("failed to read command")?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let Some(command) = Command::from_str(text) else {
            bail!("line {}: unknown command {:?}", idx + 1, text);
        };

        let record = match session.apply(command) {
            Ok(outcome) => json!({
                "command": command.as_str(),
                "outcome": outcome_json(outcome),
                "state": session.snapshot(),
            }),
            Err(err) => json!({
                "command": command.as_str(),
                "rejected": err.as_str(),
            }),
        };
        write_record(&mut output, &record)?;

        if let Some(report) = session.final_report() {
            info!(
                score = report.score,
                lines = report.lines,
                level = report.level,
                "game over"
            );
            write_record(&mut output, &json!({ "final": report }))?;
            break;
        }
    }

    output.flush().context("failed to flush output")?;
    Ok(())
}

fn outcome_json(outcome: CommandOutcome) -> Value {
    match outcome {
        CommandOutcome::Applied => json!("applied"),
        CommandOutcome::Dropped(rows) => json!({ "dropped": rows }),
        CommandOutcome::Locked(locked) => json!({ "locked": locked }),
        CommandOutcome::Gravity(GravityOutcome::Moved) => json!("moved"),
        CommandOutcome::Gravity(GravityOutcome::Locked(locked)) => json!({ "locked": locked }),
        CommandOutcome::Gravity(GravityOutcome::ToppedOut(locked)) => {
            json!({ "toppedOut": locked })
        }
        CommandOutcome::Restarted => json!("restarted"),
    }
}

fn write_record<W: Write>(output: &mut W, record: &Value) -> Result<()> {
    serde_json::to_writer(&mut *output, record).context("failed to encode record")?;
    writeln!(output).context("failed to write record")?;
    Ok(())
}
