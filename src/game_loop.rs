use crate::player::Player;
use crate::report;
use anyhow::{bail, Context, Result};
use lineup_core::engine::config::TimeoutPolicy;
use lineup_core::engine::search::SearchEngine;
use lineup_core::engine::Searcher;
use lineup_core::logic::board::{BoardParams, Pos, Symbol};
use lineup_core::logic::game::{GameState, GameStatus};
use lineup_core::LineupError;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing::info;

/// Searches finishing closer than this to the budget are flagged in the trace.
const NEAR_BUDGET: Duration = Duration::from_millis(100);

enum Verdict {
    Move(Pos),
    OutOfTime,
}

/// Plays one game to completion and returns how it ended.
///
/// `players` holds X then O. Human moves are read line by line from `input`.
pub fn play_game<R: BufRead>(
    params: BoardParams,
    players: [&Player; 2],
    engine: &mut SearchEngine,
    recommend: bool,
    input: &mut R,
) -> Result<GameStatus> {
    let [player_x, player_o] = players;
    let mut game = GameState::new(params);
    engine.new_game();

    info!("Player X: {player_x}");
    info!("Player O: {player_o}");

    loop {
        info!("\n{}", game.board);
        if game.status.is_over() {
            break;
        }

        let turn = game.turn;
        let player = match turn {
            Symbol::X => player_x,
            Symbol::O => player_o,
        };

        let verdict = if player.is_ai() || recommend {
            Some(consult(&mut game, player, engine)?)
        } else {
            None
        };

        let pos = if player.is_ai() {
            match verdict {
                Some(Verdict::Move(pos)) => pos,
                Some(Verdict::OutOfTime) => {
                    info!("Player {turn} lost, they ran out of time!");
                    game.forfeit();
                    break;
                }
                None => bail!("no search was run for AI player {turn}"),
            }
        } else {
            if matches!(verdict, Some(Verdict::OutOfTime)) {
                info!("No recommendation: the search ran out of time");
            }
            read_move(input, &game)?
        };

        game.make_move(pos)?;
    }

    match game.status {
        GameStatus::Won(symbol) => info!("The winner is {symbol}!"),
        GameStatus::Forfeit { loser } => {
            info!("The winner is {} ({loser} forfeited)!", loser.opposite());
        }
        GameStatus::Tie => info!("It's a tie!"),
        GameStatus::Playing => {}
    }
    Ok(game.status)
}

/// Runs the search for the side to move and applies the time rules.
fn consult(game: &mut GameState, player: &Player, engine: &mut SearchEngine) -> Result<Verdict> {
    let turn = game.turn;
    let budget = player.search.time_budget();

    let start = Instant::now();
    let outcome = engine.find_move(&mut game.board, turn, &player.search);
    let elapsed = start.elapsed();

    let result = match outcome {
        Ok(result) => result,
        Err(LineupError::SearchTimeout { .. }) => {
            report::log_stats(engine.last_stats());
            return Ok(Verdict::OutOfTime);
        }
        Err(e) => return Err(e.into()),
    };
    report::log_stats(&result.stats);

    // A timed-out result already carries the engine's fallback move.
    if !result.timed_out
        && elapsed >= budget
        && engine.config().on_timeout == TimeoutPolicy::Forfeit
    {
        return Ok(Verdict::OutOfTime);
    }
    if result.timed_out || budget.saturating_sub(elapsed) < NEAR_BUDGET {
        info!("*** Search ran out of time ***");
    }

    let Some(pos) = result.best_move else {
        bail!("search returned no move for an unfinished game");
    };
    if result.timed_out {
        info!("Selected random move for {turn}: {pos}");
    }
    if player.is_ai() {
        info!(
            "Player {turn} under AI control plays: {pos} (score: {:.4})",
            result.score
        );
    } else {
        info!("Recommended move: {pos} (score: {:.4})", result.score);
    }
    Ok(Verdict::Move(pos))
}

/// Prompts until the player enters an empty cell such as `B2`.
fn read_move<R: BufRead>(input: &mut R, game: &GameState) -> Result<Pos> {
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "Player {}, enter your move: ", game.turn)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("reading move")?;
        if read == 0 {
            bail!("input closed before the game ended");
        }

        match Pos::parse(&line) {
            Ok(pos) if game.board.is_valid(pos) => return Ok(pos),
            Ok(pos) => writeln!(stdout, "{pos} is not an empty cell on this board")?,
            Err(e) => writeln!(stdout, "{e}")?,
        }
    }
}
