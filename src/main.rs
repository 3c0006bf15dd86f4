use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use media_monopoly::game::economy;
use media_monopoly::{Agent, Game, GameState, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless media agency board game", long_about = None)]
struct Cli {
    /// Number of seats, from 3 to 5.
    #[arg(long, default_value_t = 3)]
    players: usize,
    /// Seat names, in order.
    #[arg(long, value_delimiter = ',', default_value = "Agency Alpha,Beta Media,Gamma Group,Delta Comms,Epsilon")]
    names: Vec<String>,
    /// Seed for the dice and card draws. Unpredictable when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON settings file. Falls back to MEDIA_MONOPOLY_SETTINGS, then to the defaults.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Stop after this many turns if nobody has won.
    #[arg(long, default_value_t = 400)]
    max_turns: u32,
    /// Print the final state as JSON instead of the standings.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_from_env(),
    };

    let mut game = match cli.seed {
        Some(seed) => Game::with_seed(settings, seed),
        None => Game::new(settings),
    };
    game.configure_and_start(cli.players, &cli.names)?;

    // Alternate the two kinds of agent around the table
    let agents: Vec<Agent> = (0..cli.players)
        .map(|seat| {
            if seat % 2 == 0 {
                Agent::new_greedy(3_000)
            } else {
                Agent::new_cautious(2_000)
            }
        })
        .collect();

    let start = Instant::now();

    while !game.is_over() && game.snapshot().turn <= cli.max_turns {
        let seat = game.snapshot().current_player_index;
        agents[seat].play_turn(&mut game)?;
    }

    info!(
        turns = game.snapshot().turn,
        winner = ?game.snapshot().winner,
        elapsed = ?start.elapsed(),
        "demo.finished"
    );

    if cli.json {
        println!("{}", game.snapshot_json()?);
    } else {
        print_standings(game.snapshot());
    }

    Ok(())
}

fn print_standings(state: &GameState) {
    print!("{}", state);

    for player in &state.players {
        println!(
            "{:<16} net worth \x1b[32m{}\x1b[0m",
            player.name,
            economy::net_worth(player)
        );
    }

    match state.winner {
        Some(winner) => println!("Winner: {}", state.players[winner].name),
        None => println!("No winner after {} turns", state.turn),
    }
}
