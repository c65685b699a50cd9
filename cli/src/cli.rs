//! Runs a board from the parsed command-line arguments.

use crate::args::{Args, Start};
use anyhow::{bail, Context, Result};
use lifegrid_lib::{Board, ChangeSet, Config, SharedBoard, World};
use log::{debug, info, LevelFilter};
use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::mpsc,
    thread,
};

/// Initializes the logger. `RUST_LOG` overrides the verbosity.
pub(crate) fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Parses a configuration file, choosing the format by its extension.
fn parse_config(text: &str, extension: &str) -> Result<Config> {
    let config = match extension {
        "toml" => toml::from_str(text)?,
        "json" => serde_json::from_str(text)?,
        "yaml" | "yml" => serde_yaml::from_str(text)?,
        _ => bail!("unknown configuration format: {:?}", extension),
    };
    Ok(config)
}

/// Reads the configuration file, if any, then applies the command-line
/// options on top of it.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            parse_config(&text, extension)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(density) = args.density {
        config.density = density;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn read_pattern(path: &Path, config: &Config) -> Result<World> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let world = World::from_plaintext(&text, config.rows, config.columns)
        .with_context(|| format!("pattern {} does not fit the board", path.display()))?;
    Ok(world)
}

/// Creates the first generation.
fn start_board(args: &Args, config: Config) -> Result<Board> {
    let board = match &args.start {
        Start::Empty => config.board()?,
        Start::Pattern(path) => {
            let world = read_pattern(path, &config)?;
            Board::from_world(config, world)?
        }
        Start::Load(text) => Board::load(text, config).context("failed to load the board")?,
        Start::Random => {
            let mut board = config.board()?;
            board.randomize_default()?;
            board.clear_history();
            board
        }
    };
    info!(
        "{}x{} board with {} living cells",
        board.rows(),
        board.columns(),
        board.population()
    );
    Ok(board)
}

fn print_generation(
    out: &mut impl Write,
    world: &World,
    changes: &ChangeSet,
    all: bool,
) -> Result<()> {
    writeln!(
        out,
        "Generation {}: population {}, {} born, {} died",
        world.generation(),
        world.population(),
        changes.born.len(),
        changes.died.len()
    )?;
    if all {
        write!(out, "{}", world)?;
    }
    Ok(())
}

/// Runs the generations one after another on the current thread.
fn run_plain(board: &mut Board, args: &Args, out: &mut impl Write) -> Result<()> {
    for _ in 0..args.generations {
        let changes = board.step();
        debug!("{} cells changed", changes.len());
        if args.all {
            let changes = changes.clone();
            print_generation(out, board.world(), &changes, true)?;
        }
    }
    Ok(())
}

/// Runs the generations from a ticker thread.
///
/// The ticker fires once per interval. Ticks that find the board busy are
/// dropped and do not count as generations.
fn drive(shared: &SharedBoard, args: &Args, out: &mut impl Write) -> Result<()> {
    let interval = match args.interval {
        Some(interval) => interval,
        None => bail!("no interval given"),
    };
    let (tx, rx) = mpsc::channel();

    // With --all every generation is copied out under the lock that produced
    // it and sent here; otherwise only the final board is printed.
    let ticker = {
        let shared = shared.clone();
        let generations = args.generations;
        let all = args.all;
        thread::spawn(move || -> lifegrid_lib::Result<u64> {
            let mut done = 0;
            let mut dropped = 0;
            while done < generations {
                thread::sleep(interval);
                let ticked = if all {
                    shared.tick_view()?.map(Some)
                } else {
                    shared.tick()?.map(|_| None)
                };
                match ticked {
                    Some(view) => {
                        done += 1;
                        if let Some(view) = view {
                            if tx.send(view).is_err() {
                                break;
                            }
                        }
                    }
                    None => dropped += 1,
                }
            }
            Ok(dropped)
        })
    };

    for (world, changes) in rx.iter() {
        print_generation(out, &world, &changes, true)?;
    }

    let dropped = match ticker.join() {
        Ok(result) => result?,
        Err(_) => bail!("the ticker thread panicked"),
    };
    info!("{} ticks dropped", dropped);
    Ok(())
}

/// Prints the final board, unless it has just been printed.
fn finish(board: &Board, args: &Args, out: &mut impl Write) -> Result<()> {
    if !args.all {
        print_generation(out, board.world(), board.changes(), false)?;
        write!(out, "{}", board.world())?;
    }
    if args.save {
        writeln!(out, "{}", board.save())?;
    }
    Ok(())
}

/// Runs the board as described by `args`, writing the output to `out`.
fn run_with(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = load_config(args)?;
    let mut board = start_board(args, config)?;

    if args.interval.is_some() {
        let shared = SharedBoard::new(board);
        drive(&shared, args, out)?;
        shared.with(|board| finish(board, args, out))?
    } else {
        run_plain(&mut board, args, out)?;
        finish(&board, args, out)
    }
}

/// Runs the board as described by `args`, writing to stdout.
pub(crate) fn run(args: Args) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(&args, &mut out)
}
