//! Parsing command-line arguments.

use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command, error::Result as ClapResult,
};
use std::{path::PathBuf, time::Duration};

fn is_density(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(d) if (0.0..=1.0).contains(&d) => Ok(d),
        Ok(_) => Err(String::from("density must be between 0 and 1")),
        Err(e) => Err(e.to_string()),
    }
}

/// Where the first generation comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Start {
    /// An empty board.
    Empty,
    /// A Plaintext pattern file.
    Pattern(PathBuf),
    /// A save string.
    Load(String),
    /// A random board.
    Random,
}

/// A struct to store the parse results.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Args {
    pub(crate) config_file: Option<PathBuf>,
    pub(crate) rows: Option<i32>,
    pub(crate) columns: Option<i32>,
    pub(crate) density: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) start: Start,
    pub(crate) generations: u64,
    pub(crate) interval: Option<Duration>,
    pub(crate) all: bool,
    pub(crate) save: bool,
    pub(crate) verbosity: u8,
}

fn command() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .long_about(
            "Runs Conway's Game of Life (B3/S23) on a bounded board\n\
             \n\
             The board is displayed in Plaintext format:\n\
             * Dead cells are represented by `.`;\n\
             * Living cells are represented by `o`.\n\
             \n\
             A board can be saved as a short base64 string with --save, \
             and loaded again with --load.\n",
        )
        .arg(
            Arg::new("ROWS")
                .help("Number of rows")
                .index(1)
                .required_unless_present("CONFIG")
                .value_parser(value_parser!(i32).range(1..)),
        )
        .arg(
            Arg::new("COLUMNS")
                .help("Number of columns")
                .index(2)
                .required_unless_present("CONFIG")
                .value_parser(value_parser!(i32).range(1..)),
        )
        .arg(
            Arg::new("CONFIG")
                .help("Board configuration file")
                .long_help(
                    "Board configuration file\n\
                     The format is chosen by the extension: .toml, .json, .yaml or .yml.\n\
                     Values given on the command line take precedence.\n",
                )
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("PATTERN")
                .help("Starts from a Plaintext pattern file")
                .long_help(
                    "Starts from a Plaintext pattern file\n\
                     `o`, `O`, `#` and `*` are living cells, other characters are dead. \
                     Lines starting with `!` are comments.\n",
                )
                .short('p')
                .long("pattern")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with_all(["LOAD", "RANDOM"]),
        )
        .arg(
            Arg::new("LOAD")
                .help("Starts from a save string printed by --save")
                .short('l')
                .long("load")
                .conflicts_with("RANDOM"),
        )
        .arg(
            Arg::new("RANDOM")
                .help("Starts from a random board")
                .short('r')
                .long("random")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("DENSITY")
                .help("Probability that a cell is alive on a random board")
                .short('d')
                .long("density")
                .value_parser(is_density),
        )
        .arg(
            Arg::new("SEED")
                .help("Seed of the random number generator")
                .long("seed")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("GENERATIONS")
                .help("Number of generations to run")
                .short('g')
                .long("generations")
                .default_value("1")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("INTERVAL")
                .help("Milliseconds between generations")
                .long_help(
                    "Milliseconds between generations\n\
                     When set, generations are driven by a ticker thread. \
                     A tick that arrives while the board is busy is dropped.\n",
                )
                .short('i')
                .long("interval")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("ALL")
                .help("Prints every generation instead of only the last one")
                .short('a')
                .long("all")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("SAVE")
                .help("Prints the save string of the final board")
                .short('s')
                .long("save")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("VERBOSE")
                .help("Logs more; repeat for even more")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count),
        )
}

impl Args {
    /// Parses the command-line arguments.
    pub(crate) fn parse() -> ClapResult<Self> {
        let matches = command().try_get_matches()?;
        Ok(Args::from_matches(&matches))
    }

    #[cfg(test)]
    fn parse_from<I, T>(args: I) -> ClapResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Args::from_matches(&matches))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let start = if let Some(path) = matches.get_one::<PathBuf>("PATTERN") {
            Start::Pattern(path.clone())
        } else if let Some(text) = matches.get_one::<String>("LOAD") {
            Start::Load(text.clone())
        } else if matches.get_flag("RANDOM") {
            Start::Random
        } else {
            Start::Empty
        };

        Args {
            config_file: matches.get_one::<PathBuf>("CONFIG").cloned(),
            rows: matches.get_one::<i32>("ROWS").copied(),
            columns: matches.get_one::<i32>("COLUMNS").copied(),
            density: matches.get_one::<f64>("DENSITY").copied(),
            seed: matches.get_one::<u64>("SEED").copied(),
            start,
            generations: matches.get_one::<u64>("GENERATIONS").copied().unwrap_or(1),
            interval: matches
                .get_one::<u64>("INTERVAL")
                .map(|&ms| Duration::from_millis(ms)),
            all: matches.get_flag("ALL"),
            save: matches.get_flag("SAVE"),
            verbosity: matches.get_count("VERBOSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn verify_command() {
        command().debug_assert();
    }

    #[test]
    fn defaults() -> ClapResult<()> {
        let args = Args::parse_from(["lifegrid", "10", "20"])?;
        assert_eq!(args.rows, Some(10));
        assert_eq!(args.columns, Some(20));
        assert_eq!(args.start, Start::Empty);
        assert_eq!(args.generations, 1);
        assert_eq!(args.interval, None);
        assert!(!args.all && !args.save);
        assert_eq!(args.verbosity, 0);
        Ok(())
    }

    #[test]
    fn options() -> ClapResult<()> {
        let args = Args::parse_from([
            "lifegrid", "8", "8", "-r", "-d", "0.5", "--seed", "3", "-g", "10", "-i", "20",
            "-as", "-vv",
        ])?;
        assert_eq!(args.start, Start::Random);
        assert_eq!(args.density, Some(0.5));
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.generations, 10);
        assert_eq!(args.interval, Some(Duration::from_millis(20)));
        assert!(args.all && args.save);
        assert_eq!(args.verbosity, 2);
        Ok(())
    }

    #[test]
    fn config_replaces_size() -> ClapResult<()> {
        let args = Args::parse_from(["lifegrid", "-c", "board.toml", "-p", "glider.cells"])?;
        assert_eq!(args.rows, None);
        assert_eq!(args.config_file, Some(PathBuf::from("board.toml")));
        assert_eq!(args.start, Start::Pattern(PathBuf::from("glider.cells")));
        Ok(())
    }

    #[test]
    fn rejected() {
        let kind = |args: &[&str]| Args::parse_from(args).map(drop).map_err(|e| e.kind());
        assert_eq!(
            kind(&["lifegrid", "10"]),
            Err(ErrorKind::MissingRequiredArgument)
        );
        assert_eq!(kind(&["lifegrid", "0", "10"]), Err(ErrorKind::ValueValidation));
        assert_eq!(
            kind(&["lifegrid", "5", "5", "-d", "1.5"]),
            Err(ErrorKind::ValueValidation)
        );
        assert_eq!(
            kind(&["lifegrid", "5", "5", "-r", "-l", "AAAA"]),
            Err(ErrorKind::ArgumentConflict)
        );
    }
}
