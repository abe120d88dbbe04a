use std::{path::PathBuf, time::Instant};

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use randomart::{grammars, Term};

mod logger;
mod output;
mod seed;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Source {
    /// Fuzz the default grammar
    Default,
    /// Fuzz the weighted example grammar
    Example,
    /// Use a horizontal gradient as is
    Grayscale,
    /// Use a fixed two-tone color pattern as is
    Cool,
}

/// Generates a random art image.
#[derive(Parser, Debug)]
#[command(name = "randomart", version)]
struct Options {
    /// Image output file
    #[arg(short, long, default_value = "randomart.png")]
    out: PathBuf,

    /// Seed string; a random seed is used when omitted
    #[arg(short, long)]
    seed: Option<String>,

    #[arg(long, default_value_t = randomart::DEFAULT_SIZE, value_parser = dimension())]
    width: u32,

    #[arg(long, default_value_t = randomart::DEFAULT_SIZE, value_parser = dimension())]
    height: u32,

    /// How many rule expansions may nest in the generated expression
    #[arg(short, long, default_value_t = randomart::DEFAULT_DEPTH)]
    depth: usize,

    /// Where the expression comes from
    #[arg(short, long, value_enum, default_value_t = Source::Default)]
    grammar: Source,

    /// Print the expression to stdout
    #[arg(short, long)]
    print: bool,

    /// Log more; repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn dimension() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..)
}

fn build_term(rng: &mut StdRng, source: Source, depth: usize) -> Result<Term> {
    let grammar = match source {
        Source::Default => grammars::default_grammar(),
        Source::Example => grammars::example_grammar(),
        Source::Grayscale => return Ok(grammars::grayscale()),
        Source::Cool => return Ok(grammars::cool()),
    };
    randomart::fuzz(rng, &grammar, depth).context("error generating an expression tree")
}

fn run(options: Options) -> Result<()> {
    let seed = match &options.seed {
        Some(input) => seed::from_str(input),
        None => seed::from_os().context("error seeding the RNG")?,
    };
    let mut rng = StdRng::from_seed(seed);

    let term = build_term(&mut rng, options.grammar, options.depth)?;
    log::info!(
        "expression has {} nodes and height {}",
        term.size(),
        term.height()
    );
    if options.print {
        println!("{term}");
    }

    let started = Instant::now();
    let raster = randomart::render(&mut rng, options.width, options.height, &term)?;
    log::info!(
        "rendered {}x{} in {:?}",
        raster.width(),
        raster.height(),
        started.elapsed()
    );

    output::write_png(&options.out, &raster).context("error saving the image")?;
    log::info!("wrote {}", options.out.display());
    Ok(())
}

fn main() {
    let options = Options::parse();
    if let Err(e) = logger::init(options.verbose) {
        eprintln!("randomart: {e}");
    }
    if let Err(e) = run(options) {
        eprintln!("randomart: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::try_parse_from(["randomart"]).unwrap();
        assert_eq!(options.out, PathBuf::from("randomart.png"));
        assert_eq!(options.seed, None);
        assert_eq!((options.width, options.height), (600, 600));
        assert_eq!(options.depth, randomart::DEFAULT_DEPTH);
        assert_eq!(options.grammar, Source::Default);
        assert!(!options.print);
        assert_eq!(options.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let options = Options::try_parse_from([
            "randomart", "-o", "a.png", "-s", "hello", "--width", "32", "--height", "16", "-d",
            "3", "-g", "cool", "-p", "-vv",
        ])
        .unwrap();
        assert_eq!(options.out, PathBuf::from("a.png"));
        assert_eq!(options.seed.as_deref(), Some("hello"));
        assert_eq!((options.width, options.height), (32, 16));
        assert_eq!(options.depth, 3);
        assert_eq!(options.grammar, Source::Cool);
        assert!(options.print);
        assert_eq!(options.verbose, 2);
    }

    #[test]
    fn test_rejects_empty_image() {
        assert!(Options::try_parse_from(["randomart", "--width", "0"]).is_err());
        assert!(Options::try_parse_from(["randomart", "--height", "-4"]).is_err());
    }

    #[test]
    fn test_same_seed_same_term() {
        let term = |input: &str| {
            let mut rng = StdRng::from_seed(seed::from_str(input));
            build_term(&mut rng, Source::Default, 4).unwrap()
        };
        assert_eq!(term("randomart"), term("randomart"));
        assert_eq!(
            build_term(&mut StdRng::seed_from_u64(0), Source::Grayscale, 4).unwrap(),
            grammars::grayscale()
        );
    }
}
