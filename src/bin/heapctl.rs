//! Interactive driver for the indexed heap protocol
//!
//! Reads commands from stdin (or a file) and answers on stdout, one line per
//! response. See [`indexed_heap::protocol`] for the command table.
//!
//! ## Running
//!
//! ```bash
//! printf 'add 8 a\nadd 3 b\nmin\nprint\n' | cargo run --bin heapctl
//!
//! # Root holds the largest key instead
//! cargo run --bin heapctl -- --reverse --input commands.txt
//!
//! # Report rejected commands and a summary on stderr
//! cargo run --bin heapctl -- --verbose < commands.txt
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indexed_heap::order::{KeyOrder, Natural, Reversed};
use indexed_heap::protocol::{Key, RunSummary, Session, Value};
use indexed_heap::IndexedHeap;

#[derive(Parser)]
#[command(name = "heapctl")]
#[command(about = "Drive an indexed heap with line-oriented commands")]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Order keys from largest to smallest
    #[arg(long)]
    reverse: bool,

    /// Report rejected commands and a final summary on stderr
    #[arg(long, short)]
    verbose: bool,
}

fn run<O>(order: O, input: impl BufRead, verbose: bool) -> Result<RunSummary>
where
    O: KeyOrder<Key>,
{
    let mut session = Session::new(IndexedHeap::<Key, Value, O>::with_order(order));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    session
        .run_with(input, &mut out, |diagnostic| {
            if verbose {
                eprintln!("heapctl: {}", diagnostic);
            }
        })
        .context("failed to process commands")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let summary = if args.reverse {
        run(Reversed, input, args.verbose)?
    } else {
        run(Natural, input, args.verbose)?
    };

    if args.verbose {
        eprintln!(
            "heapctl: {} commands, {} failed, {} skipped",
            summary.executed, summary.failed, summary.skipped
        );
    }
    Ok(())
}
