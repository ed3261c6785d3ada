//! phrasegrid: generate symmetric letter grids that spend a phrase exactly.
//!
//! Enumerates candidate layouts for the requested word-count families,
//! keeps those whose filled-cell count matches the phrase's letter count,
//! ranks them by crossing density, and runs the bounded backtracking fill
//! over the top-ranked grids, appending each attempt to a timestamped
//! report file.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use phrasegrid_core::{
    enumerate_layouts, load_dictionary, normalize_phrase, rank_layouts, EnumeratorConfig,
    FillConfig, FillEvent, Filler, GridMask, Layout, ReportWriter, RunTotals,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WordsMode {
    #[value(name = "5")]
    Five,
    #[value(name = "6")]
    Six,
    Both,
}

impl WordsMode {
    fn totals(self) -> &'static [usize] {
        match self {
            WordsMode::Five => &[5],
            WordsMode::Six => &[6],
            WordsMode::Both => &[5, 6],
        }
    }

    fn label(self) -> &'static str {
        match self {
            WordsMode::Five => "5",
            WordsMode::Six => "6",
            WordsMode::Both => "5&6",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "phrasegrid",
    version,
    about = "Symmetric letter-grid solver: fill ranked layouts with words that exactly spend a phrase's letters"
)]
struct Args {
    /// Input phrase; prompted for interactively when omitted.
    #[arg(long)]
    phrase: Option<String>,

    /// Dictionary file: one `word` or `rating<TAB>word` per line.
    #[arg(long, value_name = "PATH", default_value = "words.txt")]
    dict: PathBuf,

    /// Minimum dictionary rating to include (unrated entries always pass).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=10))]
    min_rating: u8,

    /// Use 5-word layouts, 6-word layouts, or both.
    #[arg(long, value_enum, default_value_t = WordsMode::Both)]
    words_mode: WordsMode,

    /// How many ranked grids to attempt.
    #[arg(long, default_value_t = 50)]
    max_grids: usize,

    /// Upper bound on unique solutions per grid.
    #[arg(long, default_value_t = 5)]
    solutions_per_grid: usize,

    /// Soft time cap per grid, in seconds (0 = unbounded).
    #[arg(long, default_value_t = 5)]
    per_grid_time: u64,

    /// Reject layouts with fewer crossing cells than this.
    #[arg(long, default_value_t = 0)]
    min_intersections: usize,

    /// Tie-break seed for grids with equal crossing counts.
    #[arg(long, default_value_t = 0)]
    grid_seed: u64,

    /// Suppress heartbeat progress lines.
    #[arg(long)]
    quiet: bool,

    /// Stop after this many solutions across all grids (0 = no cap).
    #[arg(long, default_value_t = 0)]
    total_solutions_cap: usize,

    /// Directory for the timestamped report file.
    #[arg(long, value_name = "DIR", default_value = "./solver_outputs")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let phrase = match &args.phrase {
        Some(p) => p.clone(),
        None => prompt("Enter phrase: ")?,
    };
    let letters = normalize_phrase(&phrase);
    if letters.is_empty() {
        bail!("no letters found in phrase");
    }

    let (dictionary, summary) = load_dictionary(&args.dict, args.min_rating)
        .with_context(|| format!("loading dictionary {}", args.dict.display()))?;
    if summary.used_fallback {
        println!(
            "[WARN] Dictionary not found at {}. Using tiny fallback.",
            args.dict.display()
        );
    }
    println!(
        "Dictionary load: read {} lines -> kept {} unique entries \
         (unrated kept={}; rated>={} kept={}; parsed unrated={}; parsed rated={})",
        summary.lines_read,
        summary.unique_words,
        summary.kept_unrated,
        args.min_rating,
        summary.kept_rated,
        summary.parsed_unrated,
        summary.parsed_rated
    );

    println!("Enumerating layouts...");
    let mut layouts: Vec<Layout> = Vec::new();
    let mut seen_masks: HashSet<GridMask> = HashSet::new();
    for &total_words in args.words_mode.totals() {
        let config =
            EnumeratorConfig::new(total_words).with_min_crossings(args.min_intersections);
        for layout in enumerate_layouts(config) {
            // Exact letter-count filter, plus mask dedupe across modes.
            if layout.filled_count() == letters.len() && seen_masks.insert(layout.mask.clone()) {
                layouts.push(layout);
            }
        }
    }

    let total_candidates = layouts.len();
    debug!(
        candidates = total_candidates,
        letters = letters.len(),
        "layouts after exact letter-count filter"
    );
    if total_candidates == 0 {
        println!(
            "No feasible layouts for phrase length {} with {}-word mode.",
            letters.len(),
            args.words_mode.label()
        );
        return Ok(());
    }

    let ranked = rank_layouts(layouts, args.grid_seed);
    let selected: Vec<Layout> = ranked.into_iter().take(args.max_grids).collect();
    println!(
        "Attempting {} of {} possible {}-letter grids \
         ({}-word layouts ranked by crossing cells desc; ties randomized).",
        selected.len(),
        total_candidates,
        letters.len(),
        args.words_mode.label()
    );

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output dir {}", args.output_dir.display()))?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let out_path = args.output_dir.join(format!("solutions_{timestamp}.txt"));
    let file = File::create(&out_path)
        .with_context(|| format!("creating report file {}", out_path.display()))?;
    let mut report = ReportWriter::new(BufWriter::new(file));
    report.write_run_header(
        &phrase,
        &letters,
        &args.dict.display().to_string(),
        args.grid_seed,
        args.words_mode.label(),
    )?;

    let started = Instant::now();
    let mut totals = RunTotals::default();
    for (idx, layout) in selected.iter().enumerate() {
        if args.total_solutions_cap > 0 && totals.total_solutions >= args.total_solutions_cap {
            println!(
                "Reached global cap of {} solutions. Stopping early.",
                args.total_solutions_cap
            );
            break;
        }
        totals.attempted += 1;

        println!(
            "[{}/{}] W{}xH{} * {} * crossings={} * time cap={}s * up to {} solutions...",
            idx + 1,
            selected.len(),
            layout.width,
            layout.height,
            layout.family(),
            layout.distinct_crossing_cells(),
            args.per_grid_time,
            args.solutions_per_grid
        );

        let mut max_solutions = args.solutions_per_grid;
        if args.total_solutions_cap > 0 {
            max_solutions =
                max_solutions.min(args.total_solutions_cap - totals.total_solutions);
        }
        let filler = Filler::new(FillConfig {
            max_solutions,
            time_limit: (args.per_grid_time > 0)
                .then(|| Duration::from_secs(args.per_grid_time)),
            ..FillConfig::default()
        });

        let quiet = args.quiet;
        let outcome =
            filler.fill_with_events(layout, &dictionary, &letters, &mut |event| {
                if quiet {
                    return;
                }
                match event {
                    FillEvent::Heartbeat {
                        found,
                        goal,
                        elapsed,
                    } => println!(
                        "    ... found {}/{} unique so far ({:.1}s elapsed)",
                        found,
                        goal,
                        elapsed.as_secs_f64()
                    ),
                    FillEvent::SolutionFound { index, elapsed } => println!(
                        "    + solution #{} at {:.1}s",
                        index,
                        elapsed.as_secs_f64()
                    ),
                }
            });

        if outcome.skipped {
            println!("    - no candidates for at least one slot; skipping.");
        } else if outcome.solutions.is_empty() {
            if !args.quiet {
                println!("    - no solutions (cap {}s)", args.per_grid_time);
            }
        } else {
            totals.solved += 1;
            totals.total_solutions += outcome.solutions.len();
            if !args.quiet {
                println!("    solved {} unique", outcome.solutions.len());
            }
        }

        report.write_layout_block(layout, &outcome.solutions, &phrase)?;
        report.write_separator()?;
    }

    totals.elapsed = started.elapsed();
    report.write_trailer(&totals)?;
    report.into_inner().flush()?;
    println!(
        "Done. Attempted {} grids; solved {}/{}; total unique solutions {}; elapsed {:.1}s",
        totals.attempted,
        totals.solved,
        totals.attempted,
        totals.total_solutions,
        totals.elapsed.as_secs_f64()
    );
    println!("Output: {}", out_path.display());
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
