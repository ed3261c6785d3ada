//! Report emission and the puzzle-block external interface.
//!
//! Per attempted layout the report carries geometry, slots, crossings, and a
//! re-emitted puzzle block per accepted solution (across slots first in
//! row-major order, then down slots in column-major order). The block
//! grammar is consumed by external authoring tools, so it can also be parsed
//! back with descriptive failures.

use std::io::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::layout::{Direction, Layout, SlotId};
use crate::solver::Solution;

const SEPARATOR: &str =
    "----------------------------------------------------------------";

/// One `H`/`V` entry of a puzzle block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub direction: Direction,
    pub row: usize,
    pub col: usize,
    pub word: String,
}

/// A parsed puzzle block: the external handoff format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleBlock {
    pub phrase: String,
    pub width: usize,
    pub height: usize,
    pub words: Vec<PlacedWord>,
}

/// Run-level totals for the report trailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTotals {
    pub attempted: usize,
    pub solved: usize,
    pub total_solutions: usize,
    pub elapsed: Duration,
}

/// Serializes layouts and accepted solutions into the report format.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_run_header(
        &mut self,
        phrase: &str,
        letters: &str,
        dict_label: &str,
        seed: u64,
        mode_label: &str,
    ) -> Result<(), Error> {
        writeln!(self.out, "PHRASE: {phrase}")?;
        writeln!(self.out, "CLEAN_LETTERS: {letters}  (len={})", letters.len())?;
        writeln!(
            self.out,
            "GRID RANKING: crossing cells (desc); tie-break seed={seed}; total words mode={mode_label}"
        )?;
        writeln!(self.out, "Dictionary: {dict_label}")?;
        writeln!(self.out, "{SEPARATOR}")?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Write one layout's geometry and its accepted solutions.
    pub fn write_layout_block(
        &mut self,
        layout: &Layout,
        solutions: &[Solution],
        phrase: &str,
    ) -> Result<(), Error> {
        let across = layout.across_slots_row_major();
        let down = layout.down_slots_col_major();

        writeln!(
            self.out,
            "=== GRID W{}xH{}  |  FAMILY {}  |  GRID_ID: {}",
            layout.width,
            layout.height,
            layout.family(),
            layout.grid_id()
        )?;
        writeln!(
            self.out,
            "TOTAL_TRUE: {}   INTERSECTIONS: {}   DUP_SQUARES: {}",
            layout.filled_count(),
            layout.crossings.len(),
            layout.distinct_crossing_cells()
        )?;
        let row_lengths: Vec<String> = across
            .iter()
            .map(|&id| {
                let slot = &layout.slots[id];
                format!("R={}:LEN={}", slot.start.row, slot.length)
            })
            .collect();
        writeln!(self.out, "H-LENGTHS BY ROW: {}", row_lengths.join(", "))?;
        writeln!(self.out)?;

        writeln!(self.out, "SLOTS ({} total):", layout.slots.len())?;
        for &id in across.iter().chain(&down) {
            let slot = &layout.slots[id];
            match slot.direction {
                Direction::Across => writeln!(
                    self.out,
                    "  [H] R={}  C={}-{}  LEN={}",
                    slot.start.row,
                    slot.start.col,
                    slot.start.col + slot.length - 1,
                    slot.length
                )?,
                Direction::Down => writeln!(
                    self.out,
                    "  [V] C={}  R={}-{}  LEN={}",
                    slot.start.col,
                    slot.start.row,
                    slot.start.row + slot.length - 1,
                    slot.length
                )?,
            }
        }
        writeln!(self.out)?;

        // Sequence labels follow the slot listing: H1.. then V<k>..
        let mut label = vec![String::new(); layout.slots.len()];
        for (seq, &id) in across.iter().chain(&down).enumerate() {
            let prefix = match layout.slots[id].direction {
                Direction::Across => 'H',
                Direction::Down => 'V',
            };
            label[id] = format!("{}{}", prefix, seq + 1);
        }
        writeln!(self.out, "INTERSECTIONS (slot,pos <-> slot,pos @ r,c):")?;
        for x in &layout.crossings {
            writeln!(
                self.out,
                "  {},{} <-> {},{}  @ {}",
                label[x.slot_a], x.pos_a, label[x.slot_b], x.pos_b, x.cell
            )?;
        }
        writeln!(self.out)?;

        let cells = layout.mask.filled_cells();
        writeln!(self.out, "CELLS_TRUE (count={}):", cells.len())?;
        let cell_list: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        writeln!(self.out, "  {}", cell_list.join(" "))?;
        writeln!(self.out)?;
        writeln!(self.out, "ASCII (monospace): '#' filled, '.' empty")?;
        writeln!(self.out, "{}", layout.mask)?;

        if solutions.is_empty() {
            writeln!(self.out, "\n-- No unique solutions found within limits --")?;
            writeln!(self.out)?;
            return Ok(());
        }
        for (idx, solution) in solutions.iter().enumerate() {
            writeln!(self.out, "\nSOLUTION #{}:\n", idx + 1)?;
            write_puzzle_block(&mut self.out, phrase, layout, solution, &across, &down)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_separator(&mut self) -> Result<(), Error> {
        writeln!(self.out, "{SEPARATOR}")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_trailer(&mut self, totals: &RunTotals) -> Result<(), Error> {
        writeln!(self.out, "{SEPARATOR}")?;
        writeln!(self.out, "Attempted grids: {}", totals.attempted)?;
        writeln!(self.out, "Solved grids: {}", totals.solved)?;
        writeln!(self.out, "Total unique solutions: {}", totals.total_solutions)?;
        writeln!(self.out, "Elapsed: {:.2}s", totals.elapsed.as_secs_f64())?;
        Ok(())
    }
}

fn write_puzzle_block<W: Write>(
    out: &mut W,
    phrase: &str,
    layout: &Layout,
    solution: &Solution,
    across: &[SlotId],
    down: &[SlotId],
) -> Result<(), Error> {
    writeln!(out, "PHRASE: {phrase}")?;
    writeln!(out)?;
    writeln!(out, "WIDTH: {}", layout.width)?;
    writeln!(out, "HEIGHT: {}", layout.height)?;
    writeln!(out)?;
    writeln!(out, "WORDS:")?;
    for &id in across {
        let slot = &layout.slots[id];
        writeln!(
            out,
            "  H row={} col={} word={}",
            slot.start.row,
            slot.start.col,
            solution.word(id)
        )?;
    }
    for &id in down {
        let slot = &layout.slots[id];
        writeln!(
            out,
            "  V row={} col={} word={}",
            slot.start.row,
            slot.start.col,
            solution.word(id)
        )?;
    }
    Ok(())
}

/// Render a solution's puzzle block on its own, for downstream consumers.
pub fn puzzle_block_string(phrase: &str, layout: &Layout, solution: &Solution) -> String {
    let mut buf = Vec::new();
    let across = layout.across_slots_row_major();
    let down = layout.down_slots_col_major();
    // Writing into a Vec<u8> cannot fail.
    let _ = write_puzzle_block(&mut buf, phrase, layout, solution, &across, &down);
    String::from_utf8(buf).unwrap_or_default()
}

/// Parse a puzzle block back from text. Malformed input is rejected with a
/// line-numbered message; nothing is partially returned.
pub fn parse_puzzle_block(text: &str) -> Result<PuzzleBlock, Error> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, phrase) = next_field(&mut lines, "PHRASE:")?;
    let (width_line, width_text) = next_field(&mut lines, "WIDTH:")?;
    let width = parse_int(width_line, "WIDTH", width_text)?;
    let (height_line, height_text) = next_field(&mut lines, "HEIGHT:")?;
    let height = parse_int(height_line, "HEIGHT", height_text)?;

    let (words_line, words_rest) = next_field(&mut lines, "WORDS:")?;
    if !words_rest.is_empty() {
        return Err(Error::block_parse(
            words_line,
            "unexpected text after `WORDS:`",
        ));
    }

    let mut words = Vec::new();
    for (line_no, line) in lines {
        words.push(parse_word_line(line_no, line, width, height)?);
    }
    if words.is_empty() {
        return Err(Error::block_parse(words_line, "no word entries after `WORDS:`"));
    }
    Ok(PuzzleBlock {
        phrase: phrase.to_string(),
        width,
        height,
        words,
    })
}

fn next_field<'t>(
    lines: &mut impl Iterator<Item = (usize, &'t str)>,
    key: &str,
) -> Result<(usize, &'t str), Error> {
    match lines.next() {
        Some((line_no, line)) => match line.strip_prefix(key) {
            Some(rest) => Ok((line_no, rest.trim())),
            None => Err(Error::block_parse(
                line_no,
                format!("expected `{key}`, found `{line}`"),
            )),
        },
        None => Err(Error::block_parse(0, format!("missing `{key}` line"))),
    }
}

fn parse_int(line_no: usize, key: &str, text: &str) -> Result<usize, Error> {
    text.parse().map_err(|_| {
        Error::block_parse(line_no, format!("`{key}` is not an integer: `{text}`"))
    })
}

fn parse_word_line(
    line_no: usize,
    line: &str,
    width: usize,
    height: usize,
) -> Result<PlacedWord, Error> {
    let mut parts = line.split_whitespace();
    let direction = match parts.next() {
        Some("H") => Direction::Across,
        Some("V") => Direction::Down,
        other => {
            return Err(Error::block_parse(
                line_no,
                format!("expected `H` or `V`, found `{}`", other.unwrap_or("")),
            ))
        }
    };
    let row = parse_kv(line_no, parts.next(), "row")?;
    let col = parse_kv(line_no, parts.next(), "col")?;
    let word = match parts.next().and_then(|p| p.strip_prefix("word=")) {
        Some(w) if !w.is_empty() => w,
        _ => return Err(Error::block_parse(line_no, "missing `word=` field")),
    };
    if !word.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(Error::block_parse(
            line_no,
            format!("word `{word}` is not all uppercase A-Z"),
        ));
    }
    let fits = match direction {
        Direction::Across => row < height && col + word.len() <= width,
        Direction::Down => col < width && row + word.len() <= height,
    };
    if !fits {
        return Err(Error::block_parse(
            line_no,
            format!("word `{word}` does not fit a {width}x{height} grid at ({row},{col})"),
        ));
    }
    Ok(PlacedWord {
        direction,
        row,
        col,
        word: word.to_string(),
    })
}

fn parse_kv(line_no: usize, part: Option<&str>, key: &str) -> Result<usize, Error> {
    let text = part
        .and_then(|p| p.strip_prefix(&format!("{key}=")))
        .ok_or_else(|| Error::block_parse(line_no, format!("missing `{key}=` field")))?;
    text.parse()
        .map_err(|_| Error::block_parse(line_no, format!("`{key}` is not an integer: `{text}`")))
}
