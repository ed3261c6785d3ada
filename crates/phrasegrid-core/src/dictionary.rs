//! Dictionary loading: line-oriented word lists, optionally rating-annotated.
//!
//! Each line is either a bare word or `<rating 1-10><TAB><word>`. Entries are
//! normalized (see [`crate::phrase`]), filtered to the solver's word-length
//! range, thresholded by rating, and deduplicated keeping the highest rating.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Error;
use crate::phrase::normalize_phrase;

/// Slot lengths the solver can use; entries outside this range are dropped.
pub const MIN_WORD_LEN: usize = 4;
pub const MAX_WORD_LEN: usize = 7;

/// Tiny built-in pool used when the dictionary file is missing.
const FALLBACK_WORDS: &[&str] = &[
    "TITLE", "TENET", "LEVEL", "LILITH", "DENIES", "GUSTY", "GUTSY", "TATTY",
    "ANYHOW", "ANYHOO", "WANT", "WANTS",
];

/// Length-bucketed word pool.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    by_len: HashMap<usize, Vec<String>>,
}

impl Dictionary {
    /// Build directly from normalized words, keeping only usable lengths.
    /// First occurrence wins on duplicates.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Dictionary::default();
        let mut seen = HashMap::new();
        for word in words {
            let cleaned = normalize_phrase(word.as_ref());
            let len = cleaned.len();
            if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
                continue;
            }
            if seen.insert(cleaned.clone(), ()).is_none() {
                dict.by_len.entry(len).or_default().push(cleaned);
            }
        }
        dict
    }

    /// Words of exactly the given length.
    pub fn words_of_len(&self, len: usize) -> &[String] {
        self.by_len.get(&len).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total word count across all buckets.
    pub fn len(&self) -> usize {
        self.by_len.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_len.values().all(Vec::is_empty)
    }
}

/// Load statistics, for observability only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub lines_read: usize,
    pub parsed_rated: usize,
    pub parsed_unrated: usize,
    pub kept_rated: usize,
    pub kept_unrated: usize,
    pub unique_words: usize,
    pub used_fallback: bool,
}

/// Load a dictionary file, degrading to the built-in fallback pool if the
/// file does not exist. Other I/O failures are real errors.
pub fn load_dictionary(path: &Path, min_rating: u8) -> Result<(Dictionary, LoadSummary), Error> {
    match File::open(path) {
        Ok(file) => load_from_reader(BufReader::new(file), min_rating),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "dictionary not found, using built-in fallback pool");
            let mut summary = LoadSummary {
                used_fallback: true,
                ..LoadSummary::default()
            };
            let dict = Dictionary::from_words(FALLBACK_WORDS);
            summary.unique_words = dict.len();
            Ok((dict, summary))
        }
        Err(err) => Err(err.into()),
    }
}

/// Load from any line source. Exposed for tests and non-file inputs.
pub fn load_from_reader<R: BufRead>(
    reader: R,
    min_rating: u8,
) -> Result<(Dictionary, LoadSummary), Error> {
    let mut summary = LoadSummary::default();
    // Highest rating seen per normalized form; None = unrated.
    let mut best: HashMap<String, Option<u8>> = HashMap::new();
    // First-seen order, so candidate iteration stays deterministic.
    let mut order: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        summary.lines_read += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (rating, entry) = parse_line(line);
        match rating {
            Some(_) => summary.parsed_rated += 1,
            None => summary.parsed_unrated += 1,
        }

        let cleaned = normalize_phrase(entry);
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&cleaned.len()) {
            continue;
        }
        if let Some(r) = rating {
            if r < min_rating {
                continue;
            }
        }

        match best.get_mut(&cleaned) {
            None => {
                best.insert(cleaned.clone(), rating);
                order.push(cleaned);
            }
            Some(prev) => {
                // Unrated loses to any rated entry; rated keeps the maximum.
                if rating > *prev {
                    *prev = rating;
                }
            }
        }

        match rating {
            Some(_) => summary.kept_rated += 1,
            None => summary.kept_unrated += 1,
        }
    }

    let mut dict = Dictionary::default();
    for word in order {
        dict.by_len.entry(word.len()).or_default().push(word);
    }
    summary.unique_words = dict.len();
    debug!(
        lines = summary.lines_read,
        unique = summary.unique_words,
        rated = summary.kept_rated,
        unrated = summary.kept_unrated,
        "dictionary loaded"
    );
    Ok((dict, summary))
}

/// Split `<rating><TAB><word>` if the left field is an integer in 1..=10;
/// otherwise the whole line is an unrated entry.
fn parse_line(line: &str) -> (Option<u8>, &str) {
    if let Some((left, right)) = line.split_once('\t') {
        if let Ok(r) = left.trim().parse::<u8>() {
            if (1..=10).contains(&r) {
                return (Some(r), right);
            }
        }
    }
    (None, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(text: &str, min_rating: u8) -> (Dictionary, LoadSummary) {
        load_from_reader(Cursor::new(text), min_rating).unwrap()
    }

    #[test]
    fn parses_rated_and_bare_lines() {
        let (dict, summary) = load("9\tzoomers\nhello\n", 1);
        assert_eq!(summary.parsed_rated, 1);
        assert_eq!(summary.parsed_unrated, 1);
        assert_eq!(dict.words_of_len(7), ["ZOOMERS"]);
        assert_eq!(dict.words_of_len(5), ["HELLO"]);
    }

    #[test]
    fn rating_threshold_keeps_unrated() {
        let (dict, _) = load("3\tgusty\n8\ttatty\nlevel\n", 5);
        assert_eq!(dict.words_of_len(5), ["TATTY", "LEVEL"]);
    }

    #[test]
    fn length_filter() {
        let (dict, _) = load("cat\nwanted\nstretchy\n", 1);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.words_of_len(6), ["WANTED"]);
    }

    #[test]
    fn dedupe_keeps_highest_rating_and_first_position() {
        let (dict, summary) = load("tenet\n7\ttenet\n4\ttenet\n", 1);
        assert_eq!(dict.words_of_len(5), ["TENET"]);
        assert_eq!(summary.unique_words, 1);
    }

    #[test]
    fn non_numeric_left_field_is_an_unrated_word() {
        // The tab survives normalization as a dropped character.
        let (dict, summary) = load("abcd\tefg\n", 1);
        assert_eq!(summary.parsed_unrated, 1);
        assert_eq!(dict.words_of_len(7), ["ABCDEFG"]);
    }

    #[test]
    fn normalization_applies_to_entries() {
        let (dict, _) = load("café\n", 1);
        assert_eq!(dict.words_of_len(4), ["CAFE"]);
    }

    #[test]
    fn missing_file_falls_back() {
        let (dict, summary) =
            load_dictionary(Path::new("/nonexistent/word/list.txt"), 1).unwrap();
        assert!(summary.used_fallback);
        assert!(!dict.is_empty());
        assert!(dict.words_of_len(5).contains(&"TITLE".to_string()));
    }
}
