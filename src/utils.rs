//! Utility helpers used across the crate.
//!
//! Word-list loading, partitioning of the list into worker ranges, and the
//! mapping from a word to its request URL and record file name.
use crate::state::WordRange;
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sanitize_filename::sanitize;
use std::path::Path;
use url::Url;

/// Characters left untouched when a word is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters left untouched when a word has to be escaped into a file name.
const FILE_STEM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Reads the input list: one word per line, trailing whitespace stripped.
///
/// Blank lines are dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read word list {}", path.display()))?;

    Ok(content
        .lines()
        .map(|l| l.trim_end().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Divides `total` words into exactly `worker_count` contiguous ranges.
///
/// Every range holds `total / worker_count` words except the last one, which
/// also absorbs the remainder. When there are fewer words than workers the
/// leading ranges are empty.
pub fn calculate_ranges(total: usize, worker_count: usize) -> Vec<WordRange> {
    let worker_count = worker_count.max(1);
    let per_worker = total / worker_count;

    (0..worker_count)
        .map(|i| {
            let start = i * per_worker;
            let end = if i == worker_count - 1 {
                total
            } else {
                start + per_worker
            };

            WordRange {
                index: i,
                start,
                end,
            }
        })
        .collect()
}

/// File name (without directory) of the record for `word`.
///
/// Words that are already safe file names are used as they are. Anything
/// else is percent-encoded, and the encoding always contains a `%`, which a
/// plain name never does, so distinct words never share a record. The empty
/// word maps to `%.json`.
pub fn record_file_name(word: &str) -> String {
    let stem = if word.is_empty() {
        "%".to_string()
    } else if !word.contains('%') && sanitize(word) == word {
        word.to_string()
    } else {
        utf8_percent_encode(word, FILE_STEM).to_string()
    };
    format!("{}.json", stem)
}

/// Builds the definition URL for `word` under `base`.
///
/// Spaces become underscores, the way page titles are written, and
/// everything else outside the unreserved set is percent-encoded.
pub fn definition_url(base: &Url, word: &str) -> Result<Url, url::ParseError> {
    let title = word.replace(' ', "_");
    let segment = utf8_percent_encode(&title, PATH_SEGMENT).to_string();
    base.join(&segment)
}
