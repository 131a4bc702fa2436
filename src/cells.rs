//! Display width of text as a terminal renders it.
//!
//! Widths follow the East Asian Width classification: characters in the
//! Wide and Fullwidth categories occupy two columns, everything else
//! (Ambiguous, Halfwidth, Neutral, Narrow and unassigned) occupies one.
//! Text is normalized to composed form (NFC) before measuring.

use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex};

use lru::LruCache;
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthChar;

/// Minimum string length to cache (shorter strings have minimal overhead).
const CACHE_MIN_LEN: usize = 8;

/// LRU cache for `display_width` on longer fragments.
static WIDTH_CACHE: LazyLock<Mutex<LruCache<String, usize>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(512).expect("non-zero"))));

/// Wide characters that `unicode-width` measures as zero columns: combining
/// marks and fillers whose East Asian Width is still W. Sorted, inclusive.
const ZERO_WIDTH_WIDE: &[(char, char)] = &[
    ('\u{115F}', '\u{115F}'),
    ('\u{302A}', '\u{302F}'),
    ('\u{3099}', '\u{309A}'),
    ('\u{3164}', '\u{3164}'),
    ('\u{16FE4}', '\u{16FE4}'),
    ('\u{16FF0}', '\u{16FF1}'),
    ('\u{1F3FB}', '\u{1F3FF}'),
];

fn is_zero_width_wide(c: char) -> bool {
    ZERO_WIDTH_WIDE
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                Ordering::Less
            } else if lo > c {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// Columns occupied by a single character.
///
/// Returns 2 for East Asian Wide and Fullwidth characters and 1 for every
/// other character, including control and combining characters.
#[must_use]
pub fn char_width(c: char) -> usize {
    // unicode-width reports 2 only for W and F; it misses the zero-width ones.
    if c.width() == Some(2) || is_zero_width_wide(c) {
        2
    } else {
        1
    }
}

fn compute_width(text: &str) -> usize {
    text.nfc().map(char_width).sum()
}

/// Total display width of `text` after NFC normalization.
///
/// Results for strings of 8+ bytes are kept in a small LRU cache; separator
/// lines and repeated status fragments hit it often.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.len() < CACHE_MIN_LEN {
        return compute_width(text);
    }

    if let Ok(mut cache) = WIDTH_CACHE.lock()
        && let Some(&cached) = cache.get(text)
    {
        return cached;
    }

    let width = compute_width(text);

    if let Ok(mut cache) = WIDTH_CACHE.lock() {
        cache.put(text.to_string(), width);
    }

    width
}

/// Number of characters (code points) in `text`, before normalization.
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Check if a string contains any double-width characters.
#[must_use]
pub fn has_wide_chars(text: &str) -> bool {
    text.chars().any(|c| char_width(c) > 1)
}
