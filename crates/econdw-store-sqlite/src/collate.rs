//! The `DISPLAY_NAME` collation used to order countries and indicators.
//!
//! SQLite's built-in `BINARY` collation sorts by byte, which puts accented
//! names after every unaccented one ("Brasil" before "Bélgica"). This one
//! compares names with diacritics stripped and case folded, falling back to
//! a byte comparison so distinct names never compare equal.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization as _, char::is_combining_mark};

pub const DISPLAY_NAME: &str = "DISPLAY_NAME";

fn fold(s: &str) -> String {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .collect()
}

pub fn compare_display_names(a: &str, b: &str) -> Ordering {
  fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}
