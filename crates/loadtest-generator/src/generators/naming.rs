//! Generators for version strings, file names and systemd unit names.

use super::text::random_word;
use crate::document::GeneratedValue;
use rand::seq::SliceRandom;
use rand::Rng;

/// Unit type suffixes used by `systemd`.
pub const SYSTEMD_SUFFIXES: [&str; 11] = [
    "service",
    "socket",
    "target",
    "device",
    "mount",
    "automount",
    "swap",
    "timer",
    "path",
    "slice",
    "scope",
];

/// `log_version`: `v{0-9}.{0-99}.{0-99}`.
pub fn generate_log_version<R: Rng>(rng: &mut R) -> GeneratedValue {
    let major = rng.gen_range(0..=9);
    let minor = rng.gen_range(0..=99);
    let patch = rng.gen_range(0..=99);
    GeneratedValue::String(format!("v{major}.{minor}.{patch}"))
}

/// `file_name`: a word, a dot and the extension.
pub fn generate_file_name<R: Rng>(rng: &mut R, extension: &str) -> GeneratedValue {
    GeneratedValue::String(format!("{}.{extension}", random_word(rng)))
}

/// `systemd`: three hyphen-joined words plus a unit suffix.
pub fn generate_systemd_unit<R: Rng>(rng: &mut R) -> GeneratedValue {
    let words: Vec<&str> = (0..3).map(|_| random_word(rng)).collect();
    let suffix = SYSTEMD_SUFFIXES.choose(rng).copied().unwrap_or("service");
    GeneratedValue::String(format!("{}.{suffix}", words.join("-")))
}
