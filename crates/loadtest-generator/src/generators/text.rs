//! String and word list generators.

use crate::document::GeneratedValue;
use rand::seq::SliceRandom;
use rand::Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length range for each token produced by `words`.
const WORD_LEN_MIN: usize = 3;
const WORD_LEN_MAX: usize = 9;

/// Pool of realistic words used for file and unit names.
pub const LOREM_WORDS: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium", "doloremque",
    "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis", "et", "quasi",
    "architecto", "beatae", "vitae", "dicta", "sunt", "explicabo", "aspernatur", "odit", "fugit",
    "sed", "quia", "consequuntur", "magni", "dolores", "eos", "qui", "ratione", "sequi", "nesciunt",
    "neque", "dolorem", "ipsum", "dolor", "amet", "consectetur", "adipisci", "velit", "non",
    "numquam", "eius", "modi", "tempora", "incidunt", "ut", "labore", "dolore", "magnam",
    "aliquam", "quaerat", "enim", "minima", "veniam", "quis", "nostrum", "exercitationem",
    "ullam", "corporis", "nemo", "ipsam", "voluptas", "suscipit", "laboriosam", "nisi",
    "aliquid", "ex", "ea", "commodi", "autem", "vel", "eum", "iure", "reprehenderit", "quo",
    "molestiae", "illum", "fugiat", "pariatur", "at", "vero", "accusamus", "officiis",
    "debitis", "necessitatibus", "saepe", "eveniet", "recusandae", "itaque", "earum", "rerum",
    "hic", "tenetur", "sapiente", "delectus", "reiciendis", "maiores", "doloribus", "asperiores",
    "repellat",
];

/// Pick one word from [`LOREM_WORDS`].
pub fn random_word<R: Rng>(rng: &mut R) -> &'static str {
    LOREM_WORDS.choose(rng).copied().unwrap_or("lorem")
}

/// `str`: a token whose length is in `min_len..=max_len` and whose characters
/// are each independently a letter or a digit.
pub fn generate_alphanumeric<R: Rng>(rng: &mut R, min_len: usize, max_len: usize) -> GeneratedValue {
    let length = rng.gen_range(min_len..=max_len);
    let token: String = (0..length)
        .map(|_| {
            let class = if rng.gen_bool(0.5) { LETTERS } else { DIGITS };
            class[rng.gen_range(0..class.len())] as char
        })
        .collect();
    GeneratedValue::String(token)
}

/// `words`: `min..=max` alphanumeric words of 3 to 9 characters, space-joined.
pub fn generate_words<R: Rng>(rng: &mut R, min: usize, max: usize) -> GeneratedValue {
    let count = rng.gen_range(min..=max);
    let words: Vec<String> = (0..count)
        .map(|_| {
            let len = rng.gen_range(WORD_LEN_MIN..=WORD_LEN_MAX);
            (0..len)
                .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
                .collect()
        })
        .collect();
    GeneratedValue::String(words.join(" "))
}

/// `dict`: `min..=max` entries sampled with replacement from the dictionary.
///
/// An empty dictionary yields an empty string.
pub fn generate_dict_words<R: Rng>(
    rng: &mut R,
    dictionary: &[String],
    min: usize,
    max: usize,
) -> GeneratedValue {
    if dictionary.is_empty() {
        return GeneratedValue::String(String::new());
    }

    let count = rng.gen_range(min..=max);
    let words: Vec<&str> = (0..count)
        .filter_map(|_| dictionary.choose(rng).map(String::as_str))
        .collect();
    GeneratedValue::String(words.join(" "))
}

/// `text`: `min..=max` tokens sampled with replacement from `vocabulary`.
pub fn generate_text<R: Rng>(
    rng: &mut R,
    vocabulary: &[String],
    min: usize,
    max: usize,
) -> GeneratedValue {
    let count = rng.gen_range(min..=max);
    let words: Vec<&str> = (0..count)
        .filter_map(|_| vocabulary.choose(rng).map(String::as_str))
        .collect();
    GeneratedValue::String(words.join(" "))
}
