//! Array value generator.

use super::{generate_value, GenerationContext};
use crate::document::GeneratedValue;
use crate::schema::{ArrayLen, FieldKind};
use rand::Rng;

/// Resolve the element count for one array value.
pub fn sample_len<R: Rng>(rng: &mut R, len: &ArrayLen) -> usize {
    match *len {
        ArrayLen::Fixed(n) => n,
        ArrayLen::Range { min, max } => rng.gen_range(min..=max),
    }
}

/// `arr`: run the element generator once per slot.
pub fn generate_array<R: Rng>(
    rng: &mut R,
    len: &ArrayLen,
    element: &FieldKind,
    ctx: &GenerationContext<'_>,
) -> GeneratedValue {
    let count = sample_len(rng, len);
    let items = (0..count)
        .map(|_| generate_value(element, rng, ctx))
        .collect();
    GeneratedValue::Array(items)
}
