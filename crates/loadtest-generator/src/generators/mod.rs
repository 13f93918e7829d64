//! Individual value generators for each field type.
//!
//! [`generate_value`] dispatches on the parsed [`FieldKind`]; every generator
//! draws from the caller's RNG so a seeded RNG reproduces the same values.

pub mod array;
pub mod naming;
pub mod numeric;
pub mod text;
pub mod timestamp;
pub mod uuid;

use crate::document::GeneratedValue;
use crate::schema::FieldKind;
use rand::Rng;
use timestamp::TimeWindow;

/// Shared inputs that are not part of a field descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationContext<'a> {
    /// Window for `ts` and `tstxt` values.
    pub time_window: TimeWindow,
    /// Word pool for `dict` values.
    pub dictionary: &'a [String],
}

/// Generate one value for the given field kind.
pub fn generate_value<R: Rng>(
    kind: &FieldKind,
    rng: &mut R,
    ctx: &GenerationContext<'_>,
) -> GeneratedValue {
    match kind {
        FieldKind::Bool => numeric::generate_bool(rng),

        FieldKind::Int { min, max } => numeric::generate_int_range(rng, *min, *max),

        FieldKind::Str { min_len, max_len } => {
            text::generate_alphanumeric(rng, *min_len, *max_len)
        }

        FieldKind::Ipv4 => numeric::generate_ipv4(rng),

        FieldKind::Timestamp => timestamp::generate_timestamp_millis(rng, &ctx.time_window),

        FieldKind::TimestampText => timestamp::generate_timestamp_text(rng, &ctx.time_window),

        FieldKind::Words { min, max } => text::generate_words(rng, *min, *max),

        FieldKind::Dict { min, max } => text::generate_dict_words(rng, ctx.dictionary, *min, *max),

        FieldKind::Text {
            vocabulary,
            min,
            max,
        } => text::generate_text(rng, vocabulary, *min, *max),

        FieldKind::LogVersion => naming::generate_log_version(rng),

        FieldKind::Sha => uuid::generate_sha(rng),

        FieldKind::FileName { extension } => naming::generate_file_name(rng, extension),

        FieldKind::Uuid => uuid::generate_uuid_v4(rng),

        FieldKind::Systemd => naming::generate_systemd_unit(rng),

        FieldKind::Array { len, element } => array::generate_array(rng, len, element, ctx),
    }
}
