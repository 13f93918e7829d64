//! Format-string schema parsing.
//!
//! A schema is a comma-separated list of field descriptors:
//!
//! ```text
//! name:type[:arg[:arg...]]
//! ```
//!
//! Each descriptor is split once on `:`; the first token is the field name,
//! the second the type tag and the rest positional arguments for that type.
//! Array descriptors take a length token (`3` or `2-4`) followed by a complete
//! element descriptor without a name, which is parsed recursively:
//!
//! ```text
//! tags:arr:2-4:str:3:8       // 2 to 4 strings of 3 to 8 characters
//! grid:arr:3:arr:3:int:0:9   // 3x3 matrix of digits
//! ```
//!
//! Descriptors with an unrecognised type tag are kept out of the schema and
//! never produce a field.

use std::str::FromStr;

/// Default lower bound for `int`.
pub const DEFAULT_INT_MIN: i64 = 0;
/// Default `max - min` for `int` when no upper bound is given.
pub const DEFAULT_INT_SPAN: i64 = 100_000;
/// Default minimum length for `str`.
pub const DEFAULT_STR_MIN_LEN: usize = 3;
/// Default `max - min` length for `str`.
pub const DEFAULT_STR_SPAN: usize = 7;
/// Default minimum word count for `words` and `dict`.
pub const DEFAULT_WORDS_MIN: usize = 2;
/// Default `max - min` word count for `words` and `dict`.
pub const DEFAULT_WORDS_SPAN: usize = 8;
/// Default minimum token count for `text`.
pub const DEFAULT_TEXT_MIN: usize = 1;
/// Default `max - min` token count for `text`.
pub const DEFAULT_TEXT_SPAN: usize = 1;
/// Vocabulary for `text` when none is given.
pub const DEFAULT_TEXT_VOCABULARY: [&str; 3] = ["text1", "text2", "text3"];
/// Extension for `file_name` when none is given.
pub const DEFAULT_FILE_EXTENSION: &str = "py";

/// Error type for schema parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The format string contained no descriptors.
    #[error("Format string is empty")]
    EmptyFormat,

    /// A descriptor had no type token.
    #[error("Missing type in field descriptor '{descriptor}'")]
    MissingType { descriptor: String },

    /// A numeric argument could not be parsed.
    #[error("Invalid number '{value}' in field descriptor '{descriptor}'")]
    InvalidNumber { descriptor: String, value: String },

    /// A lower bound exceeded its upper bound.
    #[error("Invalid range {min}..={max} in field descriptor '{descriptor}'")]
    InvalidRange {
        descriptor: String,
        min: String,
        max: String,
    },

    /// An array descriptor had no length token.
    #[error("Missing array length in field descriptor '{descriptor}'")]
    MissingArrayLength { descriptor: String },

    /// An array descriptor had no element descriptor after its length.
    #[error("Missing array element type in field descriptor '{descriptor}'")]
    MissingArrayElement { descriptor: String },
}

/// Number of elements in a generated array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLen {
    /// Always exactly this many elements.
    Fixed(usize),
    /// Uniformly sampled from `min..=max`.
    Range { min: usize, max: usize },
}

/// What to generate for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// `int[:min[:max]]`
    Int { min: i64, max: i64 },
    /// `str[:min_len[:max_len]]` - letters and digits
    Str { min_len: usize, max_len: usize },
    /// `ipv4`
    Ipv4,
    /// `ts` - epoch milliseconds
    Timestamp,
    /// `tstxt` - ISO-8601 text
    TimestampText,
    /// `words[:min[:max]]` - random alphanumeric words
    Words { min: usize, max: usize },
    /// `dict[:min[:max]]` - words sampled from the loaded dictionary
    Dict { min: usize, max: usize },
    /// `text[:a-b-c[:min[:max]]]` - words sampled from a fixed vocabulary
    Text {
        vocabulary: Vec<String>,
        min: usize,
        max: usize,
    },
    /// `log_version` - `v{major}.{minor}.{patch}`
    LogVersion,
    /// `sha` - 40 hex characters
    Sha,
    /// `file_name[:ext]`
    FileName { extension: String },
    /// `uuid` - random v4 UUID
    Uuid,
    /// `systemd` - unit name such as `alpha-beta-gamma.service`
    Systemd,
    /// `arr:len:<element descriptor>`
    Array { len: ArrayLen, element: Box<FieldKind> },
}

impl FieldKind {
    /// Whether generating this kind draws from the dictionary pool.
    pub fn uses_dictionary(&self) -> bool {
        match self {
            Self::Dict { .. } => true,
            Self::Array { element, .. } => element.uses_dictionary(),
            _ => false,
        }
    }
}

/// One parsed `name:type[:args]` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

/// Ordered list of field descriptors compiled from a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    skipped: Vec<String>,
}

impl Schema {
    /// Parse a comma-separated format string.
    ///
    /// Fails on the first malformed descriptor so no generation starts with a
    /// half-valid schema.
    pub fn parse(format: &str) -> Result<Self, SchemaError> {
        if format.trim().is_empty() {
            return Err(SchemaError::EmptyFormat);
        }

        let mut fields = Vec::new();
        let mut skipped = Vec::new();

        for descriptor in format.split(',') {
            let descriptor = descriptor.trim();
            match parse_descriptor(descriptor)? {
                Some(field) if field.name.trim().is_empty() => {
                    tracing::warn!("Ignoring descriptor '{}': empty field name", descriptor);
                }
                Some(field) => fields.push(field),
                None => {
                    let name = descriptor.split(':').next().unwrap_or_default();
                    tracing::warn!(
                        "Ignoring field '{}': unknown type in descriptor '{}'",
                        name,
                        descriptor
                    );
                    skipped.push(name.to_string());
                }
            }
        }

        Ok(Self { fields, skipped })
    }

    /// Field descriptors in output order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Names of descriptors dropped because of an unknown type tag.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Whether any field needs the dictionary pool.
    pub fn uses_dictionary(&self) -> bool {
        self.fields.iter().any(|f| f.kind.uses_dictionary())
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a single `name:type[:args]` descriptor.
///
/// Returns `Ok(None)` when the type tag (or an array's element type tag) is
/// not recognised.
pub fn parse_descriptor(descriptor: &str) -> Result<Option<FieldDescriptor>, SchemaError> {
    let tokens: Vec<&str> = descriptor.split(':').collect();
    let name = tokens[0];
    let Some((tag, args)) = tokens[1..].split_first() else {
        return Err(SchemaError::MissingType {
            descriptor: descriptor.to_string(),
        });
    };

    Ok(parse_kind(tag, args, descriptor)?.map(|kind| FieldDescriptor {
        name: name.to_string(),
        kind,
    }))
}

/// Parse a type tag and its arguments, recursing into array element types.
fn parse_kind(tag: &str, args: &[&str], descriptor: &str) -> Result<Option<FieldKind>, SchemaError> {
    let kind = match tag {
        "bool" => FieldKind::Bool,
        "int" => {
            let (min, max) = bounds(args, DEFAULT_INT_MIN, DEFAULT_INT_SPAN, descriptor)?;
            FieldKind::Int { min, max }
        }
        "str" => {
            let (min_len, max_len) =
                bounds(args, DEFAULT_STR_MIN_LEN, DEFAULT_STR_SPAN, descriptor)?;
            FieldKind::Str { min_len, max_len }
        }
        "ipv4" => FieldKind::Ipv4,
        "ts" => FieldKind::Timestamp,
        "tstxt" => FieldKind::TimestampText,
        "words" => {
            let (min, max) = bounds(args, DEFAULT_WORDS_MIN, DEFAULT_WORDS_SPAN, descriptor)?;
            FieldKind::Words { min, max }
        }
        "dict" => {
            let (min, max) = bounds(args, DEFAULT_WORDS_MIN, DEFAULT_WORDS_SPAN, descriptor)?;
            FieldKind::Dict { min, max }
        }
        "text" => {
            let vocabulary = match args.first() {
                Some(list) => list.split('-').map(str::to_string).collect(),
                None => DEFAULT_TEXT_VOCABULARY
                    .iter()
                    .map(|w| w.to_string())
                    .collect(),
            };
            let rest = args.get(1..).unwrap_or_default();
            let (min, max) = bounds(rest, DEFAULT_TEXT_MIN, DEFAULT_TEXT_SPAN, descriptor)?;
            FieldKind::Text {
                vocabulary,
                min,
                max,
            }
        }
        "log_version" => FieldKind::LogVersion,
        "sha" => FieldKind::Sha,
        "file_name" => FieldKind::FileName {
            extension: args
                .first()
                .copied()
                .unwrap_or(DEFAULT_FILE_EXTENSION)
                .to_string(),
        },
        "uuid" => FieldKind::Uuid,
        "systemd" => FieldKind::Systemd,
        "arr" => {
            let Some((len_token, element)) = args.split_first() else {
                return Err(SchemaError::MissingArrayLength {
                    descriptor: descriptor.to_string(),
                });
            };
            let len = parse_array_len(len_token, descriptor)?;
            let Some((element_tag, element_args)) = element.split_first() else {
                return Err(SchemaError::MissingArrayElement {
                    descriptor: descriptor.to_string(),
                });
            };
            match parse_kind(element_tag, element_args, descriptor)? {
                Some(element) => FieldKind::Array {
                    len,
                    element: Box::new(element),
                },
                None => return Ok(None),
            }
        }
        _ => return Ok(None),
    };

    Ok(Some(kind))
}

/// Parse an array length token: a literal count or an inclusive `min-max`.
fn parse_array_len(token: &str, descriptor: &str) -> Result<ArrayLen, SchemaError> {
    match token.split_once('-') {
        Some((min, max)) => {
            let min = parse_number(min, descriptor)?;
            let max = parse_number(max, descriptor)?;
            check_range(min, max, descriptor)?;
            Ok(ArrayLen::Range { min, max })
        }
        None => Ok(ArrayLen::Fixed(parse_number(token, descriptor)?)),
    }
}

/// Integer bound types whose default upper bound saturates at the type limit.
trait Bound: FromStr + PartialOrd + Copy + std::fmt::Display {
    fn saturating_add(self, rhs: Self) -> Self;
}

macro_rules! impl_bound {
    ($($ty:ty),*) => {
        $(
            impl Bound for $ty {
                fn saturating_add(self, rhs: Self) -> Self {
                    <$ty>::saturating_add(self, rhs)
                }
            }
        )*
    };
}

impl_bound!(i64, usize);

/// Read optional `min` and `max` arguments.
///
/// A missing `min` falls back to `default_min`; a missing `max` becomes
/// `min + span`, capped at the type's maximum.
fn bounds<T: Bound>(args: &[&str], default_min: T, span: T, descriptor: &str) -> Result<(T, T), SchemaError> {
    let min = match args.first() {
        Some(token) => parse_number(token, descriptor)?,
        None => default_min,
    };
    let max = match args.get(1) {
        Some(token) => parse_number(token, descriptor)?,
        None => min.saturating_add(span),
    };
    check_range(min, max, descriptor)?;
    Ok((min, max))
}

fn parse_number<T: FromStr>(token: &str, descriptor: &str) -> Result<T, SchemaError> {
    token
        .trim()
        .parse()
        .map_err(|_| SchemaError::InvalidNumber {
            descriptor: descriptor.to_string(),
            value: token.to_string(),
        })
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    min: T,
    max: T,
    descriptor: &str,
) -> Result<(), SchemaError> {
    if min > max {
        return Err(SchemaError::InvalidRange {
            descriptor: descriptor.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(descriptor: &str) -> FieldKind {
        parse_descriptor(descriptor).unwrap().unwrap().kind
    }

    #[test]
    fn test_parse_default_format() {
        let schema = Schema::parse("name:str,age:int,last_updated:ts").unwrap();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "last_updated"]);
        assert_eq!(
            schema.fields()[0].kind,
            FieldKind::Str {
                min_len: 3,
                max_len: 10
            }
        );
        assert_eq!(schema.fields()[1].kind, FieldKind::Int { min: 0, max: 100_000 });
        assert_eq!(schema.fields()[2].kind, FieldKind::Timestamp);
    }

    #[test]
    fn test_default_span_follows_explicit_min() {
        assert_eq!(kind_of("n:int:50"), FieldKind::Int { min: 50, max: 100_050 });
        assert_eq!(kind_of("s:str:5"), FieldKind::Str { min_len: 5, max_len: 12 });
        assert_eq!(kind_of("w:words:4"), FieldKind::Words { min: 4, max: 12 });
        assert_eq!(kind_of("d:dict"), FieldKind::Dict { min: 2, max: 10 });
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            kind_of("t:text"),
            FieldKind::Text {
                vocabulary: vec!["text1".into(), "text2".into(), "text3".into()],
                min: 1,
                max: 2
            }
        );
        assert_eq!(
            kind_of("level:text:info-warn-error:1:1"),
            FieldKind::Text {
                vocabulary: vec!["info".into(), "warn".into(), "error".into()],
                min: 1,
                max: 1
            }
        );
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(
            kind_of("f:file_name"),
            FieldKind::FileName {
                extension: "py".into()
            }
        );
        assert_eq!(
            kind_of("f:file_name:rs"),
            FieldKind::FileName {
                extension: "rs".into()
            }
        );
    }

    #[test]
    fn test_parse_array_fixed() {
        assert_eq!(
            kind_of("field:arr:3:str:1:1"),
            FieldKind::Array {
                len: ArrayLen::Fixed(3),
                element: Box::new(FieldKind::Str {
                    min_len: 1,
                    max_len: 1
                }),
            }
        );
    }

    #[test]
    fn test_parse_array_range() {
        assert_eq!(
            kind_of("field:arr:2-4:int:0:9"),
            FieldKind::Array {
                len: ArrayLen::Range { min: 2, max: 4 },
                element: Box::new(FieldKind::Int { min: 0, max: 9 }),
            }
        );
    }

    #[test]
    fn test_parse_nested_array() {
        assert_eq!(
            kind_of("grid:arr:2:arr:1-3:text:a-b"),
            FieldKind::Array {
                len: ArrayLen::Fixed(2),
                element: Box::new(FieldKind::Array {
                    len: ArrayLen::Range { min: 1, max: 3 },
                    element: Box::new(FieldKind::Text {
                        vocabulary: vec!["a".into(), "b".into()],
                        min: 1,
                        max: 2
                    }),
                }),
            }
        );
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let schema = Schema::parse("a:int:1:2,b:nope,c:bool").unwrap();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(schema.skipped(), &["b".to_string()]);
    }

    #[test]
    fn test_unknown_array_element_is_skipped() {
        assert_eq!(parse_descriptor("a:arr:3:nope:1").unwrap(), None);
    }

    #[test]
    fn test_missing_type() {
        assert!(matches!(
            Schema::parse("name:str,age"),
            Err(SchemaError::MissingType { .. })
        ));
    }

    #[test]
    fn test_invalid_number() {
        assert!(matches!(
            Schema::parse("age:int:ten:20"),
            Err(SchemaError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Schema::parse("tags:arr:x-3:bool"),
            Err(SchemaError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_min_greater_than_max() {
        let err = Schema::parse("age:int:50:10").unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidRange {
                descriptor: "age:int:50:10".into(),
                min: "50".into(),
                max: "10".into()
            }
        );
        assert!(matches!(
            Schema::parse("tags:arr:5-2:bool"),
            Err(SchemaError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_array_missing_parts() {
        assert!(matches!(
            Schema::parse("tags:arr"),
            Err(SchemaError::MissingArrayLength { .. })
        ));
        assert!(matches!(
            Schema::parse("tags:arr:3"),
            Err(SchemaError::MissingArrayElement { .. })
        ));
    }

    #[test]
    fn test_default_max_saturates_at_type_limit() {
        assert_eq!(
            kind_of("n:int:9223372036854775807"),
            FieldKind::Int {
                min: i64::MAX,
                max: i64::MAX
            }
        );
        assert_eq!(
            kind_of("s:str:18446744073709551615"),
            FieldKind::Str {
                min_len: usize::MAX,
                max_len: usize::MAX
            }
        );
        assert!(Schema::parse("w:words:18446744073709551615").is_ok());
    }

    #[test]
    fn test_empty_field_name_is_skipped() {
        let schema = Schema::parse(":int,age:int, :bool").unwrap();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["age"]);
    }

    #[test]
    fn test_empty_format() {
        assert_eq!(Schema::parse("  "), Err(SchemaError::EmptyFormat));
    }

    #[test]
    fn test_uses_dictionary() {
        assert!(!Schema::parse("a:words").unwrap().uses_dictionary());
        assert!(Schema::parse("a:dict").unwrap().uses_dictionary());
        assert!(Schema::parse("a:arr:2:dict:1:1").unwrap().uses_dictionary());
    }
}
