use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// The value type a recognized tag is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    String,
    Integer,
    Number,
    Boolean,
    /// Parsed as a generic literal.
    Unknown,
}

macro_rules! doc_tags {
    ($( $(#[$meta:meta])* $field:ident : $ty:ty = $tag:literal => $kind:ident ),* $(,)?) => {
        /// Recognized tags with typed values, plus the raw text of every other tag.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct DocTags {
            $(
                $(#[$meta])*
                #[serde(rename = $tag, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*

            /// Unrecognized tags, in source order.
            #[serde(flatten)]
            pub other: IndexMap<String, String>,
        }

        impl DocTags {
            /// The declared type of a recognized tag name.
            pub fn tag_type(name: &str) -> Option<TagType> {
                match name {
                    $( $tag => Some(TagType::$kind), )*
                    _ => None,
                }
            }

            /// Store a tag, coercing `text` to the tag's declared type.
            pub fn set(&mut self, name: &str, text: Option<&str>) {
                match name {
                    $( $tag => self.$field = FromTagText::from_tag_text(name, text), )*
                    _ => {
                        self.other
                            .insert(name.to_string(), text.unwrap_or_default().to_string());
                    }
                }
            }

            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )* && self.other.is_empty()
            }
        }
    };
}

doc_tags! {
    /// Names the file's principal declaration.
    main: String = "main" => String,
    title: String = "title" => String,
    /// Literal default value, opaque to the core.
    default: Value = "default" => Unknown,
    deprecated: String = "deprecated" => String,
    /// Space separated environments excluding the node; empty means everywhere.
    ignore: String = "ignore" => String,

    min_length: i64 = "minLength" => Integer,
    max_length: i64 = "maxLength" => Integer,
    pattern: String = "pattern" => String,
    format: String = "format" => String,
    markdown: bool = "markdown" => Boolean,

    integer: bool = "integer" => Boolean,
    minimum: f64 = "minimum" => Number,
    maximum: f64 = "maximum" => Number,
    multiple_of: f64 = "multipleOf" => Number,
    exclusive_minimum: f64 = "exclusiveMinimum" => Number,
    exclusive_maximum: f64 = "exclusiveMaximum" => Number,

    min_properties: i64 = "minProperties" => Integer,
    max_properties: i64 = "maxProperties" => Integer,
    pattern_properties: String = "patternProperties" => String,

    min_items: i64 = "minItems" => Integer,
    max_items: i64 = "maxItems" => Integer,
    unique_items: bool = "uniqueItems" => Boolean,
}

/// Coercion of raw tag text into a tag's declared value type.
trait FromTagText: Sized {
    fn from_tag_text(name: &str, text: Option<&str>) -> Option<Self>;
}

impl FromTagText for String {
    fn from_tag_text(_name: &str, text: Option<&str>) -> Option<Self> {
        Some(text.unwrap_or_default().to_string())
    }
}

impl FromTagText for bool {
    fn from_tag_text(_name: &str, text: Option<&str>) -> Option<Self> {
        Some(matches!(text, None | Some("") | Some("true")))
    }
}

impl FromTagText for i64 {
    fn from_tag_text(name: &str, text: Option<&str>) -> Option<Self> {
        let Some(text) = text else { return Some(0) };
        let parsed = integer_prefix(text).and_then(|digits| digits.parse().ok());
        if parsed.is_none() {
            warn!(tag = name, text, "ignoring non-integer tag value");
        }
        parsed
    }
}

impl FromTagText for f64 {
    fn from_tag_text(name: &str, text: Option<&str>) -> Option<Self> {
        let Some(text) = text else { return Some(0.0) };
        let parsed = number_prefix(text).and_then(|digits| digits.parse().ok());
        if parsed.is_none() {
            warn!(tag = name, text, "ignoring non-numeric tag value");
        }
        parsed
    }
}

impl FromTagText for Value {
    fn from_tag_text(_name: &str, text: Option<&str>) -> Option<Self> {
        let text = text.unwrap_or_default();
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }
}

/// The longest leading `[+-]digits` slice of `text`.
fn integer_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    (digits > 0).then(|| &text[..sign + digits])
}

/// The longest leading decimal literal of `text`, exponent included.
fn number_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    Some(&text[..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(Some("yes"), false)]
    fn test_boolean_tags(#[case] text: Option<&str>, #[case] expected: bool) {
        let mut tags = DocTags::default();
        tags.set("uniqueItems", text);
        assert_eq!(tags.unique_items, Some(expected));
    }

    #[rstest]
    #[case(None, Some(0.0))]
    #[case(Some("1.5"), Some(1.5))]
    #[case(Some("1.5e3px"), Some(1500.0))]
    #[case(Some("-.5"), Some(-0.5))]
    #[case(Some("2e"), Some(2.0))]
    #[case(Some("abc"), None)]
    fn test_number_tags(#[case] text: Option<&str>, #[case] expected: Option<f64>) {
        let mut tags = DocTags::default();
        tags.set("minimum", text);
        assert_eq!(tags.minimum, expected);
    }

    #[rstest]
    #[case(None, Some(0))]
    #[case(Some("12"), Some(12))]
    #[case(Some("12.7"), Some(12))]
    #[case(Some("-3px"), Some(-3))]
    #[case(Some("px"), None)]
    fn test_integer_tags(#[case] text: Option<&str>, #[case] expected: Option<i64>) {
        let mut tags = DocTags::default();
        tags.set("maxLength", text);
        assert_eq!(tags.max_length, expected);
    }

    #[test]
    fn test_string_tags_default_to_empty() {
        let mut tags = DocTags::default();
        tags.set("title", None);
        assert_eq!(tags.title.as_deref(), Some(""));
    }

    #[test]
    fn test_default_tag_is_a_literal() {
        let mut tags = DocTags::default();
        tags.set("default", Some("42"));
        assert_eq!(tags.default, Some(Value::from(42)));
        tags.set("default", Some("\"text\""));
        assert_eq!(tags.default, Some(Value::from("text")));
        tags.set("default", Some("bare words"));
        assert_eq!(tags.default, Some(Value::from("bare words")));
    }

    #[test]
    fn test_tag_types() {
        assert_eq!(DocTags::tag_type("multipleOf"), Some(TagType::Number));
        assert_eq!(DocTags::tag_type("default"), Some(TagType::Unknown));
        assert_eq!(DocTags::tag_type("see"), None);
    }

    #[test]
    fn test_is_empty() {
        let mut tags = DocTags::default();
        assert!(tags.is_empty());
        tags.set("see", Some("x"));
        assert!(!tags.is_empty());
    }
}
