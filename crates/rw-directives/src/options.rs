//! Directive arguments and option conversion.

use std::collections::BTreeMap;

use crate::error::DirectiveError;
use crate::header::HeaderOptions;

/// A converted option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Free or validated string.
    Str(String),
    /// Ordered list of strings.
    List(Vec<String>),
}

/// Converts a raw header string into an [`OptionValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`, any case.
    Boolean,
    /// Space or comma separated class names.
    Classes,
    /// Any string.
    String,
    /// Attribute value without whitespace, quotes or angle brackets.
    HtmlAttribute,
    /// One of a fixed set of values, any case, normalized to lowercase.
    OneOf(&'static [&'static str]),
}

impl Converter {
    /// Convert a raw value, returning `None` if it is rejected.
    #[must_use]
    pub fn convert(self, raw: &str) -> Option<OptionValue> {
        let raw = raw.trim();
        match self {
            Self::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(OptionValue::Bool(true)),
                "false" | "no" | "off" | "0" => Some(OptionValue::Bool(false)),
                _ => None,
            },
            Self::Classes => Some(OptionValue::List(
                raw.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
            Self::String => Some(OptionValue::Str(raw.to_owned())),
            Self::HtmlAttribute => {
                let invalid = raw
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'));
                (!invalid).then(|| OptionValue::Str(raw.to_owned()))
            }
            Self::OneOf(values) => {
                let lower = raw.to_lowercase();
                values
                    .iter()
                    .any(|v| *v == lower)
                    .then_some(OptionValue::Str(lower))
            }
        }
    }
}

/// Declaration of one directive option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Header key.
    pub name: &'static str,
    /// Raw default, passed through the converter like a header value.
    pub default: &'static str,
    /// Value converter.
    pub converter: Converter,
}

impl OptionSpec {
    /// Create an option declaration.
    #[must_use]
    pub const fn new(name: &'static str, default: &'static str, converter: Converter) -> Self {
        Self {
            name,
            default,
            converter,
        }
    }
}

/// Converted options of one directive occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<&'static str, OptionValue>,
}

impl Options {
    /// Convert header options against the declared specs.
    ///
    /// Every declared option gets a value; header keys that are not
    /// declared are rejected.
    pub fn parse(specs: &[OptionSpec], header: &HeaderOptions) -> Result<Self, DirectiveError> {
        if let Some(unknown) = header.keys().find(|key| !specs.iter().any(|s| s.name == key.as_str())) {
            return Err(DirectiveError::UnknownOption(unknown.clone()));
        }

        let mut values = BTreeMap::new();
        for spec in specs {
            let raw = header.get(spec.name).map_or(spec.default, String::as_str);
            let value = spec.converter.convert(raw).ok_or_else(|| DirectiveError::InvalidOption {
                name: spec.name.to_owned(),
                value: raw.to_owned(),
            })?;
            values.insert(spec.name, value);
        }
        Ok(Self { values })
    }

    /// Raw access to a converted value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Boolean option, `false` if missing or not a flag.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Bool(true)))
    }

    /// String option, empty if missing or not a string.
    #[must_use]
    pub fn string(&self, name: &str) -> &str {
        match self.get(name) {
            Some(OptionValue::Str(s)) => s,
            _ => "",
        }
    }

    /// List option, empty if missing or not a list.
    #[must_use]
    pub fn list(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(OptionValue::List(items)) => items,
            _ => &[],
        }
    }
}

/// Positional argument declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arguments {
    /// Required argument count.
    pub required: usize,
    /// Optional argument count.
    pub optional: usize,
    /// Separator between arguments. Without one the whole argument string
    /// is a single argument.
    pub delimiter: Option<char>,
}

impl Arguments {
    /// No arguments.
    pub const NONE: Self = Self::new(0, 0);

    /// Declare `required` plus `optional` arguments without a delimiter.
    #[must_use]
    pub const fn new(required: usize, optional: usize) -> Self {
        Self {
            required,
            optional,
            delimiter: None,
        }
    }

    /// Split arguments on `delimiter`.
    #[must_use]
    pub const fn delimited(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Split and count an argument string.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_directives::options::Arguments;
    ///
    /// let args = Arguments::new(1, 1).delimited('|');
    /// assert_eq!(args.parse("img.png | A caption").unwrap(), vec!["img.png", "A caption"]);
    /// assert!(args.parse("").is_err());
    /// ```
    pub fn parse(&self, raw: &str) -> Result<Vec<String>, DirectiveError> {
        let raw = raw.trim();
        let values: Vec<String> = if raw.is_empty() {
            Vec::new()
        } else if let Some(delimiter) = self.delimiter {
            raw.split(delimiter).map(|part| part.trim().to_owned()).collect()
        } else {
            vec![raw.to_owned()]
        };

        let max = self.required + self.optional;
        if values.len() < self.required || values.len() > max {
            return Err(DirectiveError::Arity {
                min: self.required,
                max,
                found: values.len(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPECS: &[OptionSpec] = &[
        OptionSpec::new("open", "false", Converter::Boolean),
        OptionSpec::new("class", "", Converter::Classes),
        OptionSpec::new("id", "", Converter::HtmlAttribute),
        OptionSpec::new("markdown", "auto", Converter::OneOf(&["auto", "block", "raw"])),
    ];

    fn header(pairs: &[(&str, &str)]) -> HeaderOptions {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn test_boolean() {
        for raw in ["true", "YES", "On", "1"] {
            assert_eq!(Converter::Boolean.convert(raw), Some(OptionValue::Bool(true)));
        }
        for raw in ["false", "no", "OFF", "0"] {
            assert_eq!(Converter::Boolean.convert(raw), Some(OptionValue::Bool(false)));
        }
        assert_eq!(Converter::Boolean.convert("maybe"), None);
    }

    #[test]
    fn test_classes() {
        assert_eq!(
            Converter::Classes.convert("foo bar"),
            Some(OptionValue::List(vec!["foo".to_owned(), "bar".to_owned()]))
        );
        assert_eq!(
            Converter::Classes.convert(" a, b ,c "),
            Some(OptionValue::List(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]))
        );
        assert_eq!(Converter::Classes.convert(""), Some(OptionValue::List(vec![])));
    }

    #[test]
    fn test_html_attribute() {
        assert_eq!(
            Converter::HtmlAttribute.convert("my-id"),
            Some(OptionValue::Str("my-id".to_owned()))
        );
        assert_eq!(Converter::HtmlAttribute.convert(""), Some(OptionValue::Str(String::new())));
        assert_eq!(Converter::HtmlAttribute.convert("a b"), None);
        assert_eq!(Converter::HtmlAttribute.convert("a\"b"), None);
    }

    #[test]
    fn test_one_of() {
        let converter = Converter::OneOf(&["auto", "raw"]);
        assert_eq!(converter.convert("RAW"), Some(OptionValue::Str("raw".to_owned())));
        assert_eq!(converter.convert("block"), None);
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::parse(SPECS, &HeaderOptions::new()).unwrap();

        assert!(!options.flag("open"));
        assert!(options.list("class").is_empty());
        assert_eq!(options.string("id"), "");
        assert_eq!(options.string("markdown"), "auto");
    }

    #[test]
    fn test_options_from_header() {
        let options = Options::parse(SPECS, &header(&[("open", "yes"), ("class", "foo bar")])).unwrap();

        assert!(options.flag("open"));
        assert_eq!(options.list("class"), ["foo".to_owned(), "bar".to_owned()]);
    }

    #[test]
    fn test_unknown_option() {
        let err = Options::parse(SPECS, &header(&[("colour", "red")])).unwrap_err();
        assert_eq!(err, DirectiveError::UnknownOption("colour".to_owned()));
    }

    #[test]
    fn test_invalid_option() {
        let err = Options::parse(SPECS, &header(&[("markdown", "html")])).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::InvalidOption {
                name: "markdown".to_owned(),
                value: "html".to_owned(),
            }
        );
    }

    #[test]
    fn test_arguments_whole_string() {
        let args = Arguments::new(1, 0);
        assert_eq!(args.parse("  A title, with comma ").unwrap(), vec!["A title, with comma"]);
        assert!(args.parse("").is_err());
    }

    #[test]
    fn test_arguments_optional() {
        let args = Arguments::new(0, 1);
        assert!(args.parse("").unwrap().is_empty());
        assert_eq!(args.parse("Title").unwrap(), vec!["Title"]);
    }

    #[test]
    fn test_arguments_none() {
        assert!(Arguments::NONE.parse("").unwrap().is_empty());
        assert_eq!(
            Arguments::NONE.parse("unexpected").unwrap_err(),
            DirectiveError::Arity {
                min: 0,
                max: 0,
                found: 1
            }
        );
    }
}
