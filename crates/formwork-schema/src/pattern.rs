//! Pattern constraints: literal regular expressions or canned categories.

use ahash::AHashMap;
use regex::Regex;

use crate::constraint::Constraint;

/// Canned text categories usable as a pattern constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Integer,
    Numeric,
    FullWidthNumeric,
    Alphabet,
    AlphaNumeric,
    Katakana,
    HalfWidthKatakana,
    Hiragana,
    Email,
    Tel,
    Url,
    PostalCode,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Integer,
        Category::Numeric,
        Category::FullWidthNumeric,
        Category::Alphabet,
        Category::AlphaNumeric,
        Category::Katakana,
        Category::HalfWidthKatakana,
        Category::Hiragana,
        Category::Email,
        Category::Tel,
        Category::Url,
        Category::PostalCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Integer => "integer",
            Category::Numeric => "numeric",
            Category::FullWidthNumeric => "fullWidthNumeric",
            Category::Alphabet => "alphabet",
            Category::AlphaNumeric => "alphaNumeric",
            Category::Katakana => "katakana",
            Category::HalfWidthKatakana => "halfWidthKatakana",
            Category::Hiragana => "hiragana",
            Category::Email => "email",
            Category::Tel => "tel",
            Category::Url => "url",
            Category::PostalCode => "postalCode",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Category::Integer => r"^[+-]?[0-9]+$",
            Category::Numeric => r"^[0-9]+$",
            Category::FullWidthNumeric => r"^[\x{FF10}-\x{FF19}]+$",
            Category::Alphabet => r"^[A-Za-z]+$",
            Category::AlphaNumeric => r"^[A-Za-z0-9]+$",
            Category::Katakana => r"^[\x{30A1}-\x{30FA}\x{30FB}\x{30FC}\x{3000} ]+$",
            Category::HalfWidthKatakana => r"^[\x{FF66}-\x{FF9F} ]+$",
            Category::Hiragana => r"^[\x{3041}-\x{3096}\x{30FC}\x{3000} ]+$",
            Category::Email => {
                r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$"
            }
            Category::Tel => r"^0[0-9]{1,4}-?[0-9]{1,4}-?[0-9]{3,4}$",
            Category::Url => r"^https?://[^\s/$.?#][^\s]*$",
            Category::PostalCode => r"^[0-9]{3}-?[0-9]{4}$",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Regex(Regex),
    Category(Category),
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(source)?))
    }

    /// Translation key of the default message for this pattern.
    pub fn message_key(&self) -> String {
        match self {
            Pattern::Regex(_) => "validation.pattern".to_string(),
            Pattern::Category(category) => format!("validation.pattern.{}", category.as_str()),
        }
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

impl From<Category> for Pattern {
    fn from(category: Category) -> Self {
        Pattern::Category(category)
    }
}

impl From<Regex> for Constraint<Pattern> {
    fn from(regex: Regex) -> Self {
        Constraint::Static(Pattern::Regex(regex))
    }
}

impl From<Category> for Constraint<Pattern> {
    fn from(category: Category) -> Self {
        Constraint::Static(Pattern::Category(category))
    }
}

/// Compiled category regexes, built once per engine.
#[derive(Debug, Clone)]
pub struct PatternCache {
    compiled: AHashMap<Category, Regex>,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCache {
    pub fn new() -> Self {
        let compiled = Category::ALL
            .iter()
            .map(|category| {
                let regex = Regex::new(category.source()).expect("invalid pattern category regex");
                (*category, regex)
            })
            .collect();
        Self { compiled }
    }

    pub fn is_match(&self, pattern: &Pattern, text: &str) -> bool {
        match pattern {
            Pattern::Regex(regex) => regex.is_match(text),
            Pattern::Category(category) => self
                .compiled
                .get(category)
                .is_some_and(|regex| regex.is_match(text)),
        }
    }
}
