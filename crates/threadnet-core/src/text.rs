//! Text normalization for forum message bodies.
//!
//! Every function here is total: it never fails and always returns an owned
//! string. The column helpers turn every non-text cell (null, number,
//! boolean) into the empty string.
//!
//! [`clean_text_advanced`] applies its passes in a fixed order. URLs are
//! removed before HTML tags, and whitespace is collapsed last, so that tag
//! stripping cannot glue a URL onto its neighbouring token.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TableError};
use crate::table::{Table, Value};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*\\(),]|%[0-9a-fA-F]{2})+").expect("url pattern")
});
static WWW_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"www\.\S+").expect("www pattern"));
static INDEX_PHP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"/index\.php[^\s"]+"#).expect("index.php pattern"));
static HTML_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("tag pattern"));
static EMOTICON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"/emoticons/[^\s"]+"#).expect("emoticon pattern"));
static QUOTED_ATTR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*""#).expect("quoted attribute pattern"));
static NON_ASCII_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x00-\x7F]+").expect("non-ascii pattern"));
static SPECIAL_KEEP_PUNCT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?'-]").expect("special pattern"));
static SPECIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("special pattern"));

/// Double-encoded non-breaking space left behind by the forum export.
const MOJIBAKE_NBSP: &str = "\u{c3}\u{201a}\u{a0}";

// ---------------------------------------------------------------------------
// String transforms
// ---------------------------------------------------------------------------

/// Full cleaning pass for scraped forum posts.
///
/// Removes URLs, `/index.php` link fragments, HTML tags, escaped quotes,
/// non-breaking space artifacts, emoticon image paths, quoted attribute
/// values and non-ASCII runs, then collapses whitespace.
#[must_use]
pub fn clean_text_advanced(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = INDEX_PHP_PATTERN.replace_all(&text, "");
    let text = HTML_TAG_PATTERN.replace_all(&text, "");

    let text = text
        .replace('\n', " ")
        .replace("\\'", "'")
        .replace(MOJIBAKE_NBSP, " ")
        .replace("&nbsp;", " ");

    let text = EMOTICON_PATTERN.replace_all(&text, "");
    let text = QUOTED_ATTR_PATTERN.replace_all(&text, "");
    let text = NON_ASCII_PATTERN.replace_all(&text, " ");

    normalize_whitespace(&text)
}

/// Strip `<...>` tags.
#[must_use]
pub fn remove_html_tags(text: &str) -> String {
    HTML_TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Strip `http(s)://` and `www.` URLs.
#[must_use]
pub fn remove_urls(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    WWW_PATTERN.replace_all(&text, "").into_owned()
}

/// Collapse every whitespace run to a single space and trim both ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove everything except ASCII alphanumerics and whitespace.
///
/// With `keep_basic_punctuation`, `. , ! ? ' -` survive as well.
#[must_use]
pub fn remove_special_characters(text: &str, keep_basic_punctuation: bool) -> String {
    let pattern = if keep_basic_punctuation {
        &*SPECIAL_KEEP_PUNCT_PATTERN
    } else {
        &*SPECIAL_PATTERN
    };
    pattern.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Column cleaning
// ---------------------------------------------------------------------------

/// Named cleaning strategies for table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningMethod {
    /// [`clean_text_advanced`].
    #[default]
    Advanced,
    /// Special characters (keeping basic punctuation), then whitespace.
    Basic,
    /// [`remove_html_tags`] only.
    HtmlOnly,
}

impl CleaningMethod {
    /// Apply this method to one string.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Advanced => clean_text_advanced(text),
            Self::Basic => normalize_whitespace(&remove_special_characters(text, true)),
            Self::HtmlOnly => remove_html_tags(text),
        }
    }

    /// Apply this method to a cell; every non-text cell becomes `""`.
    #[must_use]
    pub fn apply_value(self, value: &Value) -> Value {
        match value {
            Value::Text(s) => Value::Text(self.apply(s)),
            _ => Value::Text(String::new()),
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advanced => "advanced",
            Self::Basic => "basic",
            Self::HtmlOnly => "html_only",
        }
    }
}

impl fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningMethod {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "advanced" => Ok(Self::Advanced),
            "basic" => Ok(Self::Basic),
            "html_only" => Ok(Self::HtmlOnly),
            other => Err(TableError::unknown("cleaning method", other)),
        }
    }
}

/// Clean one column in place.
///
/// # Errors
///
/// Returns [`TableError::ColumnNotFound`] if `column` is absent.
pub fn clean_column(table: &mut Table, column: &str, method: CleaningMethod) -> Result<()> {
    let col = table
        .column_mut(column)
        .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;

    info!(column, %method, "cleaning column");

    for cell in &mut col.values {
        *cell = method.apply_value(cell);
    }
    Ok(())
}

/// Clean several columns in place, stopping at the first missing one.
///
/// # Errors
///
/// Returns [`TableError::ColumnNotFound`] for the first absent column.
pub fn clean_columns<S: AsRef<str>>(
    table: &mut Table,
    columns: &[S],
    method: CleaningMethod,
) -> Result<()> {
    for column in columns {
        clean_column(table, column.as_ref(), method)?;
    }
    Ok(())
}

/// Concatenate the text cells of a column with single spaces.
///
/// Used as word-cloud input; non-text and empty cells are skipped.
///
/// # Errors
///
/// Returns [`TableError::ColumnNotFound`] if `column` is absent.
pub fn concat_column_text(table: &Table, column: &str) -> Result<String> {
    let col = table.require_column(column)?;
    Ok(col
        .values
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn advanced_strips_tags_and_urls() {
        assert_eq!(
            clean_text_advanced("Hello <b>world</b> http://x.com/page"),
            "Hello world"
        );
    }

    #[test]
    fn advanced_handles_forum_artifacts() {
        let raw = "Look<br />\nhere&nbsp;now /index.php?/topic/12 <img src=\"/emoticons/smile.png\"> it\\'s fine";
        assert_eq!(clean_text_advanced(raw), "Look here now it's fine");
    }

    #[test]
    fn advanced_replaces_non_ascii_runs() {
        assert_eq!(clean_text_advanced("caf\u{e9}\u{e9} ok"), "caf ok");
        assert_eq!(clean_text_advanced("a\u{2014}b"), "a b");
    }

    #[test]
    fn remove_urls_handles_www() {
        assert_eq!(
            remove_urls("see https://a.org/x?y=1 and www.b.com/z end"),
            "see  and  end"
        );
    }

    #[test]
    fn html_only_keeps_whitespace() {
        assert_eq!(remove_html_tags("<p>a  b</p>"), "a  b");
    }

    #[test]
    fn special_characters_with_and_without_punctuation() {
        assert_eq!(remove_special_characters("Hi, you! #tag @me", true), "Hi, you! tag me");
        assert_eq!(remove_special_characters("Hi, you! #tag", false), "Hi you tag");
    }

    #[test]
    fn whitespace_is_idempotent() {
        let once = normalize_whitespace("  a \t\n b   c ");
        assert_eq!(once, "a b c");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn method_parsing() {
        assert_eq!("basic".parse::<CleaningMethod>().ok(), Some(CleaningMethod::Basic));
        assert_eq!(
            "html_only".parse::<CleaningMethod>().ok(),
            Some(CleaningMethod::HtmlOnly)
        );
        let err = "fancy".parse::<CleaningMethod>().expect_err("unknown");
        assert!(matches!(err, TableError::UnknownOption { .. }));
    }

    #[test]
    fn column_cleaning_blanks_non_text_cells() {
        let mut t = Table::from_columns(vec![Column::new(
            "msg_post",
            [
                Value::from("<i>x</i>  y"),
                Value::Null,
                Value::Int(5),
                Value::Float(2.5),
                Value::Bool(true),
            ],
        )])
        .expect("table");

        clean_column(&mut t, "msg_post", CleaningMethod::Advanced).expect("clean");

        let values = &t.column("msg_post").expect("column").values;
        assert_eq!(values[0], Value::from("x y"));
        assert_eq!(values[1], Value::from(""));
        for blank in &values[1..] {
            assert_eq!(blank, &Value::from(""));
        }
    }

    #[test]
    fn clean_columns_fails_on_missing() {
        let mut t = Table::from_columns(vec![Column::new("a", ["x"])]).expect("table");
        let err = clean_columns(&mut t, &["a", "b"], CleaningMethod::Basic).expect_err("missing");
        assert!(matches!(err, TableError::ColumnNotFound(c) if c == "b"));
    }

    #[test]
    fn concat_skips_empty_cells() {
        let t = Table::from_columns(vec![Column::new(
            "body",
            [Value::from("one"), Value::from(""), Value::Null, Value::from("two")],
        )])
        .expect("table");
        assert_eq!(concat_column_text(&t, "body").expect("concat"), "one two");
    }
}
