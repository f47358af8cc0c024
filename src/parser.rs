use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::model::{Entry, KeyParsingMode};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse dotenv entries from UTF-8 text.
pub fn parse_str(input: &str) -> Result<Vec<Entry>, Error> {
    parse_str_with_mode(input, KeyParsingMode::default())
}

/// Parse dotenv entries from UTF-8 text using a specific key parsing mode.
pub fn parse_str_with_mode(
    input: &str,
    key_parsing_mode: KeyParsingMode,
) -> Result<Vec<Entry>, Error> {
    parse_str_with_source(input, None, key_parsing_mode).map_err(Error::from)
}

/// Parse `input` line by line. Later assignments to a key replace earlier
/// ones but keep the position of the first.
pub(crate) fn parse_str_with_source(
    input: &str,
    source: Option<&Path>,
    key_parsing_mode: KeyParsingMode,
) -> Result<Vec<Entry>, ParseError> {
    let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);
    let normalized = normalize_newlines(input);

    let mut entries = Vec::new();
    let mut by_key = HashMap::<String, usize>::new();

    for (idx, line) in normalized.split('\n').enumerate() {
        let line_num = idx as u32 + 1;
        let Some(entry) = parse_line(line, line_num, source, key_parsing_mode)? else {
            continue;
        };

        if let Some(existing_idx) = by_key.get(&entry.key).copied() {
            entries[existing_idx] = entry;
        } else {
            by_key.insert(entry.key.clone(), entries.len());
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            out.push('\n');
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            continue;
        }
        out.push(ch);
    }

    Cow::Owned(out)
}

fn parse_line(
    line: &str,
    line_num: u32,
    source: Option<&Path>,
    key_parsing_mode: KeyParsingMode,
) -> Result<Option<Entry>, ParseError> {
    let line = line.trim_end();
    let mut working = line.trim_start();
    if working.is_empty() || working.starts_with('#') {
        return Ok(None);
    }

    if let Some(rest) = working.strip_prefix("export")
        && rest.starts_with(char::is_whitespace)
        && rest.contains('=')
    {
        working = rest.trim_start();
    }

    let Some((raw_key, raw_value)) = working.split_once('=') else {
        let column = line.chars().count() as u32 + 1;
        return Err(ParseError::new(
            line_num,
            column,
            ParseErrorKind::InvalidSyntax,
        ));
    };

    let key = raw_key.trim_end();
    let key_column = column_of(line, working);
    if key.is_empty() {
        return Err(ParseError::new(
            line_num,
            key_column,
            ParseErrorKind::MissingKey,
        ));
    }
    if !is_valid_key(key, key_parsing_mode) {
        return Err(ParseError::new(
            line_num,
            key_column,
            ParseErrorKind::InvalidKey,
        ));
    }

    let value_input = raw_value.trim_start();
    let value_column = column_of(line, value_input);
    let value = parse_value(value_input, line_num, value_column)?;

    Ok(Some(Entry {
        key: key.to_owned(),
        value,
        source: source.map(Path::to_path_buf),
        line: line_num,
    }))
}

/// One-based char column at which `suffix` starts within `line`.
fn column_of(line: &str, suffix: &str) -> u32 {
    (line.chars().count() - suffix.chars().count()) as u32 + 1
}

fn parse_value(input: &str, line_num: u32, column: u32) -> Result<String, ParseError> {
    if let Some(nul_idx) = input.find('\0') {
        return Err(ParseError::new(
            line_num,
            column + input[..nul_idx].chars().count() as u32,
            ParseErrorKind::InvalidValue,
        ));
    }

    Ok(strip_matching_quotes(input).to_owned())
}

/// Unmatched quotes are kept as part of the value.
fn strip_matching_quotes(input: &str) -> &str {
    for quote in ['"', '\''] {
        if input.len() >= 2
            && let Some(inner) = input.strip_prefix(quote)
            && let Some(inner) = inner.strip_suffix(quote)
        {
            return inner;
        }
    }
    input
}

fn is_valid_key(key: &str, key_parsing_mode: KeyParsingMode) -> bool {
    match key_parsing_mode {
        KeyParsingMode::Strict => key.chars().all(is_valid_strict_key_char),
        KeyParsingMode::Permissive => key.chars().all(is_valid_permissive_key_char),
    }
}

fn is_valid_strict_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || ch == '-'
}

fn is_valid_permissive_key_char(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_control() && ch != '='
}
