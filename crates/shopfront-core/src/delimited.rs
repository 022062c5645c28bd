//! Comma-delimited record parsing with quoted-field support.
//!
//! The review export and the price list both use double quotes to escape
//! embedded commas, and the review export additionally embeds newlines
//! inside quoted fields. A character scan with an in-quotes flag handles
//! both: a newline is a record boundary only outside quotes, a comma is
//! a field boundary only outside quotes, and carriage returns are dropped
//! unconditionally.
//!
//! Header handling and minimum-field filtering are the caller's concern;
//! this module only turns text into ordered field lists.

/// Split raw text into logical records, respecting quoted newlines.
/// Quote characters are preserved so that [`split_fields`] can consume
/// them; records that are blank after trimming are skipped.
pub fn split_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => {
                if !current.trim().is_empty() {
                    records.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            '\r' => {}
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        records.push(current);
    }
    records
}

/// Split one logical record into trimmed fields. Quote characters toggle
/// the in-quotes flag and are dropped from the output.
pub fn split_fields(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in record.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse a whole blob into field lists, in input order.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    split_records(text)
        .iter()
        .map(|record| split_fields(record))
        .collect()
}
