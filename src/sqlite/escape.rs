use std::fmt::Write;

use crate::types::DbValue;

/// Render `value` as a SQLite literal, quoting text with embedded `'`
/// doubled.
#[must_use]
pub fn escape_literal(value: &DbValue) -> String {
    match value {
        DbValue::Null => "NULL".to_string(),
        DbValue::Int(i) => i.to_string(),
        DbValue::Float(f) => f.to_string(),
        DbValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
        DbValue::Text(s) => quote_text(s),
        DbValue::Timestamp(ts) => quote_text(&ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
        DbValue::Json(v) => quote_text(&v.to_string()),
        DbValue::Blob(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for byte in bytes {
                // Writing to a String cannot fail.
                let _ = write!(out, "{byte:02X}");
            }
            out.push('\'');
            out
        }
    }
}

/// Render `ident` as a quoted SQLite identifier, with embedded `"` doubled.
#[must_use]
pub fn escape_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(escape_literal(&DbValue::Null), "NULL");
        assert_eq!(escape_literal(&DbValue::Int(42)), "42");
        assert_eq!(escape_literal(&DbValue::Bool(true)), "1");
        assert_eq!(
            escape_literal(&DbValue::Text("it's".into())),
            "'it''s'"
        );
        assert_eq!(
            escape_literal(&DbValue::Blob(vec![0xDE, 0xAD])),
            "X'DEAD'"
        );
    }

    #[test]
    fn identifiers() {
        assert_eq!(escape_identifier("plain"), "\"plain\"");
        assert_eq!(escape_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
