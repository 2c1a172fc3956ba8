//! SQL identifier validation and quoting.
//!
//! [`Ident`] represents a table or column name, supporting dotted notation and
//! parts that arrive already quoted with the dialect's quote character.
//!
//! - Bare parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL and `?` and escape the quote by doubling it
//!
//! Quoting is idempotent: `` `title` `` and `title` both render as `` `title` ``.
//!
//! Plain rendering keeps bare parts unquoted unless they are reserved words,
//! so `books` stays `books` but `order` becomes `` `order` ``.

use crate::config::Dialect;
use crate::error::{QueryError, QueryResult};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Reserved words that break a statement when used unquoted as a name.
static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONDITION", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME",
        "CURRENT_TIMESTAMP", "CURRENT_USER", "DATABASE", "DEFAULT", "DELETE", "DESC",
        "DESCRIBE", "DISTINCT", "DIV", "DROP", "ELSE", "EXISTS", "EXPLAIN", "FALSE", "FETCH",
        "FOR", "FOREIGN", "FROM", "FULLTEXT", "GRANT", "GROUP", "HAVING", "IF", "IGNORE", "IN",
        "INDEX", "INNER", "INSERT", "INTERVAL", "INTO", "IS", "JOIN", "KEY", "KEYS", "KILL",
        "LEFT", "LIKE", "LIMIT", "LOCK", "MATCH", "MOD", "NATURAL", "NOT", "NULL", "OFFSET", "ON",
        "OPTION", "OR", "ORDER", "OUTER", "PRIMARY", "RANGE", "READ", "REFERENCES", "RENAME",
        "REPLACE", "REVOKE", "RIGHT", "ROW", "ROWS", "SCHEMA", "SELECT", "SET", "SHOW", "TABLE",
        "THEN", "TO", "TRIGGER", "TRUE", "UNION", "UNIQUE", "UPDATE", "USAGE", "USE", "USING",
        "VALUES", "WHEN", "WHERE", "WITH", "WRITE",
    ]
    .into_iter()
    .collect()
});

/// Case-insensitive reserved word check.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_ascii_uppercase().as_str())
}

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Bare identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Bare(String),
    /// Part that arrived wrapped in the quote character (stored unescaped).
    Quoted(String),
}

/// A SQL identifier (column, table, or `schema.table`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse an identifier string for the given dialect.
    ///
    /// - Dotted: `library.books`
    /// - Pre-quoted: `` `Book Title` ``
    /// - Mixed: ``library.`Book Title` ``
    pub fn parse(s: &str, dialect: Dialect) -> QueryResult<Self> {
        if s.is_empty() {
            return Err(QueryError::invalid_identifier("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(QueryError::invalid_identifier(
                "identifier cannot contain NUL character",
            ));
        }

        let quote = dialect.quote_char();
        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(QueryError::invalid_identifier(format!(
                                "trailing '.' in '{s}'"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(QueryError::invalid_identifier(format!(
                            "expected '.' between parts of '{s}', got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&quote) {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => {
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                name.push(quote);
                            } else {
                                break;
                            }
                        }
                        Some('?') => {
                            return Err(QueryError::invalid_identifier(format!(
                                "'?' is reserved for placeholders, found in '{s}'"
                            )));
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(QueryError::invalid_identifier(format!(
                                "unclosed quote in '{s}'"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(QueryError::invalid_identifier("empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let ok = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !ok {
                    return Err(QueryError::invalid_identifier(format!(
                        "invalid character '{c}' in '{s}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(QueryError::invalid_identifier(format!(
                    "empty segment in '{s}'"
                )));
            }
            parts.push(IdentPart::Bare(name));
        }

        Ok(Self { parts })
    }

    /// Render with every part quoted.
    pub fn to_quoted(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, dialect, true);
        out
    }

    /// Render bare parts as given and keep pre-quoted parts quoted. Bare
    /// reserved words are quoted.
    pub fn to_plain(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, dialect, false);
        out
    }

    fn write_sql(&self, out: &mut String, dialect: Dialect, quote_bare: bool) {
        let quote = dialect.quote_char();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Bare(s) if !quote_bare && !is_reserved_word(s) => out.push_str(s),
                IdentPart::Bare(s) | IdentPart::Quoted(s) => {
                    out.push(quote);
                    for ch in s.chars() {
                        if ch == quote {
                            out.push(quote);
                        }
                        out.push(ch);
                    }
                    out.push(quote);
                }
            }
        }
    }
}

/// Parse and quote in one step.
pub fn quote_ident(name: &str, dialect: Dialect) -> QueryResult<String> {
    Ident::parse(name, dialect).map(|ident| ident.to_quoted(dialect))
}

/// Parse and render plain in one step.
pub fn plain_ident(name: &str, dialect: Dialect) -> QueryResult<String> {
    Ident::parse(name, dialect).map(|ident| ident.to_plain(dialect))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MY: Dialect = Dialect::MySql;

    #[test]
    fn quotes_simple() {
        assert_eq!(quote_ident("author", MY).unwrap(), "`author`");
    }

    #[test]
    fn quoting_is_idempotent() {
        assert_eq!(quote_ident("`author`", MY).unwrap(), "`author`");
        let once = quote_ident("books", MY).unwrap();
        assert_eq!(quote_ident(&once, MY).unwrap(), once);
    }

    #[test]
    fn dotted_parts() {
        assert_eq!(quote_ident("library.books", MY).unwrap(), "`library`.`books`");
        assert_eq!(plain_ident("library.books", MY).unwrap(), "library.books");
    }

    #[test]
    fn quoted_part_with_space_and_escape() {
        assert_eq!(quote_ident("`Book Title`", MY).unwrap(), "`Book Title`");
        assert_eq!(quote_ident("`odd``name`", MY).unwrap(), "`odd``name`");
        assert_eq!(plain_ident("`Book Title`", MY).unwrap(), "`Book Title`");
    }

    #[test]
    fn ansi_dialect_uses_double_quotes() {
        assert_eq!(quote_ident("title", Dialect::Ansi).unwrap(), "\"title\"");
        assert_eq!(quote_ident("\"title\"", Dialect::Ansi).unwrap(), "\"title\"");
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(quote_ident("title` = 1 OR `1", MY).is_err());
        assert!(quote_ident("title; DROP TABLE books", MY).is_err());
        assert!(quote_ident("`unclosed", MY).is_err());
        assert!(plain_ident("books WHERE 1=1", MY).is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(Ident::parse("", MY).is_err());
        assert!(Ident::parse("1books", MY).is_err());
        assert!(Ident::parse("a..b", MY).is_err());
        assert!(Ident::parse("a.", MY).is_err());
        assert!(Ident::parse("``", MY).is_err());
    }

    #[test]
    fn plain_rendering_quotes_reserved_words() {
        assert_eq!(plain_ident("order", MY).unwrap(), "`order`");
        assert_eq!(plain_ident("shop.Group", MY).unwrap(), "shop.`Group`");
        assert_eq!(plain_ident("orders", MY).unwrap(), "orders");
        assert_eq!(plain_ident("select", Dialect::Ansi).unwrap(), "\"select\"");
        assert!(is_reserved_word("where"));
        assert!(!is_reserved_word("books"));
    }

    #[test]
    fn rejects_question_mark_in_quoted_part() {
        assert!(matches!(
            quote_ident("`why?`", MY),
            Err(QueryError::InvalidIdentifier(_))
        ));
        assert!(plain_ident("library.`a?b`", MY).is_err());
        assert!(quote_ident("\"who?\"", Dialect::Ansi).is_err());
    }
}
