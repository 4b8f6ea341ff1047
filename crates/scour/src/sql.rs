//! SQL rendering helpers.
//!
//! Identifier quoting plus the statement builders for the one structural
//! mutation this crate performs.

use std::fmt;

/// A PostgreSQL identifier wrapper.
///
/// Display writes the value escaped and quoted with double quotes.
///
/// # Example
/// ```
/// use scour::sql::Ident;
/// assert_eq!(format!("{}", Ident("user")), "\"user\"");
/// assert_eq!(format!("{}", Ident("bla\"h")), "\"bla\"\"h\"");
/// ```
pub struct Ident<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> fmt::Display for Ident<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.0.as_ref().chars() {
            if c == '"' {
                write!(f, "\"\"")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "\"")
    }
}

/// Quote a PostgreSQL identifier.
///
/// Always quotes to avoid issues with reserved keywords like `user`,
/// `order`, `table`, `group`. Doubles any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("{}", Ident(name))
}

/// Render the `ALTER TABLE … DROP COLUMN …` statement for one orphan.
///
/// This is the irreversible part of the pipeline; everything else exists to
/// make sure this statement is only ever rendered for a genuinely orphaned
/// column.
pub fn drop_column_sql(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        Ident(table),
        Ident(column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("res_partner"), "\"res_partner\"");
        // Reserved keywords are safe because everything is quoted
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn snapshot_drop_column_sql() {
        insta::assert_snapshot!(
            drop_column_sql("res_partner", "legacy_flag"),
            @r#"ALTER TABLE "res_partner" DROP COLUMN "legacy_flag""#
        );
    }

    #[test]
    fn snapshot_drop_column_sql_keyword_table() {
        insta::assert_snapshot!(
            drop_column_sql("user", "order"),
            @r#"ALTER TABLE "user" DROP COLUMN "order""#
        );
    }
}
