/// How a raw statement is routed, decided from its leading keyword alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Starts with `SELECT`: run on the row-returning path.
    Select,
    /// Starts with `CREATE`, `ALTER`, `DROP` or `TRUNCATE`: effect path, and the table list
    /// a client is showing is now stale.
    Ddl,
    /// Anything else (`INSERT`, `UPDATE`, `DELETE`, `PRAGMA`, …): effect path.
    Other,
}

const DDL_KEYWORDS: [&str; 4] = ["CREATE", "ALTER", "DROP", "TRUNCATE"];

impl StatementKind {
    /// Classify by case-insensitive prefix of the trimmed text.
    ///
    /// Only the prefix matters, so `WITH … SELECT` takes the effect path and the engine
    /// rejects it for returning rows.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        let trimmed = sql.trim_start();
        if starts_with_ignore_case(trimmed, "SELECT") {
            StatementKind::Select
        } else if DDL_KEYWORDS
            .iter()
            .any(|kw| starts_with_ignore_case(trimmed, kw))
        {
            StatementKind::Ddl
        } else {
            StatementKind::Other
        }
    }

    #[must_use]
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Select)
    }

    #[must_use]
    pub fn changes_catalog(self) -> bool {
        matches!(self, StatementKind::Ddl)
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
