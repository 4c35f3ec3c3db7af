//! In-memory trace of submitted statements.

/// Append-only record of every statement submitted through the store, with
/// failures annotated right after the statement that caused them.
///
/// Entries are kept until [`DiagnosticLog::clear`]; nothing is truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_statement(&mut self, sql: &str) {
        self.entries.push(sql.to_string());
    }

    pub fn record_prepare_error(&mut self, message: &str) {
        self.entries.push(format!("ERROR in prepare: {message}"));
    }

    pub fn record_step_error(&mut self, message: &str) {
        self.entries.push(format!("ERROR in step: {message}"));
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
