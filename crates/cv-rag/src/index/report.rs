//! Status lines produced by an index rebuild

use serde::Serialize;

/// Severity of a status line, mapped to banner colors in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Success,
    Error,
}

/// One user-visible status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub level: ReportLevel,
    pub message: String,
}

/// Ordered status lines from one `IndexManager::rebuild` call
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebuildReport {
    pub lines: Vec<ReportLine>,
    /// Whether a live index exists once the rebuild finished
    pub ready: bool,
}

impl RebuildReport {
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.push(ReportLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.push(ReportLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.push(ReportLevel::Error, message);
    }

    fn push(&mut self, level: ReportLevel, message: String) {
        self.lines.push(ReportLine { level, message });
    }

    /// Messages in order, without levels
    pub fn messages(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.message.as_str()).collect()
    }

    /// True if any line is an error
    pub fn has_errors(&self) -> bool {
        self.lines.iter().any(|l| l.level == ReportLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_order_and_level() {
        let mut report = RebuildReport::default();
        report.info("a");
        report.error("b");
        report.success("c");

        assert_eq!(report.messages(), vec!["a", "b", "c"]);
        assert_eq!(report.lines[1].level, ReportLevel::Error);
        assert!(report.has_errors());
        assert_eq!(
            serde_json::to_value(&report.lines[2]).unwrap()["level"],
            "success"
        );
    }
}
