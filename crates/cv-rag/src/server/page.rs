//! Chat page rendering

use axum::response::{Html, IntoResponse, Response};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::index::{ReportLevel, ReportLine};
use crate::session::ChatSession;

const PAGE_TEMPLATE: &str = "index.html";
const PAGE_TITLE: &str = "CV Analysis Chatbot";

/// Banner severity, used as a CSS class suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Status message shown above the transcript
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Error, message)
    }

    fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl From<&ReportLine> for Banner {
    fn from(line: &ReportLine) -> Self {
        let level = match line.level {
            ReportLevel::Info => BannerLevel::Info,
            ReportLevel::Success => BannerLevel::Success,
            ReportLevel::Error => BannerLevel::Error,
        };
        Self::new(level, line.message.clone())
    }
}

/// Renders the single chat page from session state
///
/// The template is compiled into the binary. Auto-escaping is on for the
/// `.html` template name, so user and model text is always escaped.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../../templates/index.html"))
            .map_err(|e| Error::internal(format!("Invalid page template: {}", e)))?;
        Ok(Self { env })
    }

    /// Render the page for a session
    pub fn render(&self, session: &ChatSession, banners: &[Banner]) -> Result<String> {
        let template = self
            .env
            .get_template(PAGE_TEMPLATE)
            .map_err(|e| Error::internal(e.to_string()))?;

        template
            .render(context! {
                title => PAGE_TITLE,
                banners => banners,
                history => session.history.entries(),
                file_path => session.file_path.as_ref().map(|p| p.display().to_string()),
            })
            .map_err(|e| Error::internal(format!("Failed to render page: {}", e)))
    }

    /// Render into a response
    pub fn respond(&self, session: &ChatSession, banners: &[Banner]) -> Response {
        match self.render(session, banners) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("{}", e);
                e.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_and_orders_history() {
        let renderer = PageRenderer::new().unwrap();
        let mut session = ChatSession::default();
        session.history.push("<script>alert(1)</script>", "first answer");
        session.history.push("second question", "second answer");

        let html = renderer.render(&session, &[]).unwrap();

        assert!(html.contains("<title>CV Analysis Chatbot</title>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.find("first answer").unwrap() < html.find("second question").unwrap());
        assert_eq!(html.matches("class=\"user-message\"").count(), 2);
        assert_eq!(html.matches("class=\"bot-message\"").count(), 2);
    }

    #[test]
    fn test_render_banners() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                &ChatSession::default(),
                &[Banner::warning("Please upload a CV before asking questions.")],
            )
            .unwrap();

        assert!(html.contains("banner-warning"));
        assert!(html.contains("Please upload a CV before asking questions."));
    }

    #[test]
    fn test_report_line_maps_level() {
        let line = ReportLine {
            level: ReportLevel::Error,
            message: "boom".into(),
        };
        assert_eq!(Banner::from(&line).level, BannerLevel::Error);
    }
}
