use chrono::{DateTime, Local};

/// Identity line shared by every rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub session_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH_MM`
    pub time: String,
    /// Printed under the date line of every document when set
    pub project: Option<String>,
}

impl DocumentHeader {
    pub fn new(
        session_id: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            date: date.into(),
            time: time.into(),
            project: None,
        }
    }

    /// Date and time taken from an RFC 3339 timestamp in its own offset,
    /// falling back to the local clock when it does not parse
    pub fn from_timestamp(session_id: impl Into<String>, timestamp: &str) -> Self {
        let (date, time) = match DateTime::parse_from_rfc3339(timestamp) {
            Ok(dt) => (
                dt.format("%Y-%m-%d").to_string(),
                dt.format("%H_%M").to_string(),
            ),
            Err(_) => {
                let now = Local::now();
                (
                    now.format("%Y-%m-%d").to_string(),
                    now.format("%H_%M").to_string(),
                )
            }
        };
        Self::new(session_id, date, time)
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn short_id(&self) -> &str {
        ccextract_types::short_id(&self.session_id)
    }
}
