use ccextract_types::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::header::DocumentHeader;
use crate::{Error, Result, render_html, render_json, render_markdown};

/// Output format of a conversation export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }

    pub fn render(&self, header: &DocumentHeader, messages: &[Message]) -> Result<String> {
        match self {
            OutputFormat::Markdown => Ok(render_markdown(header, messages)),
            OutputFormat::Json => render_json(header, messages),
            OutputFormat::Html => Ok(render_html(header, messages)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_extension() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("HTML".parse::<OutputFormat>().unwrap().extension(), "html");
        assert!(matches!(
            "pdf".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(name)) if name == "pdf"
        ));
    }
}
