//! shade HTML Parser
//!
//! HTML5 parsing built on html5ever, producing `shade_dom` documents.

mod parser;

pub use parser::HtmlParser;

use shade_dom::{Document, DomError};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build document: {0}")]
    Dom(#[from] DomError),
}
