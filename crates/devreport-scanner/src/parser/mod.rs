//! Parsers for module configuration files

pub mod composer;
pub mod di;
pub mod events;

pub use composer::{parse_installed, parse_psr4};
pub use di::{parse_plugins, parse_preferences};
pub use events::parse_events;

use crate::error::{ScanError, ScanResult};
use crate::types::ReportKind;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// Name of the root element every module configuration file carries
const ROOT_ELEMENT: &[u8] = b"config";

/// One customization record as read from a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Event name, intercepted type or overridden class
    pub source_key: String,
    /// Class implementing the customization
    pub customizer: String,
}

impl RawRecord {
    pub fn new(source_key: impl Into<String>, customizer: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            customizer: customizer.into(),
        }
    }
}

/// Parse the records of `kind` out of a configuration file's bytes
///
/// Records are returned in document order.
///
/// # Errors
/// Returns `MalformedConfiguration` if the content is not valid UTF-8 XML
/// of the expected structure
pub fn parse_declarations(path: &Path, content: &[u8], kind: ReportKind) -> ScanResult<Vec<RawRecord>> {
    let text = std::str::from_utf8(content).map_err(|e| ScanError::malformed(path, e))?;
    check_document(path, text)?;
    match kind {
        ReportKind::Observer => parse_events(path, text),
        ReportKind::Plugin => parse_plugins(path, text),
        ReportKind::Preference => parse_preferences(path, text),
    }
}

/// Verify that `text` is a well-formed document with a single `<config>` root
///
/// Outside the root only whitespace, comments, processing instructions, the
/// XML declaration and a DOCTYPE are accepted.
///
/// # Errors
/// Returns `MalformedConfiguration` describing the first violation
pub fn check_document(path: &Path, text: &str) -> ScanResult<()> {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(true);

    let mut depth = 0usize;
    let mut has_root = false;
    loop {
        let event = reader.read_event().map_err(|e| {
            ScanError::malformed(path, format!("{e} at byte {}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) if depth == 0 => {
                if has_root {
                    return Err(ScanError::malformed(path, "more than one root element"));
                }
                if e.name().as_ref() != ROOT_ELEMENT {
                    return Err(ScanError::malformed(
                        path,
                        format!(
                            "unexpected root element <{}>, expected <config>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ),
                    ));
                }
                has_root = true;
                if matches!(event, Event::Start(_)) {
                    depth = 1;
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(ref t) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(ScanError::malformed(path, "text outside the root element"));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(ScanError::malformed(path, "CDATA outside the root element"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(ScanError::malformed(path, "unexpected end of document"));
    }
    if !has_root {
        return Err(ScanError::malformed(path, "no root element"));
    }
    Ok(())
}

/// Treat a missing or blank attribute as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
