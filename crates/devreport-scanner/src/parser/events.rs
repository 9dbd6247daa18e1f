//! events.xml parser

use super::{non_empty, RawRecord};
use crate::error::{ScanError, ScanResult};
use serde::Deserialize;
use std::path::Path;

/// Raw events.xml structure for parsing
#[derive(Debug, Deserialize)]
struct RawEventsConfig {
    #[serde(rename = "event", default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "observer", default)]
    observers: Vec<RawObserver>,
}

#[derive(Debug, Deserialize)]
struct RawObserver {
    #[serde(rename = "@instance")]
    instance: Option<String>,
}

/// Parse an events.xml file
///
/// Each observer with an `instance` yields one record. Observers without
/// one only disable another module's observer and are skipped.
///
/// # Errors
/// Returns an error if the document is not well-formed or an event has no name
pub fn parse_events(path: &Path, content: &str) -> ScanResult<Vec<RawRecord>> {
    let raw: RawEventsConfig =
        quick_xml::de::from_str(content).map_err(|e| ScanError::malformed(path, e))?;

    let mut records = Vec::new();
    for event in raw.events {
        let name = non_empty(event.name)
            .ok_or_else(|| ScanError::malformed(path, "<event> without a name attribute"))?;
        for observer in event.observers {
            if let Some(instance) = non_empty(observer.instance) {
                records.push(RawRecord::new(name.clone(), instance));
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_events() {
        let content = r#"<?xml version="1.0"?>
<config xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="urn:magento:framework:Event/etc/events.xsd">
    <event name="checkout_submit_all_after">
        <observer name="acme_log" instance="Acme\Foo\Observer\Log"/>
        <observer name="acme_mail" instance="Acme\Foo\Observer\Mail"/>
    </event>
    <!-- disables a core observer -->
    <event name="sales_order_place_after">
        <observer name="core_thing" disabled="true"/>
    </event>
    <event name="customer_login">
        <observer name="acme_login" instance="Acme\Foo\Observer\Login" shared="false"/>
    </event>
</config>"#;

        let records = parse_events(&PathBuf::from("events.xml"), content).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("checkout_submit_all_after", "Acme\\Foo\\Observer\\Log"),
                RawRecord::new("checkout_submit_all_after", "Acme\\Foo\\Observer\\Mail"),
                RawRecord::new("customer_login", "Acme\\Foo\\Observer\\Login"),
            ]
        );
    }

    #[test]
    fn test_parse_events_empty_config() {
        let records = parse_events(&PathBuf::from("events.xml"), "<config/>").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_events_mismatched_tags() {
        let content = r#"<config><event name="a"><observer instance="X"/></config>"#;
        let result = parse_events(&PathBuf::from("events.xml"), content);
        assert!(matches!(
            result,
            Err(ScanError::MalformedConfiguration { .. })
        ));
    }

    #[test]
    fn test_parse_events_missing_event_name() {
        let content = r#"<config><event><observer instance="X"/></event></config>"#;
        let result = parse_events(&PathBuf::from("events.xml"), content);
        assert!(matches!(
            result,
            Err(ScanError::MalformedConfiguration { .. })
        ));
    }
}
