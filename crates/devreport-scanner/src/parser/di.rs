//! di.xml parser
//!
//! A di.xml file mixes `<preference>`, `<type>`, `<virtualType>` and other
//! elements in any order; only preferences and plugin-bearing types are read.

use super::{non_empty, RawRecord};
use crate::error::{ScanError, ScanResult};
use serde::Deserialize;
use std::path::Path;

/// Raw di.xml structure for parsing
#[derive(Debug, Deserialize)]
struct RawDiConfig {
    #[serde(rename = "preference", default)]
    preferences: Vec<RawPreference>,
    #[serde(rename = "type", default)]
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawPreference {
    #[serde(rename = "@for")]
    target: Option<String>,
    #[serde(rename = "@type")]
    replacement: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawType {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "plugin", default)]
    plugins: Vec<RawPlugin>,
}

#[derive(Debug, Deserialize)]
struct RawPlugin {
    #[serde(rename = "@type")]
    class: Option<String>,
}

fn parse_di(path: &Path, content: &str) -> ScanResult<RawDiConfig> {
    quick_xml::de::from_str(content).map_err(|e| ScanError::malformed(path, e))
}

/// Parse the plugin declarations of a di.xml file
///
/// Types without a plugin are skipped, as are plugin entries with no `type`
/// (those only disable or reorder an existing plugin).
///
/// # Errors
/// Returns an error if the document is not well-formed or a plugin-bearing
/// type has no name
pub fn parse_plugins(path: &Path, content: &str) -> ScanResult<Vec<RawRecord>> {
    let raw = parse_di(path, content)?;

    let mut records = Vec::new();
    for ty in raw.types {
        if ty.plugins.is_empty() {
            continue;
        }
        let name = non_empty(ty.name)
            .ok_or_else(|| ScanError::malformed(path, "<type> with plugins but no name attribute"))?;
        for plugin in ty.plugins {
            if let Some(class) = non_empty(plugin.class) {
                records.push(RawRecord::new(name.clone(), class));
            }
        }
    }
    Ok(records)
}

/// Parse the preference declarations of a di.xml file
///
/// # Errors
/// Returns an error if the document is not well-formed or a preference
/// lacks its `for` or `type` attribute
pub fn parse_preferences(path: &Path, content: &str) -> ScanResult<Vec<RawRecord>> {
    let raw = parse_di(path, content)?;

    raw.preferences
        .into_iter()
        .map(|pref| {
            let target = non_empty(pref.target)
                .ok_or_else(|| ScanError::malformed(path, "<preference> without a for attribute"))?;
            let replacement = non_empty(pref.replacement).ok_or_else(|| {
                ScanError::malformed(path, format!("<preference for=\"{target}\"> without a type attribute"))
            })?;
            Ok(RawRecord::new(target, replacement))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DI_XML: &str = r#"<?xml version="1.0"?>
<config xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="urn:magento:framework:ObjectManager/etc/config.xsd">
    <preference for="Magento\Catalog\Model\Product" type="Acme\Foo\Model\Product"/>
    <type name="Magento\Checkout\Model\Cart">
        <plugin name="acme_cart" type="Acme\Foo\Plugin\Cart" sortOrder="10"/>
        <plugin name="core_cart_plugin" disabled="true"/>
    </type>
    <virtualType name="AcmeLogger" type="Monolog\Logger">
        <arguments>
            <argument name="name" xsi:type="string">acme</argument>
        </arguments>
    </virtualType>
    <type name="Acme\Foo\Model\Config">
        <arguments>
            <argument name="path" xsi:type="string">acme/general</argument>
        </arguments>
    </type>
    <preference for="Magento\Sales\Api\OrderRepositoryInterface" type="Acme\Foo\Model\OrderRepository"/>
    <type name="Magento\Quote\Model\Quote">
        <plugin name="acme_quote" type="Acme\Foo\Plugin\Quote"/>
    </type>
</config>"#;

    #[test]
    fn test_parse_preferences_interleaved() {
        let records = parse_preferences(&PathBuf::from("di.xml"), DI_XML).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("Magento\\Catalog\\Model\\Product", "Acme\\Foo\\Model\\Product"),
                RawRecord::new(
                    "Magento\\Sales\\Api\\OrderRepositoryInterface",
                    "Acme\\Foo\\Model\\OrderRepository"
                ),
            ]
        );
    }

    #[test]
    fn test_parse_plugins_skips_types_without_plugin() {
        let records = parse_plugins(&PathBuf::from("di.xml"), DI_XML).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("Magento\\Checkout\\Model\\Cart", "Acme\\Foo\\Plugin\\Cart"),
                RawRecord::new("Magento\\Quote\\Model\\Quote", "Acme\\Foo\\Plugin\\Quote"),
            ]
        );
    }

    #[test]
    fn test_parse_preferences_missing_type() {
        let content = r#"<config><preference for="A\B"/></config>"#;
        let result = parse_preferences(&PathBuf::from("di.xml"), content);
        assert!(matches!(
            result,
            Err(ScanError::MalformedConfiguration { .. })
        ));
    }

    #[test]
    fn test_parse_di_unclosed_document() {
        let content = r#"<config><type name="A"><plugin name="p" type="B"/>"#;
        assert!(parse_plugins(&PathBuf::from("di.xml"), content).is_err());
        assert!(parse_preferences(&PathBuf::from("di.xml"), content).is_err());
    }
}
