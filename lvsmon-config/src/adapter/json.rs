//! JSON configuration adapter

use lvsmon_core::config::Configuration;
use lvsmon_core::error::{Error, Result};

/// JSON configuration adapter
pub struct JsonAdapter;

impl JsonAdapter {
    /// Parse JSON configuration
    pub fn parse(input: &str) -> Result<Configuration> {
        serde_json::from_str(input).map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Serialize configuration to JSON
    pub fn serialize(config: &Configuration) -> Result<String> {
        serde_json::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_json_round_trip() {
        let parsed = parse(
            r#"
            global_defs { lvs_id LVS1 smtp_server 10.1.1.1 }
            virtual_server 10.0.0.1 80 {
                protocol TCP
                sorry_server 10.0.0.9 80
                real_server 10.0.0.2 80 { weight 3 TCP_CHECK { connect_timeout 3 } }
                real_server 10.0.0.3 80 { ICMP_CHECK }
            }
            "#,
        )
        .unwrap();

        let json = JsonAdapter::serialize(&parsed.config).unwrap();
        let back = JsonAdapter::parse(&json).unwrap();
        assert_eq!(back, parsed.config);
    }

    #[test]
    fn test_json_shape() {
        let parsed = parse("virtual_server 10.0.0.1 80 { real_server 10.0.0.2 8080 { weight 3 } }").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&JsonAdapter::serialize(&parsed.config).unwrap()).unwrap();

        let rs = &value["virtual_servers"][0]["real_servers"][0];
        assert_eq!(rs["address"], "10.0.0.2");
        assert_eq!(rs["port"], 8080);
        assert_eq!(rs["weight"], 3);
        assert_eq!(rs["alive"], true);
    }

    #[test]
    fn test_json_duplicates_are_dropped() {
        let json = r#"{
            "virtual_servers": [
                { "address": "10.0.0.1", "port": 80, "delay_loop": 6 },
                { "address": "10.0.0.1", "port": 80, "delay_loop": 9 }
            ]
        }"#;
        let config = JsonAdapter::parse(json).unwrap();
        assert_eq!(config.virtual_servers.len(), 1);
        assert_eq!(config.virtual_servers.first().unwrap().delay_loop, 6);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(JsonAdapter::parse("{"), Err(Error::Config(_))));
    }
}
