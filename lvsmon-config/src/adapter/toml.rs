//! TOML configuration adapter

use lvsmon_core::config::Configuration;
use lvsmon_core::error::{Error, Result};

/// TOML configuration adapter
pub struct TomlAdapter;

impl TomlAdapter {
    /// Parse TOML configuration
    pub fn parse(input: &str) -> Result<Configuration> {
        toml::from_str(input).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Serialize configuration to TOML
    pub fn serialize(config: &Configuration) -> Result<String> {
        toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvsmon_core::config::{HealthCheckMethod, Protocol};
    use std::net::Ipv4Addr;

    #[test]
    fn test_toml_parse() {
        let config = TomlAdapter::parse(
            r#"
            lvs_id = "LVS1"
            smtp_server = "10.1.1.1"
            notification_emails = ["ops@example.com"]

            [[virtual_servers]]
            address = "10.0.0.1"
            port = 80
            protocol = "tcp"

            [[virtual_servers.real_servers]]
            address = "10.0.0.2"
            port = 80
            weight = 5

            [virtual_servers.real_servers.method]
            type = "tcp"
            connect_timeout = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.lvs_id.as_str(), "LVS1");
        assert_eq!(config.smtp_server, Ipv4Addr::new(10, 1, 1, 1));
        assert_eq!(config.notification_emails.len(), 1);

        let vs = config.virtual_servers.first().unwrap();
        assert_eq!(vs.protocol, Protocol::Tcp);
        let rs = vs.real_servers.first().unwrap();
        assert_eq!(rs.weight, 5);
        assert!(rs.alive);
        assert_eq!(rs.method, Some(HealthCheckMethod::Tcp { connect_timeout: 3 }));
    }

    #[test]
    fn test_toml_round_trip() {
        let parsed = crate::parser::parse(
            r#"
            global_defs {
                lvs_id LVS1
                smtp_server 10.1.1.1
                notification_email { ops@example.com }
            }
            virtual_server 10.0.0.1 80 {
                protocol TCP
                sorry_server 10.0.0.9 80
                real_server 10.0.0.2 80 { weight 3 TCP_CHECK { connect_timeout 3 } }
                real_server 10.0.0.3 80 {
                    HTTP_GET {
                        nb_get_retry 2
                        url { path /health digest ef01 }
                    }
                }
                real_server 10.0.0.4 80 { ICMP_CHECK }
            }
            virtual_server 10.0.0.5 53 { delay_loop 6 }
            "#,
        )
        .unwrap();

        let toml = TomlAdapter::serialize(&parsed.config).unwrap();
        let back = TomlAdapter::parse(&toml).unwrap();
        assert_eq!(back, parsed.config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(TomlAdapter::parse("lvs_id = "), Err(Error::Config(_))));
    }
}
