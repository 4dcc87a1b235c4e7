//! Human-readable rendering of a parsed configuration
//!
//! Read-only; used to check what the reader understood.

use lvsmon_core::config::{Configuration, HealthCheckMethod, RealServer, VirtualServer};

/// Render the configuration as dump lines
pub fn render(config: Option<&Configuration>) -> Vec<String> {
    let Some(config) = config else {
        return vec!["Empty data configuration !!!".to_string()];
    };

    let mut lines = vec![
        "------< Global definitions >------".to_string(),
        format!(" LVS ID = {}", config.lvs_id),
        format!(" Smtp server = {}", config.smtp_server),
        format!(" Smtp server connection timeout = {}", config.smtp_connect_timeout),
        format!(" Email notification from = {}", config.email_from),
    ];
    for email in &config.notification_emails {
        lines.push(format!(" Email notification = {}", email));
    }

    lines.push("------< LVS Topology >------".to_string());
    for vs in &config.virtual_servers {
        render_virtual_server(vs, &mut lines);
    }

    lines
}

fn render_virtual_server(vs: &VirtualServer, lines: &mut Vec<String>) {
    lines.push(format!(" VS IP = {}, PORT = {}", vs.key.address, vs.key.port));
    lines.push(format!(
        " -> delay_loop = {}, lb_algo = {}, lb_kind = {}, persistence = {}, protocol = {}",
        vs.delay_loop, vs.scheduler, vs.lb_kind, vs.persistence_timeout, vs.protocol
    ));
    lines.push(format!(" -> nat mask = {}", vs.nat_mask));

    if let Some(sorry) = &vs.sorry_server {
        lines.push(format!(
            " -> sorry server = [{}:{}]",
            sorry.key.address, sorry.key.port
        ));
    }

    for rs in &vs.real_servers {
        render_real_server(rs, lines);
    }
}

fn render_real_server(rs: &RealServer, lines: &mut Vec<String>) {
    lines.push(format!(
        "    -> SVR IP = {}, PORT = {}, WEIGHT = {}",
        rs.key.address, rs.key.port, rs.weight
    ));

    let Some(method) = &rs.method else {
        return;
    };
    lines.push(format!("       -> Keepalive method = {}", method.kind()));
    if let Some(timeout) = method.connect_timeout() {
        lines.push(format!("       -> Connection timeout = {}", timeout));
    }
    if let HealthCheckMethod::HttpGet { check, .. } = method {
        lines.push(format!("       -> Nb get retry = {}", check.nb_get_retry));
        lines.push(format!("       -> Delay before retry = {}", check.delay_before_retry));
        for url in &check.urls {
            lines.push(format!("       -> Url = {}, Digest = {}", url.path, url.digest));
        }
    }
}

/// Emit the dump through `tracing` at debug level
pub fn dump(config: Option<&Configuration>) {
    for line in render(config) {
        tracing::debug!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(None), vec!["Empty data configuration !!!"]);
    }

    #[test]
    fn test_render_default_configuration() {
        let lines = render(Some(&Configuration::default()));
        assert_eq!(
            lines,
            vec![
                "------< Global definitions >------",
                " LVS ID = ",
                " Smtp server = 0.0.0.0",
                " Smtp server connection timeout = 0",
                " Email notification from = ",
                "------< LVS Topology >------",
            ]
        );
    }

    #[test]
    fn test_render_topology() {
        let parsed = parse(
            r#"
            global_defs {
                lvs_id LVS1
                notification_email { ops@example.com }
            }
            virtual_server 10.0.0.1 80 {
                delay_loop 6
                lb_algo wlc
                lb_kind NAT
                nat_mask 255.255.255.0
                persistence_timeout 50
                protocol TCP
                sorry_server 10.0.0.9 8080
                real_server 10.0.0.2 80 {
                    weight 10
                    HTTP_GET {
                        connect_timeout 3
                        nb_get_retry 3
                        delay_before_retry 2
                        url { path /health digest ef01 }
                    }
                }
                real_server 10.0.0.3 80 { weight 5 }
            }
            "#,
        )
        .unwrap();

        let lines = render(Some(&parsed.config));
        assert_eq!(
            &lines[1..],
            &[
                " LVS ID = LVS1",
                " Smtp server = 0.0.0.0",
                " Smtp server connection timeout = 0",
                " Email notification from = ",
                " Email notification = ops@example.com",
                "------< LVS Topology >------",
                " VS IP = 10.0.0.1, PORT = 80",
                " -> delay_loop = 6, lb_algo = wlc, lb_kind = NAT, persistence = 50, protocol = TCP",
                " -> nat mask = 255.255.255.0",
                " -> sorry server = [10.0.0.9:8080]",
                "    -> SVR IP = 10.0.0.2, PORT = 80, WEIGHT = 10",
                "       -> Keepalive method = HTTP_GET",
                "       -> Connection timeout = 3",
                "       -> Nb get retry = 3",
                "       -> Delay before retry = 2",
                "       -> Url = /health, Digest = ef01",
                "    -> SVR IP = 10.0.0.3, PORT = 80, WEIGHT = 5",
            ]
        );
    }
}
