//! Keyword table
//!
//! Maps configuration words onto the closed set of grammar keywords.
//! Matching is exact and case-sensitive; every other word is
//! [`Keyword::Unknown`].

use std::fmt;

/// Grammar keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // ============================================================
    // Structural
    // ============================================================
    BlockOpen,
    BlockClose,

    // ============================================================
    // global_defs
    // ============================================================
    GlobalDefs,
    NotificationEmail,
    NotificationEmailFrom,
    LvsId,
    SmtpServer,
    SmtpConnectTimeout,

    // ============================================================
    // virtual_server
    // ============================================================
    VirtualServer,
    DelayLoop,
    LbAlgo,
    LbKind,
    NatMask,
    PersistenceTimeout,
    Protocol,
    SorryServer,

    // ============================================================
    // real_server and checks
    // ============================================================
    RealServer,
    Weight,
    ConnectTimeout,
    Url,
    Path,
    Digest,
    NbGetRetry,
    DelayBeforeRetry,

    IcmpCheck,
    TcpCheck,
    HttpGet,
    SslGet,
    LdapGet,

    Unknown,
}

impl Keyword {
    /// Every keyword that has a spelling, in table order
    pub const ALL: [Keyword; 29] = [
        Keyword::BlockOpen,
        Keyword::BlockClose,
        Keyword::GlobalDefs,
        Keyword::NotificationEmail,
        Keyword::NotificationEmailFrom,
        Keyword::LvsId,
        Keyword::SmtpServer,
        Keyword::SmtpConnectTimeout,
        Keyword::VirtualServer,
        Keyword::DelayLoop,
        Keyword::LbAlgo,
        Keyword::LbKind,
        Keyword::NatMask,
        Keyword::PersistenceTimeout,
        Keyword::Protocol,
        Keyword::SorryServer,
        Keyword::RealServer,
        Keyword::Weight,
        Keyword::ConnectTimeout,
        Keyword::Url,
        Keyword::Path,
        Keyword::Digest,
        Keyword::NbGetRetry,
        Keyword::DelayBeforeRetry,
        Keyword::IcmpCheck,
        Keyword::TcpCheck,
        Keyword::HttpGet,
        Keyword::SslGet,
        Keyword::LdapGet,
    ];

    /// Classify a word
    pub fn classify(word: &str) -> Keyword {
        match word {
            "{" => Keyword::BlockOpen,
            "}" => Keyword::BlockClose,

            "global_defs" => Keyword::GlobalDefs,
            "notification_email" => Keyword::NotificationEmail,
            "notification_email_from" => Keyword::NotificationEmailFrom,
            "lvs_id" => Keyword::LvsId,
            "smtp_server" => Keyword::SmtpServer,
            "smtp_connect_timeout" => Keyword::SmtpConnectTimeout,

            "virtual_server" => Keyword::VirtualServer,
            "delay_loop" => Keyword::DelayLoop,
            "lb_algo" => Keyword::LbAlgo,
            "lb_kind" => Keyword::LbKind,
            "nat_mask" => Keyword::NatMask,
            "persistence_timeout" => Keyword::PersistenceTimeout,
            "protocol" => Keyword::Protocol,
            "sorry_server" => Keyword::SorryServer,

            "real_server" => Keyword::RealServer,
            "weight" => Keyword::Weight,
            "connect_timeout" => Keyword::ConnectTimeout,
            "url" => Keyword::Url,
            "path" => Keyword::Path,
            "digest" => Keyword::Digest,
            "nb_get_retry" => Keyword::NbGetRetry,
            "delay_before_retry" => Keyword::DelayBeforeRetry,

            "ICMP_CHECK" => Keyword::IcmpCheck,
            "TCP_CHECK" => Keyword::TcpCheck,
            "HTTP_GET" => Keyword::HttpGet,
            "SSL_GET" => Keyword::SslGet,
            "LDAP_GET" => Keyword::LdapGet,

            _ => Keyword::Unknown,
        }
    }

    /// Spelling of the keyword, `None` for [`Keyword::Unknown`]
    pub fn as_str(&self) -> Option<&'static str> {
        let word = match self {
            Keyword::BlockOpen => "{",
            Keyword::BlockClose => "}",
            Keyword::GlobalDefs => "global_defs",
            Keyword::NotificationEmail => "notification_email",
            Keyword::NotificationEmailFrom => "notification_email_from",
            Keyword::LvsId => "lvs_id",
            Keyword::SmtpServer => "smtp_server",
            Keyword::SmtpConnectTimeout => "smtp_connect_timeout",
            Keyword::VirtualServer => "virtual_server",
            Keyword::DelayLoop => "delay_loop",
            Keyword::LbAlgo => "lb_algo",
            Keyword::LbKind => "lb_kind",
            Keyword::NatMask => "nat_mask",
            Keyword::PersistenceTimeout => "persistence_timeout",
            Keyword::Protocol => "protocol",
            Keyword::SorryServer => "sorry_server",
            Keyword::RealServer => "real_server",
            Keyword::Weight => "weight",
            Keyword::ConnectTimeout => "connect_timeout",
            Keyword::Url => "url",
            Keyword::Path => "path",
            Keyword::Digest => "digest",
            Keyword::NbGetRetry => "nb_get_retry",
            Keyword::DelayBeforeRetry => "delay_before_retry",
            Keyword::IcmpCheck => "ICMP_CHECK",
            Keyword::TcpCheck => "TCP_CHECK",
            Keyword::HttpGet => "HTTP_GET",
            Keyword::SslGet => "SSL_GET",
            Keyword::LdapGet => "LDAP_GET",
            Keyword::Unknown => return None,
        };
        Some(word)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(word) => f.write_str(word),
            None => f.write_str("<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trips() {
        for keyword in Keyword::ALL {
            let word = keyword.as_str().unwrap();
            assert_eq!(Keyword::classify(word), keyword, "word {:?}", word);
        }
    }

    #[test]
    fn test_braces_are_keywords() {
        assert_eq!(Keyword::classify("{"), Keyword::BlockOpen);
        assert_eq!(Keyword::classify("}"), Keyword::BlockClose);
        assert_eq!(Keyword::classify("{}"), Keyword::Unknown);
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        assert_eq!(Keyword::classify("tcp_check"), Keyword::Unknown);
        assert_eq!(Keyword::classify("Virtual_server"), Keyword::Unknown);
        assert_eq!(Keyword::classify("virtual"), Keyword::Unknown);
        assert_eq!(Keyword::classify("virtual_servers"), Keyword::Unknown);
        assert_eq!(Keyword::classify(""), Keyword::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(Keyword::TcpCheck.to_string(), "TCP_CHECK");
        assert_eq!(Keyword::Unknown.to_string(), "<unknown>");
    }
}
