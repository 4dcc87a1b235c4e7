//! Server pool model
//!
//! These types are the in-memory form of a keepalived-style configuration.
//! A [`Configuration`] owns everything below it: the tree has no shared or
//! back references, so a built configuration can be handed to other threads
//! and read without locking.

use crate::config::store::{Keyed, ServerList};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Inline-first string used for bounded text fields
pub type Text = SmartString<LazyCompact>;

/// Maximum length, in bytes, of each bounded text field
pub mod limits {
    pub const LVS_ID: usize = 20;
    pub const EMAIL: usize = 64;
    pub const SCHEDULER: usize = 8;
    pub const PERSISTENCE_TIMEOUT: usize = 8;
    pub const URL_PATH: usize = 100;
    /// Hex MD5 digest
    pub const DIGEST: usize = 32;
}

/// Build a bounded text value, rejecting anything longer than `max` bytes.
pub fn bounded_text(field: &'static str, value: &str, max: usize) -> Result<Text> {
    if value.len() > max {
        return Err(Error::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(Text::from(value))
}

/// Root of the server pool model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Identifier of this load balancer instance
    #[serde(default)]
    pub lvs_id: Text,

    /// SMTP relay used for notifications
    #[serde(default = "unspecified")]
    pub smtp_server: Ipv4Addr,

    /// SMTP connect timeout in seconds
    #[serde(default)]
    pub smtp_connect_timeout: u32,

    /// Sender address of notifications
    #[serde(default)]
    pub email_from: Text,

    /// Notification recipients, in declaration order
    #[serde(default)]
    pub notification_emails: Vec<EmailAddress>,

    /// Virtual servers, unique by address and port
    #[serde(default)]
    pub virtual_servers: ServerList<VirtualServer>,
}

fn unspecified() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            lvs_id: Text::new(),
            smtp_server: Ipv4Addr::UNSPECIFIED,
            smtp_connect_timeout: 0,
            email_from: Text::new(),
            notification_emails: Vec::new(),
            virtual_servers: ServerList::new(),
        }
    }
}

/// A notification recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(pub Text);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address and port identifying a server inside its parent list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerKey {
    pub address: Ipv4Addr,
    pub port: u16,
}

impl ServerKey {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self { address, port }
    }

    /// Port in network byte order, as the kernel IPVS interface expects it
    pub fn port_be(&self) -> u16 {
        self.port.to_be()
    }

    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }
}

impl fmt::Display for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Load-balancing forwarding method
///
/// Only masquerading is supported. Direct routing and tunneling are still
/// accepted in configuration files but are treated as NAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LbKind {
    #[default]
    Nat,
}

impl LbKind {
    pub fn from_word(_word: &str) -> Self {
        LbKind::Nat
    }
}

impl fmt::Display for LbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LbKind::Nat => f.write_str("NAT"),
        }
    }
}

/// Transport protocol of a virtual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
    #[default]
    Udp,
}

impl Protocol {
    /// `TCP` selects TCP, every other word selects UDP.
    pub fn from_word(word: &str) -> Self {
        if word == "TCP" { Protocol::Tcp } else { Protocol::Udp }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("TCP"),
            Protocol::Udp => f.write_str("UDP"),
        }
    }
}

/// A published load-balanced endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualServer {
    #[serde(flatten)]
    pub key: ServerKey,

    /// Health-check polling interval in seconds
    #[serde(default)]
    pub delay_loop: u32,

    /// IPVS scheduler name (`rr`, `wlc`, ...)
    #[serde(default)]
    pub scheduler: Text,

    #[serde(default)]
    pub lb_kind: LbKind,

    #[serde(default = "unspecified")]
    pub nat_mask: Ipv4Addr,

    #[serde(default)]
    pub persistence_timeout: Text,

    #[serde(default)]
    pub protocol: Protocol,

    /// Fallback target used when every real server is down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorry_server: Option<SorryServer>,

    #[serde(default)]
    pub real_servers: ServerList<RealServer>,
}

impl VirtualServer {
    pub fn new(key: ServerKey) -> Self {
        Self {
            key,
            delay_loop: 0,
            scheduler: Text::new(),
            lb_kind: LbKind::Nat,
            nat_mask: Ipv4Addr::UNSPECIFIED,
            persistence_timeout: Text::new(),
            protocol: Protocol::Udp,
            sorry_server: None,
            real_servers: ServerList::new(),
        }
    }
}

impl Keyed for VirtualServer {
    fn key(&self) -> ServerKey {
        self.key
    }
}

/// A backend behind a virtual server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealServer {
    #[serde(flatten)]
    pub key: ServerKey,

    #[serde(default)]
    pub weight: u32,

    /// Liveness as last seen by the health-check engine
    #[serde(default = "alive")]
    pub alive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HealthCheckMethod>,
}

fn alive() -> bool {
    true
}

impl RealServer {
    pub fn new(key: ServerKey) -> Self {
        Self {
            key,
            weight: 0,
            alive: true,
            method: None,
        }
    }
}

impl Keyed for RealServer {
    fn key(&self) -> ServerKey {
        self.key
    }
}

/// Fallback backend of a virtual server, never health-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorryServer {
    #[serde(flatten)]
    pub key: ServerKey,
}

impl SorryServer {
    pub const WEIGHT: u32 = 1;

    pub fn new(key: ServerKey) -> Self {
        Self { key }
    }

    pub fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    pub fn alive(&self) -> bool {
        false
    }
}

/// How a real server's liveness is probed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthCheckMethod {
    Icmp,
    Tcp {
        /// Connect timeout in seconds
        #[serde(default)]
        connect_timeout: u32,
    },
    HttpGet {
        #[serde(default)]
        connect_timeout: u32,
        #[serde(default)]
        check: HttpGetCheck,
    },
    /// Recognized but not implemented by the checker
    SslGet,
    /// Recognized but not implemented by the checker
    LdapGet,
}

impl HealthCheckMethod {
    /// Configuration keyword of this method
    pub fn kind(&self) -> &'static str {
        match self {
            HealthCheckMethod::Icmp => "ICMP_CHECK",
            HealthCheckMethod::Tcp { .. } => "TCP_CHECK",
            HealthCheckMethod::HttpGet { .. } => "HTTP_GET",
            HealthCheckMethod::SslGet => "SSL_GET",
            HealthCheckMethod::LdapGet => "LDAP_GET",
        }
    }

    pub fn connect_timeout(&self) -> Option<u32> {
        match self {
            HealthCheckMethod::Tcp { connect_timeout }
            | HealthCheckMethod::HttpGet { connect_timeout, .. } => Some(*connect_timeout),
            _ => None,
        }
    }

    pub fn http_get(&self) -> Option<&HttpGetCheck> {
        match self {
            HealthCheckMethod::HttpGet { check, .. } => Some(check),
            _ => None,
        }
    }
}

/// HTTP GET probe settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpGetCheck {
    #[serde(default)]
    pub nb_get_retry: u32,

    /// Seconds to wait between two retries
    #[serde(default)]
    pub delay_before_retry: u32,

    #[serde(default)]
    pub urls: Vec<Url>,
}

/// A probed URL and the digest its body must hash to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    #[serde(default)]
    pub path: Text,
    #[serde(default)]
    pub digest: Text,
}
