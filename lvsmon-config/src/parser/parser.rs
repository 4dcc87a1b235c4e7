//! keepalived.conf parser
//!
//! Recursive descent over the word stream. Every block parser has the same
//! shape: pull the next word, stop at `}`, hand field keywords their value
//! word, recurse on sub-block keywords and skip everything else (a stray `{`
//! included). Each call frame checks its own terminator, so running out of
//! input inside a block is reported instead of silently accepted.

use crate::parser::diagnostic::{Diagnostic, DiagnosticKind};
use crate::parser::keyword::Keyword;
use crate::parser::lexer::{LexError, Location, Tokenizer, Word};
use lvsmon_core::config::{
    Configuration, EmailAddress, HealthCheckMethod, HttpGetCheck, Insert, LbKind, Protocol,
    RealServer, ServerKey, SorryServer, Text, Url, VirtualServer, bounded_text, limits,
};
use std::iter::Peekable;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Parser error types
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Unclosed {block} block opened at position {}", .opened.start)]
    UnclosedBlock { block: Keyword, opened: Location },

    #[error("Unexpected end of input at position {position}, expected {expected}")]
    UnexpectedEof {
        position: usize,
        expected: &'static str,
    },

    #[error("Unexpected '}}' at position {}, no block is open", .span.start)]
    UnexpectedBlockClose { span: Location },
}

impl ParseError {
    /// Source span the error points at, when there is one
    pub fn span(&self) -> Option<Location> {
        match self {
            ParseError::Lex(LexError::UnexpectedChar { position }) => Some(Location {
                start: *position,
                end: *position + 1,
            }),
            ParseError::UnclosedBlock { opened, .. } => Some(*opened),
            ParseError::UnexpectedEof { position, .. } => Some(Location {
                start: *position,
                end: *position,
            }),
            ParseError::UnexpectedBlockClose { span } => Some(*span),
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// A configuration together with the non-fatal conditions met building it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub config: Configuration,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parser state
pub struct Parser<'src> {
    words: Peekable<Tokenizer<'src>>,
    /// Byte offset just past the last word handed out
    offset: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// Create a new parser over source text
    pub fn new(source: &'src str) -> Self {
        Self {
            words: Tokenizer::new(source).peekable(),
            offset: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole input
    pub fn parse(mut self) -> ParseResult<Parsed> {
        let mut config = Configuration::default();

        while let Some(word) = self.next_word()? {
            match Keyword::classify(word.value) {
                Keyword::GlobalDefs => self.parse_global_defs(&mut config, word.span)?,
                Keyword::VirtualServer => self.parse_virtual_server(&mut config, word.span)?,
                Keyword::BlockClose => {
                    return Err(ParseError::UnexpectedBlockClose { span: word.span });
                }
                _ => {
                    tracing::trace!(word = word.value, position = word.span.start, "Skipping word");
                }
            }
        }

        Ok(Parsed {
            config,
            diagnostics: self.diagnostics,
        })
    }

    // ========================================
    // global_defs
    // ========================================

    fn parse_global_defs(&mut self, config: &mut Configuration, at: Location) -> ParseResult<()> {
        while let Some((keyword, word)) = self.block_word(Keyword::GlobalDefs, at)? {
            match keyword {
                Keyword::LvsId => self.set_text(&mut config.lvs_id, "lvs_id", limits::LVS_ID)?,
                Keyword::SmtpServer => self.set_ipv4(&mut config.smtp_server, "smtp_server")?,
                Keyword::SmtpConnectTimeout => {
                    self.set_integer(&mut config.smtp_connect_timeout, "smtp_connect_timeout")?
                }
                Keyword::NotificationEmailFrom => {
                    self.set_text(&mut config.email_from, "notification_email_from", limits::EMAIL)?
                }
                Keyword::NotificationEmail => self.parse_email_list(config, word.span)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Every word other than a brace is one address.
    fn parse_email_list(&mut self, config: &mut Configuration, at: Location) -> ParseResult<()> {
        while let Some((keyword, word)) = self.block_word(Keyword::NotificationEmail, at)? {
            if keyword == Keyword::BlockOpen {
                continue;
            }
            if let Some(addr) = self.bounded(&word, "notification_email", limits::EMAIL) {
                config.notification_emails.push(EmailAddress(addr));
            }
        }
        Ok(())
    }

    // ========================================
    // virtual_server
    // ========================================

    fn parse_virtual_server(&mut self, config: &mut Configuration, at: Location) -> ParseResult<()> {
        let key = self.server_key("virtual_server")?;
        let mut vs = VirtualServer::new(key);

        while let Some((keyword, word)) = self.block_word(Keyword::VirtualServer, at)? {
            match keyword {
                Keyword::DelayLoop => self.set_integer(&mut vs.delay_loop, "delay_loop")?,
                Keyword::LbAlgo => self.set_text(&mut vs.scheduler, "lb_algo", limits::SCHEDULER)?,
                Keyword::LbKind => {
                    let kind = self.value("lb_kind")?;
                    vs.lb_kind = LbKind::from_word(kind.value);
                }
                Keyword::NatMask => self.set_ipv4(&mut vs.nat_mask, "nat_mask")?,
                Keyword::PersistenceTimeout => self.set_text(
                    &mut vs.persistence_timeout,
                    "persistence_timeout",
                    limits::PERSISTENCE_TIMEOUT,
                )?,
                Keyword::Protocol => {
                    let protocol = self.value("protocol")?;
                    vs.protocol = Protocol::from_word(protocol.value);
                }
                Keyword::SorryServer => {
                    let key = self.server_key("sorry_server")?;
                    vs.sorry_server = Some(SorryServer::new(key));
                }
                Keyword::RealServer => self.parse_real_server(&mut vs, word.span)?,
                _ => {}
            }
        }

        if let Insert::Duplicate(dropped) = config.virtual_servers.insert_unique(vs) {
            tracing::debug!(key = %dropped.key, position = at.start, "Duplicate virtual server dropped");
        }
        Ok(())
    }

    // ========================================
    // real_server
    // ========================================

    fn parse_real_server(&mut self, vs: &mut VirtualServer, at: Location) -> ParseResult<()> {
        let key = self.server_key("real_server")?;
        let mut rs = RealServer::new(key);

        while let Some((keyword, word)) = self.block_word(Keyword::RealServer, at)? {
            match keyword {
                Keyword::Weight => self.set_integer(&mut rs.weight, "weight")?,
                // ICMP_CHECK takes no block
                Keyword::IcmpCheck => rs.method = Some(HealthCheckMethod::Icmp),
                Keyword::TcpCheck => rs.method = Some(self.parse_tcp_check(word.span)?),
                Keyword::HttpGet => rs.method = Some(self.parse_http_get(word.span)?),
                Keyword::SslGet => {
                    self.skip_unimplemented(keyword, word.span)?;
                    rs.method = Some(HealthCheckMethod::SslGet);
                }
                Keyword::LdapGet => {
                    self.skip_unimplemented(keyword, word.span)?;
                    rs.method = Some(HealthCheckMethod::LdapGet);
                }
                _ => {}
            }
        }

        if let Insert::Duplicate(dropped) = vs.real_servers.insert_unique(rs) {
            tracing::debug!(
                virtual_server = %vs.key,
                key = %dropped.key,
                position = at.start,
                "Duplicate real server dropped"
            );
        }
        Ok(())
    }

    // ========================================
    // Health checks
    // ========================================

    fn parse_tcp_check(&mut self, at: Location) -> ParseResult<HealthCheckMethod> {
        let mut connect_timeout = 0;
        while let Some((keyword, _)) = self.block_word(Keyword::TcpCheck, at)? {
            if keyword == Keyword::ConnectTimeout {
                self.set_integer(&mut connect_timeout, "connect_timeout")?;
            }
        }
        Ok(HealthCheckMethod::Tcp { connect_timeout })
    }

    fn parse_http_get(&mut self, at: Location) -> ParseResult<HealthCheckMethod> {
        let mut connect_timeout = 0;
        let mut check = HttpGetCheck::default();

        while let Some((keyword, word)) = self.block_word(Keyword::HttpGet, at)? {
            match keyword {
                Keyword::ConnectTimeout => self.set_integer(&mut connect_timeout, "connect_timeout")?,
                Keyword::NbGetRetry => self.set_integer(&mut check.nb_get_retry, "nb_get_retry")?,
                Keyword::DelayBeforeRetry => {
                    self.set_integer(&mut check.delay_before_retry, "delay_before_retry")?
                }
                Keyword::Url => check.urls.push(self.parse_url(word.span)?),
                _ => {}
            }
        }

        Ok(HealthCheckMethod::HttpGet {
            connect_timeout,
            check,
        })
    }

    fn parse_url(&mut self, at: Location) -> ParseResult<Url> {
        let mut url = Url::default();
        while let Some((keyword, _)) = self.block_word(Keyword::Url, at)? {
            match keyword {
                Keyword::Path => self.set_text(&mut url.path, "path", limits::URL_PATH)?,
                Keyword::Digest => self.set_text(&mut url.digest, "digest", limits::DIGEST)?,
                _ => {}
            }
        }
        Ok(url)
    }

    /// Consume the block of a check the engine cannot run, nested blocks included.
    ///
    /// A bare keyword with no block consumes nothing.
    fn skip_unimplemented(&mut self, method: Keyword, at: Location) -> ParseResult<()> {
        self.report(
            DiagnosticKind::Unimplemented {
                method: method.as_str().unwrap_or("unknown"),
            },
            at,
        );
        if !self.peek_is(Keyword::BlockOpen) {
            return Ok(());
        }

        let mut depth = 0usize;
        loop {
            match self.block_word(method, at)? {
                Some((Keyword::BlockOpen, _)) => depth += 1,
                Some(_) => {}
                None if depth > 1 => depth -= 1,
                None => break,
            }
        }
        Ok(())
    }

    // ========================================
    // Values
    // ========================================

    /// Read the positional `address port` pair following a server keyword
    fn server_key(&mut self, block: &'static str) -> ParseResult<ServerKey> {
        let word = self.value(block)?;
        let address: Option<Ipv4Addr> =
            self.parse_or_report(&word, block, "a dotted-quad IPv4 address");
        let word = self.value(block)?;
        let port: Option<u16> = self.parse_or_report(&word, block, "a port number");

        Ok(ServerKey::new(
            address.unwrap_or(Ipv4Addr::UNSPECIFIED),
            port.unwrap_or(0),
        ))
    }

    fn set_integer(&mut self, slot: &mut u32, field: &'static str) -> ParseResult<()> {
        let word = self.value(field)?;
        if let Some(value) = self.parse_or_report(&word, field, "an unsigned integer") {
            *slot = value;
        }
        Ok(())
    }

    fn set_ipv4(&mut self, slot: &mut Ipv4Addr, field: &'static str) -> ParseResult<()> {
        let word = self.value(field)?;
        if let Some(addr) = self.parse_or_report(&word, field, "a dotted-quad IPv4 address") {
            *slot = addr;
        }
        Ok(())
    }

    fn set_text(&mut self, slot: &mut Text, field: &'static str, max: usize) -> ParseResult<()> {
        let word = self.value(field)?;
        if let Some(text) = self.bounded(&word, field, max) {
            *slot = text;
        }
        Ok(())
    }

    fn parse_or_report<T: FromStr>(
        &mut self,
        word: &Word<'src>,
        field: &'static str,
        expected: &'static str,
    ) -> Option<T> {
        match word.value.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.report(
                    DiagnosticKind::InvalidValue {
                        field,
                        value: word.value.to_string(),
                        expected,
                    },
                    word.span,
                );
                None
            }
        }
    }

    fn bounded(&mut self, word: &Word<'src>, field: &'static str, max: usize) -> Option<Text> {
        match bounded_text(field, word.value, max) {
            Ok(text) => Some(text),
            Err(_) => {
                self.report(
                    DiagnosticKind::FieldTooLong {
                        field,
                        len: word.value.len(),
                        max,
                    },
                    word.span,
                );
                None
            }
        }
    }

    fn report(&mut self, kind: DiagnosticKind, span: Location) {
        tracing::warn!(position = span.start, "{}", kind);
        self.diagnostics.push(Diagnostic::new(kind, span));
    }

    // ========================================
    // Word utilities
    // ========================================

    fn next_word(&mut self) -> ParseResult<Option<Word<'src>>> {
        let word = self.words.next().transpose()?;
        if let Some(word) = &word {
            self.offset = word.span.end;
        }
        Ok(word)
    }

    fn peek_is(&mut self, keyword: Keyword) -> bool {
        matches!(self.words.peek(), Some(Ok(word)) if Keyword::classify(word.value) == keyword)
    }

    /// Next word inside `block`, or `None` once its closing brace is reached
    fn block_word(
        &mut self,
        block: Keyword,
        opened: Location,
    ) -> ParseResult<Option<(Keyword, Word<'src>)>> {
        let Some(word) = self.next_word()? else {
            return Err(ParseError::UnclosedBlock { block, opened });
        };
        match Keyword::classify(word.value) {
            Keyword::BlockClose => Ok(None),
            keyword => Ok(Some((keyword, word))),
        }
    }

    /// The word holding a field's value
    fn value(&mut self, expected: &'static str) -> ParseResult<Word<'src>> {
        match self.next_word()? {
            Some(word) => Ok(word),
            None => Err(ParseError::UnexpectedEof {
                position: self.offset,
                expected,
            }),
        }
    }
}

/// Parse a configuration source string
pub fn parse(source: &str) -> ParseResult<Parsed> {
    Parser::new(source).parse()
}
