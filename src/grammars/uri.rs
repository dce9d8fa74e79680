//! RFC 3986 URI references with component capture.
//!
//! ```text
//! URI-reference = URI / relative-ref
//! URI           = scheme ":" hier-part [ "?" query ] [ "#" fragment ]
//! relative-ref  = relative-part [ "?" query ] [ "#" fragment ]
//! authority     = [ userinfo "@" ] host [ ":" port ]
//! host          = IP-literal / IPv4address / reg-name
//! ```
//!
//! Component boundaries are recorded by a callback on the row that matched
//! the component. A capture made inside an alternative that later fails
//! (a scheme-looking prefix of a relative reference, say) is discarded
//! along with the attempt.

use crate::core::{Cursor, Table};
use crate::engine::{Engine, RunError};
use crate::table;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::Range;

const ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGIT: &[u8] = b"0123456789";
const NONZERO: &[u8] = b"123456789";
const HEXDIG: &[u8] = b"0123456789ABCDEFabcdef";
const SCHEME_CHAR: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-.";
const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
const SUB_DELIMS: &[u8] = b"!$&'()*+,;=";

/// How the host of an authority was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// Bracketed IPv6 or IPvFuture literal.
    IpLiteral,
    Ipv4,
    RegName,
}

/// Argument attached to capturing rows: which component was matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Scheme,
    Userinfo,
    Host(HostKind),
    Port,
    Path,
    Query,
    Fragment,
}

static SCHEME_SPAN: Component = Component::Scheme;
static USERINFO_SPAN: Component = Component::Userinfo;
static IP_LITERAL_SPAN: Component = Component::Host(HostKind::IpLiteral);
static IPV4_SPAN: Component = Component::Host(HostKind::Ipv4);
static REG_NAME_SPAN: Component = Component::Host(HostKind::RegName);
static PORT_SPAN: Component = Component::Port;
static PATH_SPAN: Component = Component::Path;
static QUERY_SPAN: Component = Component::Query;
static FRAGMENT_SPAN: Component = Component::Fragment;

/// Byte ranges of the components seen so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UriSpans {
    pub scheme: Option<Range<usize>>,
    pub userinfo: Option<Range<usize>>,
    pub host: Option<Range<usize>>,
    pub host_kind: Option<HostKind>,
    pub port: Option<Range<usize>>,
    pub path: Option<Range<usize>>,
    pub query: Option<Range<usize>>,
    pub fragment: Option<Range<usize>>,
}

/// Every table of the grammar shares this context and argument type.
pub type Rule = Table<UriSpans, Component>;

fn capture(cursor: Cursor<'_>, len: usize, spans: &mut UriSpans, component: Option<&'static Component>) {
    let span = cursor.offset()..cursor.offset() + len;
    match component {
        Some(Component::Scheme) => spans.scheme = Some(span),
        Some(Component::Userinfo) => spans.userinfo = Some(span),
        Some(Component::Host(kind)) => {
            spans.host = Some(span);
            spans.host_kind = Some(*kind);
        }
        Some(Component::Port) => spans.port = Some(span),
        Some(Component::Path) => spans.path = Some(span),
        Some(Component::Query) => spans.query = Some(span),
        Some(Component::Fragment) => spans.fragment = Some(span),
        None => {}
    }
}

/// Reads the longest run of address characters and accepts it if it is
/// a valid IPv6 address.
fn ipv6(cursor: Cursor<'_>, _: &mut UriSpans, _: Option<&'static Component>) -> Option<usize> {
    let len = cursor
        .rest()
        .iter()
        .take_while(|b| b.is_ascii_hexdigit() || matches!(**b, b':' | b'.'))
        .count();
    let text = std::str::from_utf8(cursor.take(len)?).ok()?;
    text.parse::<Ipv6Addr>().ok().map(|_| len)
}

/// Zero-width check that the host ends here.
fn host_ends(cursor: Cursor<'_>, _: &mut UriSpans, _: Option<&'static Component>) -> Option<usize> {
    match cursor.peek() {
        None | Some(b':' | b'/' | b'?' | b'#') => Some(0),
        Some(_) => None,
    }
}

table! {
    pub static PCT_ENCODED: Rule = "pct-encoded" {
        0 => exact(b"%").to(1),
        1 => one_of(HEXDIG).to(2),
        2 => one_of(HEXDIG).accept(),
    };

    pub static PCHAR: Rule = "pchar" {
        0 => one_of(UNRESERVED).accept(),
        0 => automaton(&PCT_ENCODED).accept(),
        0 => one_of(SUB_DELIMS).accept(),
        0 => one_of(b":@").accept(),
    };

    pub static QUERY: Rule = "query" {
        0 => automaton(&PCHAR).to(0).accept(),
        0 => one_of(b"/?").to(0).accept(),
        0 => epsilon().accept(),
    };

    pub static FRAGMENT: Rule = "fragment" {
        0 => automaton(&PCHAR).to(0).accept(),
        0 => one_of(b"/?").to(0).accept(),
        0 => epsilon().accept(),
    };

    pub static SEGMENT: Rule = "segment" {
        0 => automaton(&PCHAR).to(0).accept(),
        0 => epsilon().accept(),
    };

    pub static SEGMENT_NZ: Rule = "segment-nz" {
        0 => automaton(&PCHAR).to(1).accept(),
        1 => automaton(&PCHAR).to(1).accept(),
    };

    /// A non-empty segment without colons.
    pub static SEGMENT_NZ_NC: Rule = "segment-nz-nc" {
        0 => one_of(UNRESERVED).to(1).accept(),
        0 => automaton(&PCT_ENCODED).to(1).accept(),
        0 => one_of(SUB_DELIMS).to(1).accept(),
        0 => exact(b"@").to(1).accept(),
        1 => one_of(UNRESERVED).to(1).accept(),
        1 => automaton(&PCT_ENCODED).to(1).accept(),
        1 => one_of(SUB_DELIMS).to(1).accept(),
        1 => exact(b"@").to(1).accept(),
    };

    pub static PATH_ABEMPTY: Rule = "path-abempty" {
        0 => exact(b"/").to(1),
        0 => epsilon().accept(),
        1 => automaton(&SEGMENT).to(0).accept(),
    };

    pub static PATH_ABSOLUTE: Rule = "path-absolute" {
        0 => exact(b"/").to(1).accept(),
        1 => automaton(&SEGMENT_NZ).to(2).accept(),
        2 => exact(b"/").to(3),
        3 => automaton(&SEGMENT).to(2).accept(),
    };

    pub static PATH_NOSCHEME: Rule = "path-noscheme" {
        0 => automaton(&SEGMENT_NZ_NC).to(1).accept(),
        1 => exact(b"/").to(2),
        2 => automaton(&SEGMENT).to(1).accept(),
    };

    pub static PATH_ROOTLESS: Rule = "path-rootless" {
        0 => automaton(&SEGMENT_NZ).to(1).accept(),
        1 => exact(b"/").to(2),
        2 => automaton(&SEGMENT).to(1).accept(),
    };

    pub static PATH_EMPTY: Rule = "path-empty" {
        0 => epsilon().accept(),
    };

    pub static OCTET_250: Rule = "dec-octet-250" {
        0 => exact(b"25").to(1),
        1 => one_of(b"012345").accept(),
    };

    pub static OCTET_200: Rule = "dec-octet-200" {
        0 => exact(b"2").to(1),
        1 => one_of(b"01234").to(2),
        2 => one_of(DIGIT).accept(),
    };

    pub static OCTET_100: Rule = "dec-octet-100" {
        0 => exact(b"1").to(1),
        1 => one_of(DIGIT).to(2),
        2 => one_of(DIGIT).accept(),
    };

    pub static OCTET_10: Rule = "dec-octet-10" {
        0 => one_of(NONZERO).to(1),
        1 => one_of(DIGIT).accept(),
    };

    /// 0 to 255 without leading zeros, longest form first.
    pub static DEC_OCTET: Rule = "dec-octet" {
        0 => automaton(&OCTET_250).accept(),
        0 => automaton(&OCTET_200).accept(),
        0 => automaton(&OCTET_100).accept(),
        0 => automaton(&OCTET_10).accept(),
        0 => one_of(DIGIT).accept(),
    };

    pub static IPV4ADDRESS: Rule = "ipv4address" {
        0 => automaton(&DEC_OCTET).to(1),
        1 => exact(b".").to(2),
        2 => automaton(&DEC_OCTET).to(3),
        3 => exact(b".").to(4),
        4 => automaton(&DEC_OCTET).to(5),
        5 => exact(b".").to(6),
        6 => automaton(&DEC_OCTET).accept(),
    };

    pub static IPVFUTURE: Rule = "ipvfuture" {
        0 => one_of(b"vV").to(1),
        1 => one_of(HEXDIG).to(2),
        2 => one_of(HEXDIG).to(2),
        2 => exact(b".").to(3),
        3 => one_of(UNRESERVED).to(4).accept(),
        3 => one_of(SUB_DELIMS).to(4).accept(),
        3 => exact(b":").to(4).accept(),
        4 => one_of(UNRESERVED).to(4).accept(),
        4 => one_of(SUB_DELIMS).to(4).accept(),
        4 => exact(b":").to(4).accept(),
    };

    pub static IP_LITERAL: Rule = "ip-literal" {
        0 => exact(b"[").to(1),
        1 => function(ipv6).to(2).label("ipv6address"),
        1 => automaton(&IPVFUTURE).to(2),
        2 => exact(b"]").accept(),
    };

    /// An IPv4 address that makes up the whole host.
    pub static IPV4_HOST: Rule = "ipv4-host" {
        0 => automaton(&IPV4ADDRESS).to(1),
        1 => function(host_ends).accept(),
    };

    pub static REG_NAME: Rule = "reg-name" {
        0 => one_of(UNRESERVED).to(0).accept(),
        0 => automaton(&PCT_ENCODED).to(0).accept(),
        0 => one_of(SUB_DELIMS).to(0).accept(),
        0 => epsilon().accept(),
    };

    pub static HOST: Rule = "host" {
        0 => automaton(&IP_LITERAL).accept().then(capture).arg(&IP_LITERAL_SPAN),
        0 => automaton(&IPV4_HOST).accept().then(capture).arg(&IPV4_SPAN),
        0 => automaton(&REG_NAME).accept().then(capture).arg(&REG_NAME_SPAN),
    };

    pub static PORT: Rule = "port" {
        0 => one_of(DIGIT).to(0).accept(),
        0 => epsilon().accept(),
    };

    pub static USERINFO: Rule = "userinfo" {
        0 => one_of(UNRESERVED).to(0).accept(),
        0 => automaton(&PCT_ENCODED).to(0).accept(),
        0 => one_of(SUB_DELIMS).to(0).accept(),
        0 => exact(b":").to(0).accept(),
        0 => epsilon().accept(),
    };

    /// `userinfo "@"`
    pub static USERINFO_AT: Rule = "userinfo-at" {
        0 => automaton(&USERINFO).to(1).then(capture).arg(&USERINFO_SPAN),
        1 => exact(b"@").accept(),
    };

    /// `":" port`
    pub static PORT_SUFFIX: Rule = "port-suffix" {
        0 => exact(b":").to(1),
        1 => automaton(&PORT).accept().then(capture).arg(&PORT_SPAN),
    };

    pub static AUTHORITY: Rule = "authority" {
        0 => automaton(&USERINFO_AT).to(1).or_else(1),
        1 => automaton(&HOST).to(2).accept(),
        2 => automaton(&PORT_SUFFIX).accept(),
    };

    pub static SCHEME: Rule = "scheme" {
        0 => one_of(ALPHA).to(1).accept(),
        1 => one_of(SCHEME_CHAR).to(1).accept(),
    };

    /// `"?" query`
    pub static QUERY_PART: Rule = "query-part" {
        0 => exact(b"?").to(1),
        1 => automaton(&QUERY).accept().then(capture).arg(&QUERY_SPAN),
    };

    /// `"#" fragment`
    pub static FRAGMENT_PART: Rule = "fragment-part" {
        0 => exact(b"#").to(1),
        1 => automaton(&FRAGMENT).accept().then(capture).arg(&FRAGMENT_SPAN),
    };

    pub static HIER_PART: Rule = "hier-part" {
        0 => exact(b"//").to(1),
        0 => automaton(&PATH_ABSOLUTE).accept().then(capture).arg(&PATH_SPAN),
        0 => automaton(&PATH_ROOTLESS).accept().then(capture).arg(&PATH_SPAN),
        0 => automaton(&PATH_EMPTY).accept().then(capture).arg(&PATH_SPAN),
        1 => automaton(&AUTHORITY).to(2),
        2 => automaton(&PATH_ABEMPTY).accept().then(capture).arg(&PATH_SPAN),
    };

    pub static RELATIVE_PART: Rule = "relative-part" {
        0 => exact(b"//").to(1),
        0 => automaton(&PATH_ABSOLUTE).accept().then(capture).arg(&PATH_SPAN),
        0 => automaton(&PATH_NOSCHEME).accept().then(capture).arg(&PATH_SPAN),
        0 => automaton(&PATH_EMPTY).accept().then(capture).arg(&PATH_SPAN),
        1 => automaton(&AUTHORITY).to(2),
        2 => automaton(&PATH_ABEMPTY).accept().then(capture).arg(&PATH_SPAN),
    };

    pub static URI: Rule = "uri" {
        0 => automaton(&SCHEME).to(1).then(capture).arg(&SCHEME_SPAN).label("scheme"),
        1 => exact(b":").to(2),
        2 => automaton(&HIER_PART).to(3).accept().label("hier-part"),
        3 => automaton(&QUERY_PART).to(4).or_else(4).accept(),
        4 => automaton(&FRAGMENT_PART).accept(),
    };

    pub static RELATIVE_REF: Rule = "relative-ref" {
        0 => automaton(&RELATIVE_PART).to(1).accept().label("relative-part"),
        1 => automaton(&QUERY_PART).to(2).or_else(2).accept(),
        2 => automaton(&FRAGMENT_PART).accept(),
    };

    pub static URI_REFERENCE: Rule = "uri-reference" {
        0 => automaton(&URI).accept().label("uri"),
        0 => automaton(&RELATIVE_REF).accept().label("relative ref"),
    };
}

/// A parsed URI reference, borrowing its components from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UriRef<'a> {
    pub scheme: Option<&'a str>,
    pub userinfo: Option<&'a str>,
    pub host: Option<&'a str>,
    pub host_kind: Option<HostKind>,
    pub port: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
    /// Bytes of input the reference occupied.
    pub consumed: usize,
}

impl<'a> UriRef<'a> {
    fn from_spans(input: &'a str, spans: UriSpans, consumed: usize) -> Self {
        let slice = |span: Option<Range<usize>>| span.and_then(|range| input.get(range));
        Self {
            scheme: slice(spans.scheme),
            userinfo: slice(spans.userinfo),
            host: slice(spans.host),
            host_kind: spans.host_kind,
            port: slice(spans.port),
            path: slice(spans.path).unwrap_or_default(),
            query: slice(spans.query),
            fragment: slice(spans.fragment),
            consumed,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }

    /// The port as a number, if present and in range.
    pub fn port_number(&self) -> Option<u16> {
        self.port?.parse().ok()
    }

    /// The host as an IP address, for IPv4 hosts and IPv6 literals.
    pub fn ip(&self) -> Option<IpAddr> {
        let host = self.host?;
        match self.host_kind? {
            HostKind::Ipv4 => host.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
            HostKind::IpLiteral => host
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .and_then(|h| h.parse::<Ipv6Addr>().ok())
                .map(IpAddr::V6),
            HostKind::RegName => None,
        }
    }
}

/// Parse a URI reference at the start of `input`.
///
/// # Example
///
/// ```rust
/// use tablefsm::grammars::uri::{parse, HostKind};
///
/// let uri = parse("https://example.com:8443/docs?page=2#intro").unwrap();
/// assert_eq!(uri.scheme, Some("https"));
/// assert_eq!(uri.host, Some("example.com"));
/// assert_eq!(uri.host_kind, Some(HostKind::RegName));
/// assert_eq!(uri.port_number(), Some(8443));
/// assert_eq!(uri.path, "/docs");
/// assert_eq!(uri.query, Some("page=2"));
/// assert_eq!(uri.fragment, Some("intro"));
/// ```
pub fn parse(input: &str) -> Result<UriRef<'_>, RunError> {
    let mut spans = UriSpans::default();
    let mut cursor = Cursor::new(input.as_bytes());
    let consumed = Engine::cloning().run(&URI_REFERENCE, &mut cursor, &mut spans)?;
    Ok(UriRef::from_spans(input, spans, consumed))
}
