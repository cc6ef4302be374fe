use fancy_regex::Regex;
use hickory_proto::op::Query;
use hickory_proto::rr::{DNSClass, RecordType};
use std::net::Ipv4Addr;
use tracing::debug;
use wildcard_dns_domain::config::normalize_zone;
use wildcard_dns_domain::DomainError;

/// One decimal octet, 0-255, leading zeros allowed.
const OCTET: &str = "(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

/// Decides whether a question belongs to the wildcard zone and, if so, which
/// IPv4 address its leading labels spell out.
///
/// `10-0-0-1.int.example.com.` and `10.0.0.1.int.example.com.` both yield
/// `10.0.0.1`. Anything else in the zone (wrong group count, out-of-range
/// octets, extra labels) is simply not a match.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    zone: String,
    suffix: String,
    pattern: Regex,
}

impl WildcardMatcher {
    pub fn new(domain: &str) -> Result<Self, DomainError> {
        let zone = normalize_zone(domain);
        if zone.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "Wildcard domain '{}' is empty",
                domain
            )));
        }

        let expression = format!(
            r"^(?P<ip>{octet}(?:[.\-]{octet}){{3}})\.{zone}$",
            octet = OCTET,
            zone = fancy_regex::escape(&zone),
        );
        let pattern = Regex::new(&expression)
            .map_err(|e| DomainError::InvalidWildcardPattern(e.to_string()))?;

        let suffix = format!(".{}", zone);

        Ok(Self {
            zone,
            suffix,
            pattern,
        })
    }

    /// The zone in canonical form, always ending in `.`.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Only `IN A` questions under the zone are eligible.
    pub fn match_query(&self, query: &Query) -> Option<Ipv4Addr> {
        if query.query_class() != DNSClass::IN || query.query_type() != RecordType::A {
            return None;
        }
        self.match_name(&query.name().to_ascii())
    }

    pub fn match_name(&self, name: &str) -> Option<Ipv4Addr> {
        let mut name = name.to_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }

        if !name.ends_with(&self.suffix) {
            return None;
        }

        let captures = match self.pattern.captures(&name) {
            Ok(Some(captures)) => captures,
            Ok(None) => return None,
            Err(e) => {
                debug!(name = %name, error = %e, "Wildcard pattern evaluation failed");
                return None;
            }
        };

        let dotted = captures.name("ip")?.as_str().replace('-', ".");
        parse_dotted_quad(&dotted)
    }
}

fn parse_dotted_quad(dotted: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = dotted.split('.');

    for octet in octets.iter_mut() {
        *octet = parts.next()?.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(Ipv4Addr::from(octets))
}
