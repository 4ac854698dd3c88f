//! Host list parsing (`"PHXS@[20.0,99.9], AEFT"`).
use std::fmt;

/// Version range accepted when a host gives none, or `*`.
pub const ANY_VERSION: &str = "[0.0,99.9]";

/// Host application codes in canonical order; also what `*` expands to.
pub const KNOWN_HOSTS: [&str; 12] = [
    "PHXS", "IDSN", "AICY", "ILST", "PPRO", "PRLD", "AEFT", "FLPR", "AUDT", "DRWV", "MUST", "KBRG",
];

/// A host application the extension can load in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host application code, e.g. `PPRO`.
    pub name: String,
    /// Supported version range, verbatim from the host list.
    pub version_range: String,
}

impl Host {
    /// Create a host with an explicit version range.
    #[must_use]
    pub fn new(name: impl Into<String>, version_range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: version_range.into(),
        }
    }

    /// Whether `name` is one of [`KNOWN_HOSTS`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_HOSTS.contains(&self.name.as_str())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version_range)
    }
}

/// Parse a host specification into hosts, preserving order.
///
/// `*` expands to every known host. Otherwise the text is split on commas
/// outside `()` and `[]`, so `AEFT@[1.0,2.0]` stays a single token. A missing
/// or `*` version becomes [`ANY_VERSION`]. With more than one `@`, the text
/// between the first and second `@` is the version and the rest is dropped.
/// Blank tokens are skipped.
#[must_use]
pub fn parse_hosts(spec: &str) -> Vec<Host> {
    if spec.trim() == "*" {
        return KNOWN_HOSTS
            .iter()
            .map(|name| Host::new(*name, ANY_VERSION))
            .collect();
    }

    split_top_level(spec)
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Option<Host> {
    let mut parts = token.split('@');
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    let version = match parts.next().map(str::trim) {
        None | Some("" | "*") => ANY_VERSION,
        Some(range) => range,
    };
    Some(Host::new(name, version))
}

/// Split on commas at bracket depth zero.
fn split_top_level(spec: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in spec.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(spec.get(start..i).unwrap_or_default());
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(spec.get(start..).unwrap_or_default());
    tokens
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_expands_to_every_known_host() {
        let hosts = parse_hosts("*");
        assert_eq!(hosts.len(), 12);
        let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, KNOWN_HOSTS);
        assert!(hosts.iter().all(|h| h.version_range == ANY_VERSION));
    }

    #[test]
    fn plain_and_versioned_hosts() {
        let hosts = parse_hosts("Foo@1.0, Bar");
        assert_eq!(
            hosts,
            vec![Host::new("Foo", "1.0"), Host::new("Bar", "[0.0,99.9]")]
        );
    }

    #[test]
    fn commas_inside_ranges_do_not_split() {
        let hosts = parse_hosts("Foo@[1.0,2.0], Bar@(2.0,3.0]");
        assert_eq!(
            hosts,
            vec![Host::new("Foo", "[1.0,2.0]"), Host::new("Bar", "(2.0,3.0]")]
        );
    }

    #[test]
    fn star_version_means_any() {
        let hosts = parse_hosts("PPRO@*");
        assert_eq!(hosts, vec![Host::new("PPRO", ANY_VERSION)]);
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let hosts = parse_hosts("AEFT, PPRO, AEFT@2.0");
        let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["AEFT", "PPRO", "AEFT"]);
        assert_eq!(hosts[2].version_range, "2.0");
    }

    #[test]
    fn extra_at_signs_use_the_second_segment() {
        let hosts = parse_hosts("PHXS@1.0@2.0");
        assert_eq!(hosts, vec![Host::new("PHXS", "1.0")]);
    }

    #[test]
    fn blank_tokens_are_skipped() {
        let hosts = parse_hosts("PHXS,, ,IDSN,");
        let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["PHXS", "IDSN"]);
        assert!(parse_hosts("").is_empty());
        assert!(parse_hosts("@1.0").is_empty());
    }

    #[test]
    fn known_hosts_are_recognised() {
        assert!(Host::new("PPRO", ANY_VERSION).is_known());
        assert!(!Host::new("Foo", ANY_VERSION).is_known());
    }

    #[test]
    fn display_joins_name_and_range() {
        assert_eq!(Host::new("AEFT", "[1.0,2.0]").to_string(), "AEFT@[1.0,2.0]");
    }
}
