//! Reference resolution and classification.

/// Resolves a raw reference against the server base URL.
///
/// Absolute URLs, URNs, and local `#fragment` references are returned
/// unchanged. Anything else is treated as relative and joined to `base_url`
/// with exactly one `/`. An empty reference or an empty base returns the
/// reference unchanged.
pub fn resolve(raw: &str, base_url: &str) -> String {
    if raw.is_empty() || base_url.is_empty() || !is_relative(raw) {
        return raw.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        raw.trim_start_matches('/')
    )
}

/// Returns true if the reference has a URL scheme (`scheme://...`).
pub fn is_absolute_url(raw: &str) -> bool {
    match raw.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Returns true for `urn:` references (`urn:uuid:`, `urn:oid:`, `urn:iso:`, ...).
pub fn is_urn(raw: &str) -> bool {
    raw.len() > 4 && raw.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:"))
}

fn is_relative(raw: &str) -> bool {
    !(is_absolute_url(raw) || is_urn(raw) || raw.starts_with('#'))
}

/// Returns true if a path segment names a resource kind.
pub fn is_kind_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// A classified reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReference {
    /// `Kind/id` or `Kind/id/_history/version`.
    Relative {
        /// Referenced kind.
        kind: String,
        /// Referenced logical id.
        id: String,
        /// Version, when the reference pins one.
        version: Option<String>,
    },
    /// `scheme://...`, with the `Kind/id` tail when one is present.
    Absolute {
        /// The full URL.
        url: String,
        /// Kind from the URL tail.
        kind: Option<String>,
        /// Logical id from the URL tail.
        id: Option<String>,
    },
    /// `urn:...`
    Urn(String),
    /// `#id`, pointing into the same record.
    Fragment(String),
    /// Anything else.
    Opaque(String),
}

impl ParsedReference {
    /// Classifies a raw reference.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(fragment) = raw.strip_prefix('#') {
            return ParsedReference::Fragment(fragment.to_string());
        }
        if is_urn(raw) {
            return ParsedReference::Urn(raw.to_string());
        }
        if is_absolute_url(raw) {
            let tail = raw.split_once("://").map(|(_, rest)| rest).unwrap_or(raw);
            let segments: Vec<&str> = tail.split('/').collect();
            let (kind, id) = match kind_and_id(&segments[1.min(segments.len())..]) {
                Some((kind, id, _)) => (Some(kind), Some(id)),
                None => (None, None),
            };
            return ParsedReference::Absolute {
                url: raw.to_string(),
                kind,
                id,
            };
        }

        let segments: Vec<&str> = raw.trim_start_matches('/').split('/').collect();
        let is_exact = segments.len() == 2 || (segments.len() == 4 && segments[2] == "_history");
        match kind_and_id(&segments) {
            Some((kind, id, version)) if is_exact => {
                ParsedReference::Relative { kind, id, version }
            }
            _ => ParsedReference::Opaque(raw.to_string()),
        }
    }

    /// The referenced kind, when derivable from the reference itself.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ParsedReference::Relative { kind, .. } => Some(kind),
            ParsedReference::Absolute { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }

    /// The referenced logical id, when derivable from the reference itself.
    pub fn id(&self) -> Option<&str> {
        match self {
            ParsedReference::Relative { id, .. } => Some(id),
            ParsedReference::Absolute { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    /// The relative `Kind/id` form, when derivable.
    pub fn relative(&self) -> Option<String> {
        Some(format!("{}/{}", self.kind()?, self.id()?))
    }
}

/// Finds the last `Kind/id` (optionally followed by `_history/version`) at
/// the tail of a segment list.
fn kind_and_id(segments: &[&str]) -> Option<(String, String, Option<String>)> {
    let n = segments.len();
    if n >= 4 && segments[n - 2] == "_history" {
        let (kind, id, version) = (segments[n - 4], segments[n - 3], segments[n - 1]);
        if is_kind_segment(kind) && !id.is_empty() && !version.is_empty() {
            return Some((kind.to_string(), id.to_string(), Some(version.to_string())));
        }
    }
    if n >= 2 {
        let (kind, id) = (segments[n - 2], segments[n - 1]);
        if is_kind_segment(kind) && !id.is_empty() {
            return Some((kind.to_string(), id.to_string(), None));
        }
    }
    None
}
