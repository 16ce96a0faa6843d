//! Composite key encoding.
//!
//! Coded values are keyed as `system|code`, quantities as `system|value`, and
//! the independent components of a composite parameter are joined with `$` in
//! the order fixed by the composite's definition.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Delimiter between a namespace and its code or value.
pub const NAMESPACE_DELIMITER: &str = "|";

/// Delimiter between composite components.
pub const COMPONENT_DELIMITER: &str = "$";

/// Encodes a coded value as `system|code`.
///
/// An absent namespace leaves the left side empty (`|code`).
pub fn token_key(system: Option<&str>, code: &str) -> String {
    format!("{}{}{}", system.unwrap_or_default(), NAMESPACE_DELIMITER, code)
}

/// Encodes a quantity as `system|value`.
pub fn quantity_key(system: Option<&str>, value: &Decimal) -> String {
    format!("{}{}{}", system.unwrap_or_default(), NAMESPACE_DELIMITER, value)
}

/// Decodes a key produced by [`quantity_key`] into its system and exact value.
///
/// The value is split at the last delimiter, so systems that themselves
/// contain `|` survive the round trip.
pub fn decode_quantity_key(key: &str) -> Option<(Option<String>, Decimal)> {
    let (system, value) = key.rsplit_once(NAMESPACE_DELIMITER)?;
    let value = Decimal::from_str(value).ok()?;
    let system = (!system.is_empty()).then(|| system.to_string());
    Some((system, value))
}

/// Builder for one composite value.
///
/// Components must be pushed in the composite definition's order. The key is
/// only produced once every expected component has been supplied; a partially
/// built key is discarded.
#[derive(Debug, Clone)]
pub struct CompositeKey {
    expected: usize,
    components: Vec<String>,
}

impl CompositeKey {
    /// Starts a key that expects `expected` components.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            components: Vec::with_capacity(expected),
        }
    }

    /// Appends the next component.
    pub fn push(mut self, component: impl Into<String>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Returns true once every expected component is present.
    pub fn is_complete(&self) -> bool {
        self.expected > 0
            && self.components.len() == self.expected
            && self.components.iter().all(|c| !c.is_empty())
    }

    /// Produces the `$`-joined key, or `None` if the key is incomplete.
    pub fn finish(self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        Some(self.components.join(COMPONENT_DELIMITER))
    }
}

/// Builds every complete key from per-component candidate values.
///
/// `candidates[i]` holds the encoded values found for component `i`. The
/// cartesian product is taken in component order and capped at `max` keys.
/// If any component has no candidates, no key is produced.
pub fn combine(candidates: &[Vec<String>], max: usize) -> Vec<String> {
    if candidates.is_empty() || candidates.iter().any(|c| c.is_empty()) {
        return Vec::new();
    }

    let mut partial: Vec<CompositeKey> = vec![CompositeKey::new(candidates.len())];
    for values in candidates {
        let mut next = Vec::with_capacity(partial.len() * values.len());
        'outer: for key in &partial {
            for value in values {
                if next.len() >= max {
                    break 'outer;
                }
                next.push(key.clone().push(value.clone()));
            }
        }
        partial = next;
    }

    partial.into_iter().filter_map(CompositeKey::finish).collect()
}
