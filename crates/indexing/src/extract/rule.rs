//! Declarative extraction rules.
//!
//! A rule binds a parameter name to an element path and the shape of the
//! element found there. Rules are grouped per kind in a [`KindTable`]; the
//! order of the rules is the order rows are emitted in.

use crate::types::ParamType;

/// Target and chaining settings of a reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRule {
    /// Kinds the reference may point to. Empty means any kind.
    pub targets: &'static [&'static str],
    /// Whether the reference is followed to index the related record.
    pub chain: bool,
    /// Whether references to kinds outside `targets` are dropped.
    pub strict: bool,
}

impl ReferenceRule {
    /// A plain, unchained reference to any kind.
    pub const ANY: ReferenceRule = ReferenceRule {
        targets: &[],
        chain: false,
        strict: false,
    };
}

/// The shape of the element at a rule's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Primitive `code`, `id`, or `string` indexed as a token.
    Code,
    /// Primitive `boolean` indexed as a token.
    Boolean,
    /// `Coding`.
    Coding,
    /// `CodeableConcept`.
    CodeableConcept,
    /// `Identifier`.
    Identifier,
    /// `ContactPoint`, optionally limited to one `system` (`phone`, `email`).
    ContactPoint(Option<&'static str>),
    /// Primitive string indexed as a string.
    String,
    /// `HumanName`, every part indexed as a string.
    HumanName,
    /// `Address`, every part indexed as a string.
    Address,
    /// `uri`, `url`, or `canonical`.
    Uri,
    /// `date`, `dateTime`, or `instant`.
    Date,
    /// `Period`.
    Period,
    /// `Quantity`.
    Quantity,
    /// `Reference`.
    Reference(ReferenceRule),
    /// A polymorphic `[x]` element, indexed as the given type. The last path
    /// segment is the element name without its type suffix.
    Choice(ParamType, ReferenceRule),
}

impl FieldShape {
    /// The parameter type rows of this shape carry.
    pub fn param_type(&self) -> ParamType {
        match self {
            FieldShape::Code
            | FieldShape::Boolean
            | FieldShape::Coding
            | FieldShape::CodeableConcept
            | FieldShape::Identifier
            | FieldShape::ContactPoint(_) => ParamType::Token,
            FieldShape::String | FieldShape::HumanName | FieldShape::Address => ParamType::String,
            FieldShape::Uri => ParamType::Uri,
            FieldShape::Date | FieldShape::Period => ParamType::Date,
            FieldShape::Quantity => ParamType::Quantity,
            FieldShape::Reference(_) => ParamType::Reference,
            FieldShape::Choice(param_type, _) => *param_type,
        }
    }
}

/// Binds a parameter to an element path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Parameter name.
    pub param: &'static str,
    /// Element path from the record root; arrays are flattened.
    pub path: &'static [&'static str],
    /// Shape of the element.
    pub shape: FieldShape,
}

/// How a composite component is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Encoded as `system|code`.
    Token,
    /// Encoded as `system|value`.
    Quantity,
}

/// One ordered component of a composite parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeComponent {
    /// Path from the group element. When nothing is found at the path, the
    /// last segment is read as a choice element.
    pub path: &'static [&'static str],
    /// Encoding of the component.
    pub kind: ComponentKind,
}

/// A composite parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeRule {
    /// Parameter name.
    pub param: &'static str,
    /// Repeating element the components are read from; empty for the record
    /// root.
    pub group: &'static [&'static str],
    /// Components in key order.
    pub components: &'static [CompositeComponent],
}

/// The rules of one kind.
#[derive(Debug)]
pub struct KindTable {
    /// The kind name.
    pub kind: &'static str,
    /// Field rules, in emission order.
    pub rules: &'static [ExtractionRule],
    /// Composite rules, emitted after the field rules.
    pub composites: &'static [CompositeRule],
}

impl KindTable {
    /// Parameter names and types declared by this table, in declaration order.
    pub fn param_types(&self) -> Vec<(&'static str, ParamType)> {
        let mut types: Vec<(&'static str, ParamType)> = Vec::new();
        for rule in self.rules {
            if !types.iter().any(|(name, _)| *name == rule.param) {
                types.push((rule.param, rule.shape.param_type()));
            }
        }
        for composite in self.composites {
            types.push((composite.param, ParamType::Composite));
        }
        types
    }
}

/// Builds a rule.
pub const fn rule(
    param: &'static str,
    path: &'static [&'static str],
    shape: FieldShape,
) -> ExtractionRule {
    ExtractionRule { param, path, shape }
}

/// Builds an unchained reference rule.
pub const fn reference(
    param: &'static str,
    path: &'static [&'static str],
    targets: &'static [&'static str],
) -> ExtractionRule {
    rule(
        param,
        path,
        FieldShape::Reference(ReferenceRule {
            targets,
            chain: false,
            strict: false,
        }),
    )
}

/// Builds a chainable reference rule.
pub const fn chained(
    param: &'static str,
    path: &'static [&'static str],
    targets: &'static [&'static str],
) -> ExtractionRule {
    rule(
        param,
        path,
        FieldShape::Reference(ReferenceRule {
            targets,
            chain: true,
            strict: false,
        }),
    )
}

/// Builds a chainable reference rule that only accepts the `targets` kinds.
pub const fn chained_strict(
    param: &'static str,
    path: &'static [&'static str],
    targets: &'static [&'static str],
) -> ExtractionRule {
    rule(
        param,
        path,
        FieldShape::Reference(ReferenceRule {
            targets,
            chain: true,
            strict: true,
        }),
    )
}

/// Builds a choice rule for a non-reference type.
pub const fn choice(
    param: &'static str,
    path: &'static [&'static str],
    param_type: ParamType,
) -> ExtractionRule {
    rule(param, path, FieldShape::Choice(param_type, ReferenceRule::ANY))
}

/// Builds a component.
pub const fn component(path: &'static [&'static str], kind: ComponentKind) -> CompositeComponent {
    CompositeComponent { path, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    static RULES: &[ExtractionRule] = &[
        rule("status", &["status"], FieldShape::Code),
        reference("subject", &["subject"], &[]),
        choice("value-quantity", &["value"], ParamType::Quantity),
        rule("status", &["statusReason"], FieldShape::CodeableConcept),
    ];

    static COMPOSITES: &[CompositeRule] = &[CompositeRule {
        param: "code-value-quantity",
        group: &[],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    }];

    #[test]
    fn test_shape_param_types() {
        assert_eq!(FieldShape::HumanName.param_type(), ParamType::String);
        assert_eq!(FieldShape::Period.param_type(), ParamType::Date);
        assert_eq!(
            FieldShape::Choice(ParamType::Quantity, ReferenceRule::ANY).param_type(),
            ParamType::Quantity
        );
    }

    #[test]
    fn test_table_param_types_deduplicate() {
        let table = KindTable {
            kind: "Observation",
            rules: RULES,
            composites: COMPOSITES,
        };
        let types = table.param_types();
        assert_eq!(
            types,
            vec![
                ("status", ParamType::Token),
                ("subject", ParamType::Reference),
                ("value-quantity", ParamType::Quantity),
                ("code-value-quantity", ParamType::Composite),
            ]
        );
    }
}
