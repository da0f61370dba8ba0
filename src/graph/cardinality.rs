//! Occurrence codes for graph links and their width combination.

use std::fmt;

use crate::grammar::{MaxOccurs, Occurs};

/// How many times a child slot may occur.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cardinality {
    #[default]
    One,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

impl Cardinality {
    fn from_flags(optional: bool, multiple: bool) -> Self {
        match (optional, multiple) {
            (false, false) => Self::One,
            (true, false) => Self::ZeroOrOne,
            (false, true) => Self::OneOrMore,
            (true, true) => Self::ZeroOrMore,
        }
    }

    pub fn from_occurs(occurs: Occurs) -> Self {
        let multiple = match occurs.max {
            MaxOccurs::Unbounded => true,
            MaxOccurs::Bounded(n) => n > 1,
        };
        Self::from_flags(occurs.min == 0, multiple)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Self::ZeroOrOne | Self::ZeroOrMore)
    }

    pub fn is_multiple(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }

    /// The most permissive combination of two widths.
    ///
    /// Optional dominates required and many dominates one, so
    /// `ZeroOrOne ⊕ OneOrMore = ZeroOrMore`.
    pub fn widest(self, other: Self) -> Self {
        Self::from_flags(
            self.is_optional() || other.is_optional(),
            self.is_multiple() || other.is_multiple(),
        )
    }

    /// DTD-style occurrence suffix: `""`, `?`, `*` or `+`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::One => "",
            Self::ZeroOrOne => "?",
            Self::ZeroOrMore => "*",
            Self::OneOrMore => "+",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::One => "1",
            Self::ZeroOrOne => "0..1",
            Self::ZeroOrMore => "0..n",
            Self::OneOrMore => "1..n",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Cardinality::One, Cardinality::One, Cardinality::One)]
    #[case(Cardinality::ZeroOrMore, Cardinality::One, Cardinality::ZeroOrMore)]
    #[case(Cardinality::One, Cardinality::ZeroOrOne, Cardinality::ZeroOrOne)]
    #[case(Cardinality::OneOrMore, Cardinality::One, Cardinality::OneOrMore)]
    #[case(Cardinality::ZeroOrOne, Cardinality::OneOrMore, Cardinality::ZeroOrMore)]
    #[case(Cardinality::OneOrMore, Cardinality::ZeroOrMore, Cardinality::ZeroOrMore)]
    fn test_widest(#[case] a: Cardinality, #[case] b: Cardinality, #[case] expected: Cardinality) {
        assert_eq!(a.widest(b), expected);
        assert_eq!(b.widest(a), expected);
    }

    #[rstest]
    #[case(1, MaxOccurs::Bounded(1), Cardinality::One)]
    #[case(0, MaxOccurs::Bounded(1), Cardinality::ZeroOrOne)]
    #[case(0, MaxOccurs::Unbounded, Cardinality::ZeroOrMore)]
    #[case(2, MaxOccurs::Bounded(5), Cardinality::OneOrMore)]
    fn test_from_occurs(#[case] min: u32, #[case] max: MaxOccurs, #[case] expected: Cardinality) {
        assert_eq!(Cardinality::from_occurs(Occurs::new(min, max)), expected);
    }
}
