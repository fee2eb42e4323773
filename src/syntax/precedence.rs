//! Operator precedence and classification helpers shared by the expression
//! and pattern parsers.

/// Binding strength of an expression form, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Select,
    Assignment,
    Conditional,
    Coalescing,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    Xor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    With,
    Switch,
    Range,
    Cast,
    Unary,
    Postfix,
    Generic,
}

const LEVELS: [Precedence; 21] = [
    Precedence::Select,
    Precedence::Assignment,
    Precedence::Conditional,
    Precedence::Coalescing,
    Precedence::LogicalOr,
    Precedence::LogicalAnd,
    Precedence::BitwiseOr,
    Precedence::Xor,
    Precedence::BitwiseAnd,
    Precedence::Equality,
    Precedence::Relational,
    Precedence::Shift,
    Precedence::Additive,
    Precedence::Multiplicative,
    Precedence::With,
    Precedence::Switch,
    Precedence::Range,
    Precedence::Cast,
    Precedence::Unary,
    Precedence::Postfix,
    Precedence::Generic,
];

impl Precedence {
    /// The next tighter level; `Generic` is its own successor.
    #[must_use]
    pub fn tighter(self) -> Self {
        LEVELS
            .get(self as usize + 1)
            .copied()
            .unwrap_or(Precedence::Generic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Clone, Copy)]
struct BinaryOpSpec {
    symbol: &'static str,
    precedence: Precedence,
    associativity: Associativity,
}

const fn left(symbol: &'static str, precedence: Precedence) -> BinaryOpSpec {
    BinaryOpSpec {
        symbol,
        precedence,
        associativity: Associativity::Left,
    }
}

/// Infix operators. `>>` and `>>>` never come from the scanner as one token;
/// the parser joins adjacent `>` tokens before consulting this table.
const BINARY_OP_SPECS: &[BinaryOpSpec] = &[
    BinaryOpSpec {
        symbol: "??",
        precedence: Precedence::Coalescing,
        associativity: Associativity::Right,
    },
    left("||", Precedence::LogicalOr),
    left("&&", Precedence::LogicalAnd),
    left("|", Precedence::BitwiseOr),
    left("^", Precedence::Xor),
    left("&", Precedence::BitwiseAnd),
    left("==", Precedence::Equality),
    left("!=", Precedence::Equality),
    left("<", Precedence::Relational),
    left("<=", Precedence::Relational),
    left(">", Precedence::Relational),
    left(">=", Precedence::Relational),
    left("<<", Precedence::Shift),
    left(">>", Precedence::Shift),
    left(">>>", Precedence::Shift),
    left("+", Precedence::Additive),
    left("-", Precedence::Additive),
    left("*", Precedence::Multiplicative),
    left("/", Precedence::Multiplicative),
    left("%", Precedence::Multiplicative),
];

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "<<=", ">>=", "??=",
];

const PREFIX_OPERATORS: &[&str] = &["++", "--", "+", "-", "!", "~", "&", "^", "*"];

const RELATIONAL_PATTERN_OPERATORS: &[&str] = &["<", "<=", ">", ">="];

/// Precedence and associativity of an infix operator symbol.
#[must_use]
pub fn binary_precedence(symbol: &str) -> Option<(Precedence, Associativity)> {
    BINARY_OP_SPECS
        .iter()
        .find(|entry| entry.symbol == symbol)
        .map(|entry| (entry.precedence, entry.associativity))
}

#[must_use]
pub fn is_assignment_operator(symbol: &str) -> bool {
    ASSIGNMENT_OPERATORS.contains(&symbol)
}

#[must_use]
pub fn is_prefix_operator(symbol: &str) -> bool {
    PREFIX_OPERATORS.contains(&symbol)
}

#[must_use]
pub fn is_relational_pattern_operator(symbol: &str) -> bool {
    RELATIONAL_PATTERN_OPERATORS.contains(&symbol)
}

/// Whether a binary operator may appear inside a constant pattern.
///
/// Constant patterns stop below equality so `case 1 == x` and `is A < B`
/// never swallow the rest of the construct.
#[must_use]
pub fn allowed_in_constant_pattern(precedence: Precedence) -> bool {
    precedence >= Precedence::BitwiseOr
        && !matches!(precedence, Precedence::Equality | Precedence::Relational)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let (add, _) = binary_precedence("+").expect("plus");
        let (mul, _) = binary_precedence("*").expect("times");
        assert!(mul > add);
        assert_eq!(add.tighter(), Precedence::Multiplicative);
    }

    #[test]
    fn coalescing_is_the_only_right_associative_binary_operator() {
        let right: Vec<_> = BINARY_OP_SPECS
            .iter()
            .filter(|entry| entry.associativity == Associativity::Right)
            .map(|entry| entry.symbol)
            .collect();
        assert_eq!(right, vec!["??"]);
    }

    #[test]
    fn shift_family_shares_one_level() {
        for symbol in ["<<", ">>", ">>>"] {
            assert_eq!(binary_precedence(symbol).map(|(p, _)| p), Some(Precedence::Shift));
        }
        assert!(binary_precedence("=>").is_none());
    }

    #[test]
    fn constant_patterns_exclude_comparisons() {
        assert!(allowed_in_constant_pattern(Precedence::Additive));
        assert!(allowed_in_constant_pattern(Precedence::BitwiseOr));
        assert!(!allowed_in_constant_pattern(Precedence::Equality));
        assert!(!allowed_in_constant_pattern(Precedence::Relational));
        assert!(!allowed_in_constant_pattern(Precedence::LogicalAnd));
    }

    #[test]
    fn operator_sets() {
        assert!(is_assignment_operator("??="));
        assert!(!is_assignment_operator("=="));
        assert!(is_prefix_operator("^"));
        assert!(is_relational_pattern_operator(">="));
    }
}
