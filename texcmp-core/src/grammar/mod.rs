//! The canonical grammar: a compact tagged tree describing the structure of a mathematical
//! expression.
//!
//! Each node of an [`Expr`] is one of a fixed set of variants, and its textual form (the
//! **grammar string**) is written `tag(arg, arg, ...)`:
//!
//! | Variant                  | Tag        | Example                         |
//! | ------------------------ | ---------- | ------------------------------- |
//! | [`Expr::Number`]         | `num`      | `num(2)`, `num(-1/2)`, `num(E)` |
//! | [`Expr::Variable`]       | `var`      | `var(x)`                        |
//! | [`Expr::Sum`]            | `sum`      | `sum(var(x), num(1))`           |
//! | [`Expr::Product`]        | `mul`      | `mul(num(2), var(x))`           |
//! | [`Expr::Fraction`]       | `fraq`     | `fraq(num(1), var(x))`          |
//! | [`Expr::Power`]          | `pow`      | `pow(var(x), num(2))`           |
//! | [`Expr::Integral`]       | `integral` | `integral(var(t), num(0), num(1))` |
//! | [`Expr::Logarithm`]      | `log`      | `log(var(x), num(2))`           |
//! | [`Expr::Difference`]     | `sub`      | `sub(var(x), var(y))`           |
//! | [`Expr::UserFunction`]   | `udf`      | `udf(sin, var(x))`              |
//!
//! The grammar string is what gets logged and exchanged between stages; the [`Expr`] tree is the
//! working representation. [`parse_grammar`] recovers the tree from its string.
//!
//! # Invariants
//!
//! - [`Expr::Sum`] and [`Expr::Product`] always hold at least two children. Build them with
//! [`Expr::sum`] and [`Expr::product`], which collapse smaller lists.
//! - Rationals are always in lowest terms with a positive denominator (guaranteed by
//! [`rug::Rational`]).
//! - Equality and hashing are structural: `sum(x, y)` and `sum(y, x)` are different trees.

pub mod error;
mod iter;
mod parse;

pub use iter::ExprIter;
pub use parse::{parse_grammar, split_arguments};

use crate::primitive::{int, rational};
use rug::Rational;
use std::fmt;

/// Named mathematical constants that a [`Number`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Euler's number, written `num(E)`.
    E,
}

/// A numeric leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Number {
    /// An exact rational number.
    Rational(Rational),

    /// A named constant.
    Constant(Constant),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) if *r.denom() == 1 => write!(f, "{}", r.numer()),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Constant(Constant::E) => write!(f, "E"),
        }
    }
}

/// The tag of an [`Expr`] variant, as written in grammar strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Number,
    Variable,
    Sum,
    Product,
    Fraction,
    Power,
    Integral,
    Logarithm,
    Difference,
    UserFunction,
}

impl Tag {
    /// All tags.
    pub const ALL: [Tag; 10] = [
        Tag::Number,
        Tag::Variable,
        Tag::Sum,
        Tag::Product,
        Tag::Fraction,
        Tag::Power,
        Tag::Integral,
        Tag::Logarithm,
        Tag::Difference,
        Tag::UserFunction,
    ];

    /// Returns the name of the tag in grammar strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "num",
            Self::Variable => "var",
            Self::Sum => "sum",
            Self::Product => "mul",
            Self::Fraction => "fraq",
            Self::Power => "pow",
            Self::Integral => "integral",
            Self::Logarithm => "log",
            Self::Difference => "sub",
            Self::UserFunction => "udf",
        }
    }

    /// Returns the tag with the given grammar name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node of the canonical grammar.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A rational number or a named constant.
    Number(Number),

    /// A variable, such as `x` or `x_1`.
    Variable(String),

    /// Two or more terms added together.
    Sum(Vec<Expr>),

    /// Two or more factors multiplied together.
    Product(Vec<Expr>),

    /// A numerator and a denominator.
    Fraction(Box<Expr>, Box<Expr>),

    /// A base and an exponent.
    Power(Box<Expr>, Box<Expr>),

    /// An integrand with either no bounds (indefinite) or a lower and an upper bound.
    Integral(Box<Expr>, Option<(Box<Expr>, Box<Expr>)>),

    /// A value and a base.
    Logarithm(Box<Expr>, Box<Expr>),

    /// A minuend and a subtrahend.
    Difference(Box<Expr>, Box<Expr>),

    /// A call to a function outside the fixed set above, such as `sin`.
    UserFunction(String, Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => return write!(f, "num({})", num),
            Self::Variable(name) => return write!(f, "var({})", name),
            Self::UserFunction(name, args) => {
                write!(f, "udf({}", name)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                return write!(f, ")");
            },
            _ => (),
        }

        write!(f, "{}(", self.tag())?;
        let mut iter = self.children().into_iter();
        if let Some(child) = iter.next() {
            write!(f, "{}", child)?;
            for child in iter {
                write!(f, ", {}", child)?;
            }
        }
        write!(f, ")")
    }
}

impl From<Rational> for Expr {
    fn from(r: Rational) -> Self {
        Self::Number(Number::Rational(r))
    }
}

impl Expr {
    /// Creates an integer leaf.
    pub fn int(n: i64) -> Self {
        Self::from(rational(int(n)))
    }

    /// Creates the leaf for Euler's number.
    pub fn e() -> Self {
        Self::Number(Number::Constant(Constant::E))
    }

    /// Creates a variable leaf.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Creates a sum of the given terms, collapsing it with [`Expr::simplify_singleton`].
    pub fn sum(terms: Vec<Expr>) -> Self {
        Self::Sum(terms).simplify_singleton()
    }

    /// Creates a product of the given factors, collapsing it with [`Expr::simplify_singleton`].
    pub fn product(factors: Vec<Expr>) -> Self {
        Self::Product(factors).simplify_singleton()
    }

    /// Creates `num / den`.
    pub fn fraction(num: Expr, den: Expr) -> Self {
        Self::Fraction(Box::new(num), Box::new(den))
    }

    /// Creates `base ^ exp`.
    pub fn power(base: Expr, exp: Expr) -> Self {
        Self::Power(Box::new(base), Box::new(exp))
    }

    /// Creates `log_base(value)`.
    pub fn logarithm(value: Expr, base: Expr) -> Self {
        Self::Logarithm(Box::new(value), Box::new(base))
    }

    /// Creates `lhs - rhs`.
    pub fn difference(lhs: Expr, rhs: Expr) -> Self {
        Self::Difference(Box::new(lhs), Box::new(rhs))
    }

    /// Creates an integral with the given bounds.
    pub fn integral(integrand: Expr, bounds: Option<(Expr, Expr)>) -> Self {
        Self::Integral(
            Box::new(integrand),
            bounds.map(|(lower, upper)| (Box::new(lower), Box::new(upper))),
        )
    }

    /// Collapses a [`Expr::Sum`] or [`Expr::Product`] with fewer than two children.
    ///
    /// A single child replaces its parent. An empty sum becomes `0`, and an empty product becomes
    /// `1`. Any other expression is returned unchanged.
    pub fn simplify_singleton(self) -> Self {
        match self {
            Self::Sum(mut terms) => match terms.len() {
                0 => Self::int(0),
                1 => terms.remove(0),
                _ => Self::Sum(terms),
            },
            Self::Product(mut factors) => match factors.len() {
                0 => Self::int(1),
                1 => factors.remove(0),
                _ => Self::Product(factors),
            },
            _ => self,
        }
    }

    /// Returns the tag of the expression.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Number(_) => Tag::Number,
            Self::Variable(_) => Tag::Variable,
            Self::Sum(_) => Tag::Sum,
            Self::Product(_) => Tag::Product,
            Self::Fraction(..) => Tag::Fraction,
            Self::Power(..) => Tag::Power,
            Self::Integral(..) => Tag::Integral,
            Self::Logarithm(..) => Tag::Logarithm,
            Self::Difference(..) => Tag::Difference,
            Self::UserFunction(..) => Tag::UserFunction,
        }
    }

    /// Returns the direct children of the expression, in order. The bounds of an integral follow
    /// its integrand.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Number(_) | Self::Variable(_) => Vec::new(),
            Self::Sum(children) | Self::Product(children) | Self::UserFunction(_, children) => {
                children.iter().collect()
            },
            Self::Fraction(a, b) | Self::Power(a, b) | Self::Logarithm(a, b) | Self::Difference(a, b) => {
                vec![a.as_ref(), b.as_ref()]
            },
            Self::Integral(integrand, None) => vec![integrand.as_ref()],
            Self::Integral(integrand, Some((lower, upper))) => {
                vec![integrand.as_ref(), lower.as_ref(), upper.as_ref()]
            },
        }
    }

    /// Returns a mutable reference to the child at the given index.
    fn child_mut(&mut self, index: usize) -> Option<&mut Expr> {
        match self {
            Self::Number(_) | Self::Variable(_) => None,
            Self::Sum(children) | Self::Product(children) | Self::UserFunction(_, children) => {
                children.get_mut(index)
            },
            Self::Fraction(a, b) | Self::Power(a, b) | Self::Logarithm(a, b) | Self::Difference(a, b) => {
                match index {
                    0 => Some(a.as_mut()),
                    1 => Some(b.as_mut()),
                    _ => None,
                }
            },
            Self::Integral(integrand, bounds) => match (index, bounds) {
                (0, _) => Some(integrand.as_mut()),
                (1, Some((lower, _))) => Some(lower.as_mut()),
                (2, Some((_, upper))) => Some(upper.as_mut()),
                _ => None,
            },
        }
    }

    /// Returns the number of direct children.
    pub fn arity(&self) -> usize {
        self.children().len()
    }

    /// Returns the node reached by following the given child indices from this node.
    pub fn at(&self, path: &[usize]) -> Option<&Expr> {
        match path.split_first() {
            Some((&index, rest)) => self.children().get(index)?.at(rest),
            None => Some(self),
        }
    }

    /// Returns a copy of this tree with the node at the given path replaced. Returns [`None`] if
    /// the path does not exist.
    pub fn replace_at(&self, path: &[usize], replacement: Expr) -> Option<Expr> {
        let mut tree = self.clone();
        let mut node = &mut tree;
        for &index in path {
            node = node.child_mut(index)?;
        }
        *node = replacement;
        Some(tree)
    }

    /// Returns the total number of nodes in the tree.
    pub fn node_weight(&self) -> usize {
        self.post_order_iter().count()
    }

    /// If the expression is a rational number, returns a reference to it.
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Self::Number(Number::Rational(r)) => Some(r),
            _ => None,
        }
    }

    /// Returns true if the expression is the rational number `n`.
    pub fn is_int(&self, n: i32) -> bool {
        self.as_rational().map_or(false, |r| *r == n)
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the paths of every node in the tree, in pre-order. The root's path is empty.
    pub fn pre_order_paths(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut stack = vec![(self, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            for (index, child) in node.children().into_iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(index);
                stack.push((child, child_path));
            }
            paths.push(path);
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::primitive::rational;
    use super::*;

    #[test]
    fn display_grammar_string() {
        let expr = Expr::sum(vec![
            Expr::product(vec![Expr::int(2), Expr::var("x")]),
            Expr::fraction(Expr::from(rational((-1, 2))), Expr::e()),
            Expr::UserFunction("sin".to_string(), vec![Expr::var("y")]),
        ]);
        assert_eq!(
            expr.to_string(),
            "sum(mul(num(2), var(x)), fraq(num(-1/2), num(E)), udf(sin, var(y)))",
        );
    }

    #[test]
    fn display_integrals() {
        let definite = Expr::integral(Expr::var("t"), Some((Expr::int(0), Expr::int(1))));
        assert_eq!(definite.to_string(), "integral(var(t), num(0), num(1))");
        assert_eq!(Expr::integral(Expr::var("t"), None).to_string(), "integral(var(t))");
    }

    #[test]
    fn singletons_collapse() {
        assert_eq!(Expr::sum(vec![Expr::var("x")]), Expr::var("x"));
        assert_eq!(Expr::product(vec![]), Expr::int(1));
        assert_eq!(Expr::sum(vec![]), Expr::int(0));
    }

    #[test]
    fn weight_counts_every_node() {
        // pow(sum(x, 1), 2)
        let expr = Expr::power(Expr::sum(vec![Expr::var("x"), Expr::int(1)]), Expr::int(2));
        assert_eq!(expr.node_weight(), 5);
        assert_eq!(Expr::UserFunction("f".to_string(), vec![]).node_weight(), 1);
    }

    #[test]
    fn paths_are_pre_order() {
        let expr = Expr::fraction(Expr::sum(vec![Expr::var("a"), Expr::var("b")]), Expr::var("c"));
        assert_eq!(
            expr.pre_order_paths(),
            vec![vec![], vec![0], vec![0, 0], vec![0, 1], vec![1]],
        );
        assert_eq!(expr.at(&[0, 1]), Some(&Expr::var("b")));
        assert_eq!(expr.at(&[2]), None);
    }

    #[test]
    fn replace_inside_integral_bounds() {
        let expr = Expr::integral(Expr::var("t"), Some((Expr::int(0), Expr::int(1))));
        let replaced = expr.replace_at(&[2], Expr::var("b")).unwrap();
        assert_eq!(replaced, Expr::integral(Expr::var("t"), Some((Expr::int(0), Expr::var("b")))));
        assert_eq!(expr.replace_at(&[3], Expr::int(0)), None);
    }
}
