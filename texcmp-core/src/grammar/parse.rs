//! Recovers [`Expr`] trees from grammar strings.

use super::{error::*, Expr, Tag};
use crate::primitive::rational_from_str;
use std::ops::Range;
use texcmp_error::Error;

/// Splits a comma-separated argument list at the commas that are not nested inside parentheses,
/// trimming whitespace around each argument.
///
/// ```
/// use texcmp_core::grammar::split_arguments;
///
/// assert_eq!(split_arguments("mul(a, b), c"), vec!["mul(a, b)", "c"]);
/// assert!(split_arguments("  ").is_empty());
/// ```
pub fn split_arguments(arguments: &str) -> Vec<&str> {
    split_with_offsets(arguments, 0)
        .into_iter()
        .map(|(_, argument)| argument)
        .collect()
}

/// Trims the given range of `s`, returning the trimmed text and its offset from `base`.
fn trimmed(s: &str, range: Range<usize>, base: usize) -> (usize, &str) {
    let piece = &s[range.clone()];
    let leading = piece.len() - piece.trim_start().len();
    (base + range.start + leading, piece.trim())
}

/// [`split_arguments`], also returning the offset of each argument. Offsets are relative to the
/// start of the string that `arguments` was sliced from, which begins `base` bytes before it.
fn split_with_offsets(arguments: &str, base: usize) -> Vec<(usize, &str)> {
    if arguments.trim().is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in arguments.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(trimmed(arguments, start..i, base));
                start = i + 1;
            },
            _ => (),
        }
    }
    pieces.push(trimmed(arguments, start..arguments.len(), base));
    pieces
}

/// Checks that every parenthesis in the string has a partner.
fn check_balance(s: &str) -> Result<(), Error> {
    let mut open = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                if open.pop().is_none() {
                    return Err(Error::new(vec![i..i + 1], UnbalancedParentheses));
                }
            },
            _ => (),
        }
    }

    match open.last() {
        Some(&i) => Err(Error::new(vec![i..i + 1], UnbalancedParentheses)),
        None => Ok(()),
    }
}

/// Returns the index of the parenthesis closing the one at `open`.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            },
            _ => (),
        }
    }
    None
}

/// Checks that the name of a variable or function can be written in a grammar string.
fn check_name(name: &str, offset: usize) -> Result<String, Error> {
    let invalid = name.is_empty()
        || name.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ','));
    if invalid {
        Err(Error::new(vec![offset..offset + name.len()], InvalidName { name: name.to_string() }))
    } else {
        Ok(name.to_string())
    }
}

/// Parses a grammar string, such as `sum(var(x), num(1))`, into an [`Expr`] tree.
///
/// The produced tree always satisfies the invariants of [`Expr`]; for example, a `sum` with a
/// single argument is a [`WrongArity`] error rather than a collapsed node. Errors carry spans into
/// the given string.
pub fn parse_grammar(s: &str) -> Result<Expr, Error> {
    check_balance(s)?;
    let (offset, node) = trimmed(s, 0..s.len(), 0);
    if node.is_empty() {
        return Err(Error::new(vec![offset..offset], EmptyArgument));
    }
    parse_node(node, offset)
}

/// Parses a single trimmed, non-empty node that starts at `offset` in the original string.
fn parse_node(src: &str, offset: usize) -> Result<Expr, Error> {
    let span = offset..offset + src.len();
    let Some(open) = src.find('(') else {
        return Err(Error::new(vec![span], UnknownTag { tag: src.to_string() }));
    };

    let tag_text = src[..open].trim_end();
    let tag = Tag::from_name(tag_text).ok_or_else(|| {
        Error::new(vec![offset..offset + tag_text.len()], UnknownTag { tag: tag_text.to_string() })
    })?;

    // balance was checked up front, so the opening parenthesis is always closed
    let close = matching_close(src, open).unwrap_or(src.len() - 1);
    if close + 1 != src.len() {
        return Err(Error::new(vec![offset + close + 1..span.end], TrailingCharacters));
    }

    let args = split_with_offsets(&src[open + 1..close], offset + open + 1);
    if let Some(&(arg_offset, _)) = args.iter().find(|(_, arg)| arg.is_empty()) {
        return Err(Error::new(vec![arg_offset..arg_offset], EmptyArgument));
    }

    let wrong_arity = |expected: &'static str| {
        Error::new(vec![span.clone()], WrongArity { tag: tag.name(), expected, found: args.len() })
    };
    let parse_all = |args: &[(usize, &str)]| {
        args.iter()
            .map(|&(arg_offset, arg)| parse_node(arg, arg_offset))
            .collect::<Result<Vec<_>, _>>()
    };

    match tag {
        Tag::Number => match args.as_slice() {
            [(_, "E")] => Ok(Expr::e()),
            &[(arg_offset, text)] => rational_from_str(text)
                .map(Expr::from)
                .ok_or_else(|| Error::new(
                    vec![arg_offset..arg_offset + text.len()],
                    InvalidNumber { text: text.to_string() },
                )),
            _ => Err(wrong_arity("exactly 1")),
        },
        Tag::Variable => match args.as_slice() {
            &[(arg_offset, name)] => Ok(Expr::Variable(check_name(name, arg_offset)?)),
            _ => Err(wrong_arity("exactly 1")),
        },
        Tag::Sum | Tag::Product => {
            if args.len() < 2 {
                return Err(wrong_arity("at least 2"));
            }
            let children = parse_all(&args)?;
            Ok(if tag == Tag::Sum { Expr::Sum(children) } else { Expr::Product(children) })
        },
        Tag::Fraction | Tag::Power | Tag::Logarithm | Tag::Difference => {
            if args.len() != 2 {
                return Err(wrong_arity("exactly 2"));
            }
            let mut children = parse_all(&args)?.into_iter();
            let (Some(a), Some(b)) = (children.next(), children.next()) else {
                return Err(wrong_arity("exactly 2"));
            };
            Ok(match tag {
                Tag::Fraction => Expr::fraction(a, b),
                Tag::Power => Expr::power(a, b),
                Tag::Logarithm => Expr::logarithm(a, b),
                _ => Expr::difference(a, b),
            })
        },
        Tag::Integral => {
            let mut children = match args.len() {
                1 | 3 => parse_all(&args)?.into_iter(),
                _ => return Err(wrong_arity("1 or 3")),
            };
            let Some(integrand) = children.next() else {
                return Err(wrong_arity("1 or 3"));
            };
            let bounds = children.next().zip(children.next());
            Ok(Expr::integral(integrand, bounds))
        },
        Tag::UserFunction => match args.split_first() {
            Some((&(name_offset, name), rest)) => {
                Ok(Expr::UserFunction(check_name(name, name_offset)?, parse_all(rest)?))
            },
            None => Err(wrong_arity("at least 1")),
        },
    }
}
