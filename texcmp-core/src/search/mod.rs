//! The equivalence-search engine.
//!
//! [`Search`] rewrites two grammar trees, one rule application at a time, to make them as similar
//! as possible. It is an [`Iterator`] of [`Snapshot`]s: snapshot 0 reports the unmodified pair,
//! and each later snapshot is one iteration. Iteration stops when no rule application improves
//! the similarity, when `max_iterations` rewrites have run, or when the timeout has elapsed. The
//! last snapshot always has a terminal [`Status`].
//!
//! Each iteration tries every [`Rule`], in declaration order, at every node of the left tree and
//! then the right tree, in pre-order. The candidate with the highest similarity wins; a later
//! candidate replaces an earlier one only if it is strictly better. Since a rewrite is only
//! applied if it strictly increases the similarity, similarity never decreases across snapshots.
//!
//! Time is checked cooperatively before each iteration; a slow iteration is never interrupted.
//!
//! ```
//! use std::time::Duration;
//! use texcmp_core::{grammar::parse_grammar, search::{Search, Status}};
//!
//! let left = parse_grammar("sum(var(x), var(y))").unwrap();
//! let right = parse_grammar("sum(var(y), var(x))").unwrap();
//! let last = Search::new(left, right, 10, Duration::from_secs(1)).last().unwrap();
//! assert_eq!(last.status, Status::ConvergedExact);
//! assert_eq!(last.similarity, 1.0);
//! ```

pub mod rules;

use crate::{grammar::Expr, similarity::similarity};
pub use rules::Rule;
use std::{fmt, time::{Duration, Instant}};
use tracing::trace;

/// One of the two trees being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first input.
    Left,

    /// The second input.
    Right,
}

impl Side {
    /// Returns the name of the input on this side, as used in the comparison result.
    pub fn input_name(self) -> &'static str {
        match self {
            Self::Left => "latex1",
            Self::Right => "latex2",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input_name())
    }
}

/// The state of a search after a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// More iterations will follow.
    Continuing,

    /// The trees are structurally equal.
    ConvergedExact,

    /// The search stopped before the trees became equal.
    ConvergedPartial,
}

impl Status {
    /// Returns true if no snapshots follow one with this status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Continuing)
    }

    /// Returns the terminal status for the given similarity.
    fn converged(similarity: f64) -> Self {
        if similarity >= 1.0 {
            Self::ConvergedExact
        } else {
            Self::ConvergedPartial
        }
    }
}

/// A rule application that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rule that was applied.
    pub rule: Rule,

    /// The tree it was applied to.
    pub side: Side,

    /// The path from the root of that tree to the rewritten node.
    pub path: Vec<usize>,
}

/// The state of a search after one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The number of iterations run so far. Snapshot 0 is the unmodified input. The snapshot
    /// emitted when the timeout expires repeats the count of the one before it.
    pub iteration: usize,

    /// Time elapsed since the search was created.
    pub elapsed: Duration,

    /// The similarity of the two trees, between 0 and 1.
    pub similarity: f64,

    /// The current left tree.
    pub left: Expr,

    /// The current right tree.
    pub right: Expr,

    /// Whether the search continues after this snapshot.
    pub status: Status,

    /// The rewrite applied in this iteration, if any.
    pub rewrite: Option<Rewrite>,
}

/// The best candidate found in one iteration.
struct Candidate {
    similarity: f64,
    tree: Expr,
    rewrite: Rewrite,
}

/// An iterative search for the rewrites that make two trees most similar.
///
/// For more information, see the [module-level documentation](self).
#[derive(Debug, Clone)]
pub struct Search {
    left: Expr,
    right: Expr,
    similarity: f64,
    iteration: usize,
    max_iterations: usize,
    timeout: Duration,
    start: Instant,
    started: bool,
    finished: bool,
}

impl Search {
    /// Creates a search over the given trees. At most `max_iterations` rewrites are applied, and
    /// no iteration starts once `timeout` has elapsed since this call.
    pub fn new(left: Expr, right: Expr, max_iterations: usize, timeout: Duration) -> Self {
        let similarity = similarity(&left, &right);
        Self {
            left,
            right,
            similarity,
            iteration: 0,
            max_iterations,
            timeout,
            start: Instant::now(),
            started: false,
            finished: false,
        }
    }

    /// Returns the current left tree.
    pub fn left(&self) -> &Expr {
        &self.left
    }

    /// Returns the current right tree.
    pub fn right(&self) -> &Expr {
        &self.right
    }

    /// Returns the current similarity.
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    fn snapshot(&self, status: Status, rewrite: Option<Rewrite>) -> Snapshot {
        Snapshot {
            iteration: self.iteration,
            elapsed: self.start.elapsed(),
            similarity: self.similarity,
            left: self.left.clone(),
            right: self.right.clone(),
            status,
            rewrite,
        }
    }

    /// Finds the rule application that most increases the similarity, if any does.
    fn best_rewrite(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let mut best_similarity = self.similarity;

        for rule in Rule::ALL {
            for side in [Side::Left, Side::Right] {
                let (tree, other) = match side {
                    Side::Left => (&self.left, &self.right),
                    Side::Right => (&self.right, &self.left),
                };

                for path in tree.pre_order_paths() {
                    let Some(node) = tree.at(&path) else { continue };
                    let Some(replacement) = rule.apply(node, other.at(&path)) else { continue };
                    let Some(candidate) = tree.replace_at(&path, replacement) else { continue };

                    let score = similarity(&candidate, other);
                    trace!(
                        target: "search",
                        rule = %rule,
                        side = %side,
                        path = ?path,
                        similarity = score,
                        "candidate"
                    );

                    if score > best_similarity {
                        best_similarity = score;
                        best = Some(Candidate {
                            similarity: score,
                            tree: candidate,
                            rewrite: Rewrite { rule, side, path },
                        });
                    }
                }
            }
        }

        best
    }
}

impl Iterator for Search {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.finished {
            return None;
        }

        if !self.started {
            self.started = true;
            let status = if self.similarity >= 1.0 || self.max_iterations == 0 {
                Status::converged(self.similarity)
            } else {
                Status::Continuing
            };
            self.finished = status.is_terminal();
            return Some(self.snapshot(status, None));
        }

        self.finished = true;

        // the timeout snapshot keeps the previous iteration count
        if self.start.elapsed() >= self.timeout {
            return Some(self.snapshot(Status::ConvergedPartial, None));
        }
        self.iteration += 1;

        let Some(Candidate { similarity, tree, rewrite }) = self.best_rewrite() else {
            return Some(self.snapshot(Status::converged(self.similarity), None));
        };

        match rewrite.side {
            Side::Left => self.left = tree,
            Side::Right => self.right = tree,
        }
        self.similarity = similarity;

        let status = if similarity >= 1.0 || self.iteration >= self.max_iterations {
            Status::converged(similarity)
        } else {
            self.finished = false;
            Status::Continuing
        };
        Some(self.snapshot(status, Some(rewrite)))
    }
}

/// Creates a [`Search`] over the given trees.
pub fn search(left: Expr, right: Expr, max_iterations: usize, timeout: Duration) -> Search {
    Search::new(left, right, max_iterations, timeout)
}
