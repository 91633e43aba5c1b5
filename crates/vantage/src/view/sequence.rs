//! Sequence numbering for dynamic views.
//!
//! Relationships added to a dynamic view are stamped with an [`Order`]
//! token reflecting call order. Parallel blocks share a common prefix and
//! branch into sub-indices, so a flow like "1", "1.1", "1.2", "2" reads
//! exactly as the interaction happened.

use std::{cmp::Ordering, fmt};

/// Order token stamped onto a relationship in a dynamic view.
///
/// Tokens are dot-separated counters ("1", "1.2", "1.2.3"). Comparison is
/// numeric per segment, so "10" sorts after "9" and "1.10" after "1.2";
/// sorting a dynamic view's relationships by token reproduces the order
/// the interactions were added in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order(String);

impl Order {
    fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Ord for Order {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.0.split('.');
        let mut rhs = other.0.split('.');
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    let ordering = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(a), Ok(b)) => a.cmp(&b),
                        _ => a.cmp(b),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
        }
    }
}

impl PartialOrd for Order {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One nesting level of sequence numbering.
///
/// The root frame has no prefix; a frame opened by a parallel sequence
/// carries the token it branched from as its prefix. Each frame keeps its
/// own counter, so ending a parallel sequence resumes the outer counter
/// exactly where it stood.
#[derive(Debug, Clone)]
struct Frame {
    prefix: Option<String>,
    counter: u64,
}

impl Frame {
    fn token(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{}", self.counter),
            None => self.counter.to_string(),
        }
    }
}

/// Mutable sequence numbering state for one dynamic view.
///
/// The counter starts at 0 and is pre-incremented on each issuance, so the
/// first token is "1". This is an explicit per-view value; a view owns
/// exactly one and nothing else shares it.
#[derive(Debug, Clone)]
pub(crate) struct SequenceNumber {
    frames: Vec<Frame>,
}

impl SequenceNumber {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame {
                prefix: None,
                counter: 0,
            }],
        }
    }

    fn active(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("sequence always has a root frame")
    }

    /// Issues the next token in the active context.
    pub(crate) fn next(&mut self) -> Order {
        let frame = self.active();
        frame.counter += 1;
        Order::new(frame.token())
    }

    /// Opens a nested parallel context branching from the current token.
    pub(crate) fn start_parallel(&mut self) {
        let prefix = self.active().token();
        self.frames.push(Frame {
            prefix: Some(prefix),
            counter: 0,
        });
    }

    /// Closes the innermost parallel context, resuming the outer counter.
    ///
    /// Returns `false` if no parallel context was open.
    pub(crate) fn end_parallel(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn tokens(sequence: &mut SequenceNumber, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| sequence.next().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_sequential_tokens() {
        let mut sequence = SequenceNumber::new();
        assert_eq!(tokens(&mut sequence, 3), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parallel_tokens() {
        let mut sequence = SequenceNumber::new();
        assert_eq!(sequence.next().as_str(), "1");

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "1.1");
        assert_eq!(sequence.next().as_str(), "1.2");
        assert!(sequence.end_parallel());

        assert_eq!(sequence.next().as_str(), "2");
    }

    #[test]
    fn resuming_outer_counter_is_preserved() {
        // Each nesting level keeps its own counter: an inner parallel block
        // never disturbs where the outer sequence resumes.
        let mut sequence = SequenceNumber::new();
        assert_eq!(tokens(&mut sequence, 2), vec!["1", "2"]);

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "2.1");
        assert!(sequence.end_parallel());

        assert_eq!(sequence.next().as_str(), "3");
    }

    #[test]
    fn nested_parallel_two_levels() {
        let mut sequence = SequenceNumber::new();
        assert_eq!(sequence.next().as_str(), "1");

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "1.1");

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "1.1.1");
        assert!(sequence.end_parallel());

        assert_eq!(sequence.next().as_str(), "1.2");
        assert!(sequence.end_parallel());

        assert_eq!(sequence.next().as_str(), "2");
    }

    #[test]
    fn test_end_without_start_is_reported() {
        let mut sequence = SequenceNumber::new();
        assert!(!sequence.end_parallel());
        assert_eq!(sequence.next().as_str(), "1");
    }

    #[test]
    fn test_order_numeric_segments() {
        assert!(Order::new("9".into()) < Order::new("10".into()));
        assert!(Order::new("1.2".into()) < Order::new("1.10".into()));
        assert!(Order::new("1.2".into()) < Order::new("1.2.1".into()));
        assert!(Order::new("1.2.1".into()) < Order::new("2".into()));
        assert_eq!(Order::new("1.2".into()), Order::new("1.2".into()));
    }

    #[test]
    fn sibling_parallel_blocks_share_numbering() {
        // Two parallel blocks branching from the same token describe
        // branches that happen at the same time; their sub-indices repeat
        // on purpose.
        let mut sequence = SequenceNumber::new();
        assert_eq!(sequence.next().as_str(), "1");

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "1.1");
        assert!(sequence.end_parallel());

        sequence.start_parallel();
        assert_eq!(sequence.next().as_str(), "1.1");
        assert!(sequence.end_parallel());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Next,
        Start,
        End,
    }

    /// Generates a well-formed interaction: runs of `next()` with properly
    /// nested parallel blocks, each block branching from a freshly issued
    /// token. Sibling blocks branching from the same token are excluded;
    /// those share numbering by design.
    fn ops_strategy(depth: u32) -> BoxedStrategy<Vec<Op>> {
        let segment = if depth == 0 {
            (1usize..4, Just(None::<Vec<Op>>)).boxed()
        } else {
            (1usize..4, prop::option::of(ops_strategy(depth - 1))).boxed()
        };
        prop::collection::vec(segment, 1..4)
            .prop_map(|segments| {
                let mut ops = Vec::new();
                for (nexts, block) in segments {
                    for _ in 0..nexts {
                        ops.push(Op::Next);
                    }
                    if let Some(inner) = block {
                        ops.push(Op::Start);
                        ops.extend(inner);
                        ops.push(Op::End);
                    }
                }
                ops
            })
            .boxed()
    }

    proptest! {
        /// For well-formed nestings, tokens compare strictly increasing in
        /// issuance order: sorting by token reproduces call order.
        #[test]
        fn issuance_order_equals_token_order(ops in ops_strategy(3)) {
            let mut sequence = SequenceNumber::new();
            let mut issued = Vec::new();
            for op in ops {
                match op {
                    Op::Next => issued.push(sequence.next()),
                    Op::Start => sequence.start_parallel(),
                    Op::End => {
                        sequence.end_parallel();
                    }
                }
            }
            for pair in issued.windows(2) {
                prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
            }
        }
    }
}
