//! Source span tracking

/// A byte range in the source text a CST token was produced from.
///
/// Spans are optional at the input boundary: a CST built by hand (tests,
/// synthetic trees) carries default spans and diagnostics degrade to plain
/// messages without source labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
