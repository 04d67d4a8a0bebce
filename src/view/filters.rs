//! "All or one value" filters used by the news and stock sections.

use std::fmt;
use std::str::FromStr;

/// `All`, or keep only items whose field equals the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(want) => want == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::Only(v) => v.fmt(f),
        }
    }
}

/// `"All"` (any case) or whatever `T` parses from. Blank means `All`.
impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Only)
    }
}

/// Keep matching items, preserving their relative order.
pub fn apply<I, T, F>(items: &[I], filter: &Filter<T>, key: F) -> Vec<I>
where
    I: Clone,
    T: PartialEq,
    F: Fn(&I) -> &T,
{
    items
        .iter()
        .filter(|it| filter.matches(key(*it)))
        .cloned()
        .collect()
}
