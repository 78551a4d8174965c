//! Loose version ordering.
//!
//! Versions are split into runs of digits and runs of other characters,
//! with dots acting only as separators. Numeric runs compare numerically,
//! text runs lexically, and a number always sorts before text. This
//! orders `1.15.0` after `1.7` and `2.0.0rc1` after `2.0.0`.

use std::cmp::Ordering;

/// One component of a loose version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Component {
    Number(u64),
    Text(String),
}

/// A version string ordered by its components.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    components: Vec<Component>,
}

#[derive(Clone, Copy, PartialEq)]
enum Run {
    Digit,
    Alpha,
    Other,
}

fn run_of(c: char) -> Run {
    if c.is_ascii_digit() {
        Run::Digit
    } else if c.is_alphabetic() {
        Run::Alpha
    } else {
        Run::Other
    }
}

impl LooseVersion {
    /// Parse a version string. Every string is accepted.
    pub fn parse(raw: &str) -> Self {
        let mut components = Vec::new();
        let mut current = String::new();
        let mut current_run = Run::Other;

        let mut flush = |current: &mut String, run: Run| {
            if current.is_empty() {
                return;
            }
            let token = std::mem::take(current);
            let component = match (run, token.parse::<u64>()) {
                (Run::Digit, Ok(n)) => Component::Number(n),
                _ => Component::Text(token),
            };
            components.push(component);
        };

        for c in raw.trim().chars() {
            if c == '.' {
                flush(&mut current, current_run);
                continue;
            }
            let run = run_of(c);
            if run != current_run || run == Run::Other {
                flush(&mut current, current_run);
                current_run = run;
            }
            current.push(c);
        }
        flush(&mut current, current_run);

        Self {
            components,
        }
    }

    /// The first two components when both are numeric.
    pub fn major_minor(&self) -> Option<(u64, u64)> {
        match self.components.as_slice() {
            [Component::Number(major), Component::Number(minor), ..] => Some((*major, *minor)),
            _ => None,
        }
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for LooseVersion {}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}
