//! Shared error plumbing for the `kit-*` crates.
//!
//! Every `kit-*` crate defines its own `thiserror`-derived enum scoped to the
//! module area it covers (mirrors the teacher's one-enum-per-crate style, e.g.
//! `SolendError`, `KaminoError`), and implements [`ErrorCode`] on it so
//! callers can match on a stable string code without downcasting. This crate
//! only holds the trait and the cause-chain walker shared by all of them.

use std::error::Error as StdError;

/// A stable, matchable identifier for an error variant, independent of its
/// `Display` text (which may gain detail over time).
pub trait ErrorCode: StdError {
    fn code(&self) -> &'static str;
}

/// Walks `err`'s `source()` chain and returns the deepest cause.
///
/// Used by `kit-instruction-plan::confirm::unwrap_simulation_error` to peel
/// preflight/simulation wrapper errors down to the error a caller actually
/// wants to match on.
pub fn root_cause(err: &(dyn StdError + 'static)) -> &(dyn StdError + 'static) {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("inner")]
    struct Inner;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("wrapper")]
    struct Wrapper(#[source] Outer);

    #[test]
    fn root_cause_descends_to_the_bottom() {
        let err = Wrapper(Outer(Inner));
        let root = root_cause(&err);
        assert_eq!(root.to_string(), "inner");
    }

    #[test]
    fn root_cause_of_a_leaf_is_itself() {
        let err = Inner;
        let root = root_cause(&err);
        assert_eq!(root.to_string(), "inner");
    }
}
