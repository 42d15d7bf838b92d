//! `FallbackResult`: the value a degraded call returns in place of the
//! real one, plus why (spec §4.9).

/// Wraps a value a caller gets back when the real call was skipped by an
/// open circuit breaker, carrying a cached-or-default value and a reason.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackResult<T> {
    pub value: T,
    pub from_fallback: bool,
    pub reason: Option<&'static str>,
}

impl<T> FallbackResult<T> {
    /// The real call went through; no degradation occurred.
    pub fn live(value: T) -> Self {
        FallbackResult {
            value,
            from_fallback: false,
            reason: None,
        }
    }

    /// The real call was skipped; `value` is cached-or-default.
    pub fn fallback(value: T, reason: &'static str) -> Self {
        FallbackResult {
            value,
            from_fallback: true,
            reason: Some(reason),
        }
    }
}
