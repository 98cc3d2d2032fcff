use std::sync::Arc;

use regex::Regex;

use crate::{ExclusionPattern, FilterError};

/// Compiled, immutable collection of exclusion patterns.
///
/// `ExclusionMatcher` is cheaply cloneable (the compiled expressions live
/// behind an [`Arc`]), so the same matcher can be shared by the source and
/// destination scans of every path.
#[derive(Clone, Debug, Default)]
pub struct ExclusionMatcher {
    compiled: Arc<[CompiledPattern]>,
}

#[derive(Debug)]
struct CompiledPattern {
    pattern: ExclusionPattern,
    regex: Regex,
}

impl ExclusionMatcher {
    /// Compiles every pattern in `patterns`.
    pub fn compile<I, P>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = P>,
        P: Into<ExclusionPattern>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.into();
                Regex::new(&pattern.to_regex())
                    .map(|regex| CompiledPattern {
                        pattern: pattern.clone(),
                        regex,
                    })
                    .map_err(|error| FilterError::new(pattern.glob().to_owned(), error))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            compiled: compiled.into(),
        })
    }

    /// Returns a matcher that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` when no patterns were compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Returns the number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Iterates over the patterns in compilation order.
    pub fn patterns(&self) -> impl Iterator<Item = &ExclusionPattern> {
        self.compiled.iter().map(|compiled| &compiled.pattern)
    }

    /// Reports whether `path` matches any pattern.
    #[must_use]
    pub fn excluded(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Returns the first pattern matching `path`, if any.
    #[must_use]
    pub fn matching_pattern(&self, path: &str) -> Option<&ExclusionPattern> {
        let found = self
            .compiled
            .iter()
            .find(|compiled| compiled.regex.is_match(path))
            .map(|compiled| &compiled.pattern);

        #[cfg(feature = "tracing")]
        if let Some(pattern) = found {
            tracing::trace!(target: "backup::filter", %path, %pattern, "excluded");
        }

        found
    }
}
