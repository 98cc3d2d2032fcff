//! Classification of a source scan against a destination registry.

use crate::Registry;

/// Outcome of comparing a source registry with a destination registry.
///
/// `new`, `updated` and `unchanged` partition the source keys; `deletable`
/// holds the destination keys absent from the source. Every list is sorted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Classification {
    new: Vec<String>,
    updated: Vec<String>,
    unchanged: Vec<String>,
    deletable: Vec<String>,
}

impl Classification {
    /// Source keys missing from the destination.
    #[must_use]
    pub fn new_keys(&self) -> &[String] {
        &self.new
    }

    /// Keys present on both sides with differing modification times.
    #[must_use]
    pub fn updated(&self) -> &[String] {
        &self.updated
    }

    /// Keys present on both sides with identical modification times.
    #[must_use]
    pub fn unchanged(&self) -> &[String] {
        &self.unchanged
    }

    /// Destination keys no longer present in the source.
    #[must_use]
    pub fn deletable(&self) -> &[String] {
        &self.deletable
    }

    /// Keys that need their content copied: new first, then updated.
    pub fn to_copy(&self) -> impl Iterator<Item = &str> {
        self.new
            .iter()
            .chain(self.updated.iter())
            .map(String::as_str)
    }
}

/// Classifies every source key as new, updated or unchanged, and every
/// destination-only key as deletable.
///
/// Timestamps compare exactly; a one-nanosecond difference is an update.
///
/// ```
/// use compress::Compressor;
/// use engine::{Registry, diff};
/// use walk::Timestamp;
///
/// let t1 = Timestamp::from_parts(100, 0);
/// let t2 = Timestamp::from_parts(100, 1);
/// let source = Registry::from_entries(Compressor::None, [("a", t2), ("b", t1)]);
/// let destination = Registry::from_entries(Compressor::Gzip, [("a", t1), ("c", t1)]);
///
/// let classification = diff(&source, &destination);
/// assert_eq!(classification.updated(), ["a"]);
/// assert_eq!(classification.new_keys(), ["b"]);
/// assert_eq!(classification.deletable(), ["c"]);
/// ```
#[must_use]
pub fn diff(source: &Registry, destination: &Registry) -> Classification {
    let mut classification = Classification::default();

    for (key, modified) in source.iter() {
        match destination.get(key) {
            None => classification.new.push(key.to_owned()),
            Some(previous) if previous == modified => {
                classification.unchanged.push(key.to_owned());
            }
            Some(_) => classification.updated.push(key.to_owned()),
        }
    }

    classification.deletable = destination
        .keys()
        .filter(|key| !source.contains(key))
        .map(str::to_owned)
        .collect();

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use compress::Compressor;
    use walk::Timestamp;

    fn ts(seconds: i64) -> Timestamp {
        Timestamp::from_parts(seconds, 0)
    }

    #[test]
    fn empty_destination_makes_everything_new() {
        let source = Registry::from_entries(Compressor::None, [("a.txt", ts(1)), ("b.txt", ts(1))]);
        let classification = diff(&source, &Registry::new(Compressor::Gzip));

        assert_eq!(classification.new_keys(), ["a.txt", "b.txt"]);
        assert!(classification.updated().is_empty());
        assert!(classification.unchanged().is_empty());
        assert!(classification.deletable().is_empty());
    }

    #[test]
    fn changed_time_is_update_and_fresh_file_is_new() {
        let source = Registry::from_entries(Compressor::None, [("a.txt", ts(2)), ("b.txt", ts(1))]);
        let destination = Registry::from_entries(Compressor::Gzip, [("a.txt", ts(1))]);
        let classification = diff(&source, &destination);

        assert_eq!(classification.updated(), ["a.txt"]);
        assert_eq!(classification.new_keys(), ["b.txt"]);
        assert!(classification.deletable().is_empty());
        assert_eq!(classification.to_copy().collect::<Vec<_>>(), ["b.txt", "a.txt"]);
    }

    #[test]
    fn vanished_source_file_is_deletable() {
        let source = Registry::from_entries(Compressor::None, [("a.txt", ts(1))]);
        let destination =
            Registry::from_entries(Compressor::Gzip, [("a.txt", ts(1)), ("c.txt", ts(1))]);
        let classification = diff(&source, &destination);

        assert_eq!(classification.unchanged(), ["a.txt"]);
        assert_eq!(classification.deletable(), ["c.txt"]);
    }

    #[test]
    fn sub_second_difference_is_an_update() {
        let source = Registry::from_entries(Compressor::None, [("f", Timestamp::from_parts(5, 1))]);
        let destination = Registry::from_entries(Compressor::None, [("f", Timestamp::from_parts(5, 0))]);
        assert_eq!(diff(&source, &destination).updated(), ["f"]);
    }
}
