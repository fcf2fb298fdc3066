//! Append-only catalog with 1-based, user-facing positions.
//!
//! [`Catalog`] is generic over its entries so it can hold anything displayable;
//! the program uses it as [`EventCatalog`]. Entries are never removed or
//! reordered, so a position handed out once stays valid for the session.

use std::fmt;

use crate::error::Error;
use crate::types::Event;

/// Catalog of bookable events.
pub type EventCatalog = Catalog<Event>;

/// Ordered, append-only collection addressed by 1-based position.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Catalog<T> {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Its position is the new `count()`.
    pub fn add(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Look up the entry at a 1-based position.
    ///
    /// # Arguments
    ///
    /// * `position` - 1-based position. Signed so that raw user input can be
    ///   passed through and rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position < 1` or
    /// `position > count()`. Positions are never clamped.
    pub fn get(&self, position: i64) -> Result<&T, Error> {
        let out_of_range = || Error::IndexOutOfRange {
            position,
            len: self.entries.len(),
        };
        let offset = usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .ok_or_else(out_of_range)?;
        self.entries.get(offset).ok_or_else(out_of_range)
    }

    /// Number of entries; also the highest valid position.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries together with their 1-based positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }
}

impl<T: fmt::Display> Catalog<T> {
    /// One display string per entry, in order: `"<position>) <entry>"`.
    pub fn render(&self) -> Vec<String> {
        self.iter()
            .map(|(position, entry)| format!("{position}) {entry}"))
            .collect()
    }
}

/// The catalog the program ships with.
pub fn default_catalog() -> EventCatalog {
    let mut catalog = EventCatalog::new();
    catalog.add(Event::concert(
        "Concert Ed Sheeran",
        "Arena Nationala",
        "24.08.2024",
        "Pop",
    ));
    catalog.add(Event::theater(
        "O scrisoare pierduta",
        "Teatrul National",
        "13.03.2025",
        "Comedie",
    ));
    catalog.add(Event::seminar(
        "Tehnologii AI",
        "Centrul de Conferinte",
        "18.01.2025",
        "Inteligenta Artificiala",
    ));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_events() -> EventCatalog {
        let mut catalog = EventCatalog::new();
        catalog.add(Event::concert("A", "La", "Da", "Pop"));
        catalog.add(Event::theater("B", "Lb", "Db", "Drama"));
        catalog.add(Event::seminar("C", "Lc", "Dc", "Rust"));
        catalog
    }

    #[test]
    fn get_valid_positions_returns_inserted_entries() {
        let catalog = three_events();
        let names: Vec<&str> = (1..=catalog.count() as i64)
            .map(|p| catalog.get(p).expect("in range").name())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn get_zero_negative_and_past_end_fail() {
        let catalog = three_events();
        for position in [0, -1, i64::MIN, 4, i64::MAX] {
            match catalog.get(position) {
                Err(Error::IndexOutOfRange { position: p, len }) => {
                    assert_eq!(p, position);
                    assert_eq!(len, 3);
                }
                other => panic!("expected IndexOutOfRange for {position}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn get_on_empty_catalog_fails() {
        let catalog: Catalog<String> = Catalog::new();
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.get(1),
            Err(Error::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn render_prefixes_one_based_positions() {
        let lines = three_events().render();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1) Event type: Concert"), "got: {}", lines[0]);
        assert!(lines[1].starts_with("2) Event type: Theater"), "got: {}", lines[1]);
        assert!(lines[2].contains("Topic: Rust"), "got: {}", lines[2]);
    }

    #[test]
    fn generic_over_displayable_entries() {
        let mut catalog = Catalog::new();
        catalog.add("first");
        catalog.add("second");
        assert_eq!(catalog.render(), vec!["1) first", "2) second"]);
    }

    #[test]
    fn default_catalog_has_one_event_per_kind() {
        let catalog = default_catalog();
        assert_eq!(catalog.count(), 3);
        assert_eq!(
            catalog.get(2).expect("second entry").name(),
            "O scrisoare pierduta"
        );
    }
}
