//! Core domain types for boxoffice.
//!
//! This module defines the event model every other module depends on: the
//! shared [`Event`] record, the per-kind [`EventDetails`] carrying the
//! kind-specific field, and the [`EventKind`] tag used when events are built
//! from text.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The fixed set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A music concert.
    Concert,
    /// A theater performance.
    Theater,
    /// A seminar or talk.
    Seminar,
}

impl EventKind {
    /// Returns the display label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Concert => "Concert",
            EventKind::Theater => "Theater",
            EventKind::Seminar => "Seminar",
        }
    }
}

impl FromStr for EventKind {
    type Err = Error;

    /// Parses a kind name case-insensitively. `Teatru` is accepted as an alias
    /// of `Theater`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concert" => Ok(EventKind::Concert),
            "theater" | "theatre" | "teatru" => Ok(EventKind::Theater),
            "seminar" => Ok(EventKind::Seminar),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind-specific part of an [`Event`].
///
/// Adding a kind means adding a variant here; the catalog and the ledger only
/// ever see whole `Event` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetails {
    /// Concert with its music genre.
    Concert {
        /// Music genre (e.g. "Pop").
        music_genre: String,
    },
    /// Theater performance with its play type.
    Theater {
        /// Play type (e.g. "Comedie").
        play_type: String,
    },
    /// Seminar with its topic.
    Seminar {
        /// Seminar topic.
        topic: String,
    },
}

impl EventDetails {
    /// Returns the kind tag of these details.
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetails::Concert { .. } => EventKind::Concert,
            EventDetails::Theater { .. } => EventKind::Theater,
            EventDetails::Seminar { .. } => EventKind::Seminar,
        }
    }

    /// Returns the label and value of the kind-specific field.
    fn extra_field(&self) -> (&'static str, &str) {
        match self {
            EventDetails::Concert { music_genre } => ("Music genre", music_genre),
            EventDetails::Theater { play_type } => ("Play type", play_type),
            EventDetails::Seminar { topic } => ("Topic", topic),
        }
    }
}

/// One bookable event.
///
/// Fields are private and there are no setters: an event never changes after
/// construction. Events have no id of their own; the catalog position is the
/// only identity. `Clone` is a deep copy that carries the kind-specific field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    location: String,
    date: String,
    details: EventDetails,
}

impl Event {
    /// Build an event of the named kind.
    ///
    /// # Arguments
    ///
    /// * `kind` - Kind name, one of `Concert`, `Theater`, `Seminar` (case-insensitive).
    /// * `name` - Event name.
    /// * `location` - Venue.
    /// * `date` - Opaque display date.
    /// * `extra` - Kind-specific field: music genre, play type or topic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKind`] if `kind` is not a supported kind.
    pub fn create(
        kind: &str,
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        extra: impl Into<String>,
    ) -> Result<Event, Error> {
        let extra = extra.into();
        let details = match kind.parse::<EventKind>()? {
            EventKind::Concert => EventDetails::Concert { music_genre: extra },
            EventKind::Theater => EventDetails::Theater { play_type: extra },
            EventKind::Seminar => EventDetails::Seminar { topic: extra },
        };
        Ok(Event::new(name, location, date, details))
    }

    /// Build an event from already-typed details.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        details: EventDetails,
    ) -> Event {
        Event {
            name: name.into(),
            location: location.into(),
            date: date.into(),
            details,
        }
    }

    /// Build a concert.
    pub fn concert(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        music_genre: impl Into<String>,
    ) -> Event {
        let music_genre = music_genre.into();
        Event::new(name, location, date, EventDetails::Concert { music_genre })
    }

    /// Build a theater performance.
    pub fn theater(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        play_type: impl Into<String>,
    ) -> Event {
        let play_type = play_type.into();
        Event::new(name, location, date, EventDetails::Theater { play_type })
    }

    /// Build a seminar.
    pub fn seminar(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        topic: impl Into<String>,
    ) -> Event {
        let topic = topic.into();
        Event::new(name, location, date, EventDetails::Seminar { topic })
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Venue.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Date, as free text.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Kind, derived from the details variant.
    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }

    /// Kind-specific extra field.
    pub fn details(&self) -> &EventDetails {
        &self.details
    }
}

impl fmt::Display for Event {
    /// Two lines: shared fields in the order kind, name, location, date, then
    /// the kind-specific field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, value) = self.details.extra_field();
        write!(
            f,
            "Event type: {}, Event: {}, Location: {}, Date: {}\n{}: {}",
            self.kind(),
            self.name,
            self.location,
            self.date,
            label,
            value
        )
    }
}
