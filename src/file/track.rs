use alloc::vec::Vec;

use crate::Message;

/// One event of a track: a delta time in ticks and the message it carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent<'a> {
    delta: u32,
    message: Message<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Pair a message with the ticks elapsed since the previous event in
    /// the same track.
    pub const fn new(delta: u32, message: Message<'a>) -> Self {
        Self { delta, message }
    }

    /// Ticks since the previous event in the same track
    pub const fn delta(&self) -> u32 {
        self.delta
    }

    /// The message
    pub const fn message(&self) -> &Message<'a> {
        &self.message
    }

    /// Detach from the source buffer
    pub fn into_owned(self) -> TrackEvent<'static> {
        TrackEvent {
            delta: self.delta,
            message: self.message.into_owned(),
        }
    }

    /// Split into the delta and the message
    pub fn into_parts(self) -> (u32, Message<'a>) {
        (self.delta, self.message)
    }
}

/// An ordered sequence of delta-timed events.
///
/// Tracks have no identity beyond their order of appearance in the file.
/// A parse constructs them once; a writer may also build one incrementally
/// with [`push`](Track::push) before serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track<'a> {
    events: Vec<TrackEvent<'a>>,
}

impl<'a> Track<'a> {
    /// An empty track.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// A track over the given events.
    pub const fn from_events(events: Vec<TrackEvent<'a>>) -> Self {
        Self { events }
    }

    /// Append an event.
    pub fn push(&mut self, delta: u32, message: Message<'a>) {
        self.events.push(TrackEvent::new(delta, message));
    }

    /// The events in file order
    pub fn events(&self) -> &[TrackEvent<'a>] {
        &self.events
    }

    /// The number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over `(absolute_tick, event)` pairs, summing deltas.
    pub fn ticked(&self) -> impl Iterator<Item = (u32, &TrackEvent<'a>)> {
        self.events.iter().scan(0u32, |tick, event| {
            *tick = tick.saturating_add(event.delta());
            Some((*tick, event))
        })
    }

    /// Detach from the source buffer
    pub fn into_owned(self) -> Track<'static> {
        Track {
            events: self
                .events
                .into_iter()
                .map(TrackEvent::into_owned)
                .collect(),
        }
    }

    /// Consume into the event list
    pub fn into_events(self) -> Vec<TrackEvent<'a>> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticked_accumulates_deltas() {
        let mut track = Track::new();
        track.push(0, Message::note_on(0, 60, 100));
        track.push(96, Message::note_off(0, 60));
        track.push(96, Message::end_of_track());

        let ticks: Vec<u32> = track.ticked().map(|(tick, _)| tick).collect();
        assert_eq!(ticks, [0, 96, 192]);
    }
}
