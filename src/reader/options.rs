use core::num::NonZeroU16;

#[doc = r#"
Options recognized by the SMF [`Reader`](super::Reader).

All options default to off: zero-velocity note-ons are normalized to
note-offs, unknown chunks are skipped by their declared length, and reading
starts at the `MThd` header.
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    pub(crate) pedantic_note_off: bool,
    pub(crate) fail_on_unknown_chunks: bool,
    pub(crate) resume: Option<Resume>,
}

/// Where a resumed reader picks up in a partially consumed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    PostHeader(NonZeroU16),
    InsideTrack(NonZeroU16),
}

impl ReaderOptions {
    /// The default options.
    pub const fn new() -> Self {
        Self {
            pedantic_note_off: false,
            fail_on_unknown_chunks: false,
            resume: None,
        }
    }

    /// Keep zero-velocity note-on events distinct from true note-offs.
    ///
    /// By default both arrive as note-offs, so consumers only ever have to
    /// check one kind of note end. Pedantic reading preserves the original
    /// encoding (and with it the fake note-off convention) for consumers
    /// that care about the difference.
    pub const fn pedantic_note_off(mut self) -> Self {
        self.pedantic_note_off = true;
        self
    }

    /// Treat unrecognized chunk types as fatal instead of skipping them by
    /// their declared length.
    pub const fn fail_on_unknown_chunks(mut self) -> Self {
        self.fail_on_unknown_chunks = true;
        self
    }

    /// Resume a stream positioned just past the `MThd` header, with
    /// `remaining_tracks` track chunks still expected.
    pub const fn post_header(mut self, remaining_tracks: NonZeroU16) -> Self {
        self.resume = Some(Resume::PostHeader(remaining_tracks));
        self
    }

    /// Resume a stream positioned inside a track chunk (past its header),
    /// with `remaining_tracks` tracks still expected including the current
    /// one. The current track runs until its end-of-track meta event.
    pub const fn inside_track(mut self, remaining_tracks: NonZeroU16) -> Self {
        self.resume = Some(Resume::InsideTrack(remaining_tracks));
        self
    }
}
