use alloc::vec::Vec;

use crate::{FileError, Header, reader::FileEvent};

use super::{SmfFile, Track};

/// Folds [`FileEvent`]s from a [`Reader`](crate::reader::Reader) into an
/// [`SmfFile`].
#[derive(Default)]
pub struct SmfFileBuilder<'a> {
    header: Option<Header>,
    tracks: Vec<Track<'a>>,
}

impl<'a> SmfFileBuilder<'a> {
    /// A builder with nothing handled yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one event pulled from a reader.
    pub fn handle_event(&mut self, event: FileEvent<'a>) -> Result<(), FileError> {
        match event {
            FileEvent::Header(header) => {
                if self.header.is_some() {
                    return Err(FileError::DuplicateHeader);
                }
                self.header = Some(header);
                Ok(())
            }
            FileEvent::Track(_) => {
                self.tracks.push(Track::new());
                Ok(())
            }
            FileEvent::TrackEvent(event) => {
                let Some(track) = self.tracks.last_mut() else {
                    return Err(FileError::EventOutsideTrack);
                };
                let (position, message) = event.into_parts();
                track.push(position.delta, message);
                Ok(())
            }
            // unrecognized chunks carry nothing a file representation keeps
            FileEvent::Unknown(_) => Ok(()),
            FileEvent::Finished => Ok(()),
        }
    }

    /// Attempts to finish the file from the handled events.
    pub fn build(self) -> Result<SmfFile<'a>, FileError> {
        let Some(header) = self.header else {
            return Err(FileError::NoHeader);
        };
        Ok(SmfFile::from_parts(header, self.tracks))
    }
}
