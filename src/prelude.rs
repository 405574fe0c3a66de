#![doc = r#"
A flat import surface for the whole crate.

```rust
use midiwire::prelude::*;
```
"#]

pub use crate::bytes::*;
pub use crate::error::*;
pub use crate::file::*;
pub use crate::live::*;
pub use crate::message::*;
pub use crate::reader::{
    FileEvent, Position, PositionedEvent, ReadResult, Reader, ReaderError, ReaderErrorKind,
    ReaderOptions, TrackHeader, UnknownChunk, Warning,
};
pub use crate::running_status::*;
pub use crate::writer::{TrackEncoder, WriterOptions, write_header, write_track};
