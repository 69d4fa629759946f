//! Use-case layer over the catalog ports and the blob store.

pub mod albums;
pub mod tracks;

pub use albums::AlbumService;
pub use tracks::{TrackPayload, TrackService};
