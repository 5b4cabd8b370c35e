// Marshaling primitives shared by every boundary adapter.
pub mod bytes;
pub mod error;
pub mod handle;
pub mod shared;
pub mod strings;
pub mod variant;
