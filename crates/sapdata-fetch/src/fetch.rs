//! The resumable fetch state machine.

mod fetcher;

pub use fetcher::{CHUNK_SIZE, Fetcher, file_name_of};
