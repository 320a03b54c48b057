//! Line File Module
//!
//! Line-granular manipulation of a plain text file, oblivious to payload.
//!
//! ## Responsibilities
//! - Existence check, creation, clearing and removal of the file
//! - Appending one line at a time
//! - Streaming reads front-to-back, and a reverse read of the last line
//! - Positional replace/remove (1-based), compacting following lines upward
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ line 1 ............................ \n  │
//! │ line 2 ............................ \n  │
//! │ ...                                     │
//! │ line N ............................ \n  │
//! └─────────────────────────────────────────┘
//! ```
//! No header, footer or line count is stored. An empty file is valid.
//!
//! ## Durability
//! Appends write straight to the end of the file. Positional writes stream the
//! file into a sibling `*.rewrite` file and rename it over the original, so a
//! reader without the store's lock sees either the old or the new contents.
//! Nothing here is atomic across process crashes; a torn final line is left
//! for the record codec to discard.

mod reader;
mod store;

pub use reader::LineIter;
pub use store::LineFile;
