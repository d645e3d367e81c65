//! Peer block scanning and structural editing.
//!
//! Works on the text of a WireGuard-style server config holding one `[Peer]`
//! section per client:
//!
//! ```text
//! [Peer]
//! PublicKey = <key>
//! AllowedIPs = 10.0.0.2/32
//! # Client: alice
//! ```
//!
//! # Two layers
//!
//! - [`scanner`] delimits blocks structurally (header, blank line, next
//!   header, end of input) and pulls fields out of a single block's text.
//! - [`editor`] resolves a [`ClientIdentity`] to one block, by name comment
//!   first and public key second, and removes it without touching any other
//!   byte of the document.
//!
//! Nothing here performs I/O. Every operation takes the document as a `&str`
//! and returns new values; reading and writing the file is the caller's job.

pub mod editor;
pub mod error;
pub mod scanner;

pub use editor::{
    ClientIdentity, MatchKind, MatchOutcome, PeerRecord, Removal, UNKNOWN, find_block,
    list_fields, remove_block, resolve_allowed_ip,
};
pub use error::{Error, Result};
pub use scanner::{FieldPattern, PeerBlock, Segment, extract_field, partition, scan};
