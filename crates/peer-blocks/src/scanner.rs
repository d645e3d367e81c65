//! Peer block scanning.
//!
//! Delimits `[Peer]` sections in a server config:
//! ```text
//! [Interface]
//! PrivateKey = ...
//!
//! [Peer]
//! PublicKey = ...
//! AllowedIPs = 10.0.0.2/32
//! # Client: alice
//! ```
//!
//! A block opens on a line whose trimmed content is exactly `[Peer]` and runs
//! until the next blank line, the next `[Peer]` line, or the end of the
//! document. The terminating blank line belongs to the surrounding gap.
//! Scanning never fails; a block with missing fields is still a block.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::error::Result;

/// Section header that opens a peer block.
pub const PEER_HEADER: &str = "[Peer]";

/// Splits a document into lines, each keeping its own terminator.
///
/// Joining the returned slices yields the input unchanged, including `\r\n`
/// endings and a missing final newline.
pub fn split_lines(document: &str) -> Vec<&str> {
    document.split_inclusive('\n').collect()
}

/// A delimited `[Peer]` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerBlock {
    /// 0-based index of the `[Peer]` header line.
    pub start: usize,
    /// 0-based index one past the last line of the block.
    pub end: usize,
    /// The block's lines joined verbatim.
    pub text: String,
}

impl PeerBlock {
    fn from_lines(lines: &[&str], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: lines[start..end].concat(),
        }
    }

    /// The half-open line range this block occupies.
    pub fn lines(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True for a bare `[Peer]` header with no field lines.
    pub fn is_empty_body(&self) -> bool {
        self.end - self.start <= 1
    }

    /// The name carried by a `# Client: <name>` comment.
    pub fn client_name(&self) -> Option<String> {
        extract_field(&self.text, &CLIENT_NAME)
    }

    /// The value of the `PublicKey = ...` line.
    pub fn public_key(&self) -> Option<String> {
        extract_field(&self.text, &PUBLIC_KEY)
    }

    /// The IPv4 address of an `AllowedIPs = <ip>/32` line, without the prefix.
    pub fn allowed_ip(&self) -> Option<String> {
        extract_field(&self.text, &ALLOWED_IP)
    }
}

/// A compiled pattern that pulls one field out of a block's text.
///
/// The first capture group is the field value; a pattern without groups
/// yields the whole match.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

static CLIENT_NAME: LazyLock<FieldPattern> = LazyLock::new(|| {
    FieldPattern::compile(r"(?m)#[ \t]*Client:[ \t]*(\S[^\r\n]*?)[ \t]*\r?$")
});

static PUBLIC_KEY: LazyLock<FieldPattern> =
    LazyLock::new(|| FieldPattern::compile(r"(?m)^[ \t]*PublicKey[ \t]*=[ \t]*(\S+)"));

static ALLOWED_IP: LazyLock<FieldPattern> = LazyLock::new(|| {
    FieldPattern::compile(r"(?m)^[ \t]*AllowedIPs[ \t]*=[ \t]*([0-9.]+)/32")
});

impl FieldPattern {
    /// Compiles a caller-supplied pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    fn compile(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("Invalid built-in field pattern"),
        }
    }

    /// `# Client: <name>` comment value.
    pub fn client_name() -> &'static FieldPattern {
        &CLIENT_NAME
    }

    /// `PublicKey = <value>`.
    pub fn public_key() -> &'static FieldPattern {
        &PUBLIC_KEY
    }

    /// `AllowedIPs = <ip>/32`, capturing the address.
    pub fn allowed_ip() -> &'static FieldPattern {
        &ALLOWED_IP
    }

    /// Matches the `# Client: <name>` marker for exactly this name.
    ///
    /// The name is escaped and must end the comment line, so `alice` does not
    /// match `# Client: alice2`.
    pub fn client_marker(name: &str) -> Result<Self> {
        Self::new(&format!(
            r"(?m)#[ \t]*Client:[ \t]*{}[ \t]*\r?$",
            regex::escape(name)
        ))
    }

    /// Spans from the `# Client: <name>` comment forward to the first
    /// `AllowedIPs` line after it, capturing the address.
    pub fn allowed_ip_after_client(name: &str) -> Result<Self> {
        Self::new(&format!(
            r"(?s)#\s*Client:\s*{}.*?AllowedIPs\s*=\s*([0-9.]+)/32",
            regex::escape(name)
        ))
    }

    /// Spans from `PublicKey = <key>` forward to the first `AllowedIPs` line
    /// after it, capturing the address.
    pub fn allowed_ip_after_key(key: &str) -> Result<Self> {
        Self::new(&format!(
            r"(?s)PublicKey\s*=\s*{}.*?AllowedIPs\s*=\s*([0-9.]+)/32",
            regex::escape(key)
        ))
    }

    /// True if the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Searches one block's text for a field.
///
/// The text is treated as a single string, so a pattern may span several
/// lines of the same block. Callers pass one block at a time; the whole
/// document is never searched.
pub fn extract_field(block_text: &str, pattern: &FieldPattern) -> Option<String> {
    let caps = pattern.regex.captures(block_text)?;
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InBlock { start: usize },
}

/// Parses every peer block in document order.
///
/// # Example
/// ```
/// use peer_blocks::scanner::scan;
///
/// let config = "[Interface]\nListenPort = 51820\n\n[Peer]\nPublicKey = abc=\n# Client: alice\n";
/// let blocks = scan(config);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].lines(), 3..6);
/// assert_eq!(blocks[0].client_name().as_deref(), Some("alice"));
/// ```
pub fn scan(document: &str) -> Vec<PeerBlock> {
    scan_lines(&split_lines(document))
}

pub(crate) fn scan_lines(lines: &[&str]) -> Vec<PeerBlock> {
    let mut blocks = Vec::new();
    let mut state = ScanState::Outside;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        state = match state {
            ScanState::Outside if trimmed == PEER_HEADER => ScanState::InBlock { start: index },
            ScanState::Outside => ScanState::Outside,
            ScanState::InBlock { start } => {
                if trimmed.is_empty() || trimmed.starts_with(PEER_HEADER) {
                    blocks.push(PeerBlock::from_lines(lines, start, index));
                    // A `[Peer]` terminator opens the next block right away.
                    if trimmed == PEER_HEADER {
                        ScanState::InBlock { start: index }
                    } else {
                        ScanState::Outside
                    }
                } else {
                    ScanState::InBlock { start }
                }
            }
        };
    }

    if let ScanState::InBlock { start } = state {
        blocks.push(PeerBlock::from_lines(lines, start, lines.len()));
    }

    tracing::debug!(lines = lines.len(), blocks = blocks.len(), "Scanned peer config");
    blocks
}

/// One piece of a partitioned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Lines outside any peer block, kept verbatim.
    Gap {
        start: usize,
        end: usize,
        text: String,
    },
    Peer(PeerBlock),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Self::Gap { text, .. } => text,
            Self::Peer(block) => &block.text,
        }
    }

    pub fn lines(&self) -> Range<usize> {
        match self {
            Self::Gap { start, end, .. } => *start..*end,
            Self::Peer(block) => block.lines(),
        }
    }

    pub fn is_peer(&self) -> bool {
        matches!(self, Self::Peer(_))
    }
}

/// Splits a document into alternating gaps and peer blocks.
///
/// Concatenating the text of every segment in order reproduces the document.
pub fn partition(document: &str) -> Vec<Segment> {
    let lines = split_lines(document);
    let mut segments = Vec::new();
    let mut cursor = 0;

    for block in scan_lines(&lines) {
        if cursor < block.start {
            segments.push(Segment::Gap {
                start: cursor,
                end: block.start,
                text: lines[cursor..block.start].concat(),
            });
        }
        cursor = block.end;
        segments.push(Segment::Peer(block));
    }

    if cursor < lines.len() {
        segments.push(Segment::Gap {
            start: cursor,
            end: lines.len(),
            text: lines[cursor..].concat(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_no_peers() {
        assert!(scan("[Interface]\nPrivateKey = x\n").is_empty());
    }

    #[test]
    fn test_scan_single_block() {
        let blocks = scan("[Peer]\nPublicKey = abc\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), 0..2);
        assert_eq!(blocks[0].text, "[Peer]\nPublicKey = abc\n");
    }

    #[test]
    fn test_blank_terminator_not_in_block() {
        let blocks = scan("[Peer]\nPublicKey = abc\n\n# tail\n");
        assert_eq!(blocks[0].lines(), 0..2);
        assert!(!blocks[0].text.ends_with("\n\n"));
    }

    #[test]
    fn test_back_to_back_headers() {
        let blocks = scan("[Peer]\n[Peer]\nPublicKey = b\n");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_empty_body());
        assert_eq!(blocks[1].lines(), 1..3);
    }

    #[test]
    fn test_header_with_trailing_text_only_terminates() {
        let blocks = scan("[Peer]\nPublicKey = a\n[Peer] # disabled\nPublicKey = b\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), 0..2);
    }

    #[test]
    fn test_indented_header_opens_block() {
        let blocks = scan("  [Peer]  \nPublicKey = a\n");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_extract_field_missing() {
        assert_eq!(extract_field("[Peer]\n", FieldPattern::allowed_ip()), None);
    }

    #[test]
    fn test_client_marker_escapes_name() {
        let marker = FieldPattern::client_marker("a.b").unwrap();
        assert!(marker.is_match("# Client: a.b\n"));
        assert!(!marker.is_match("# Client: axb\n"));
    }

    #[test]
    fn test_partition_gap_and_peer() {
        let segments = partition("[Interface]\n\n[Peer]\nPublicKey = a\n");
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_peer());
        assert_eq!(segments[0].lines(), 0..2);
        assert!(segments[1].is_peer());
    }
}
