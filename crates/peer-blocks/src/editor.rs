//! Identity resolution and structural removal of peer blocks.
//!
//! A client is located by its `# Client: <name>` comment first and by its
//! public key second. The key is only consulted when no block in the whole
//! document carries the name marker. Within each strategy the first block in
//! document order wins.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scanner::{self, FieldPattern, PeerBlock};

/// Placeholder for a field a block does not carry.
pub const UNKNOWN: &str = "unknown";

/// The name and/or public key used to find a client's block.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    name: Option<String>,
    public_key: Option<String>,
}

fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ClientIdentity {
    /// Identity with a client name only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: present(name.into()),
            public_key: None,
        }
    }

    /// Identity with a public key only.
    pub fn by_public_key(public_key: impl Into<String>) -> Self {
        Self {
            name: None,
            public_key: present(public_key.into()),
        }
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = present(public_key.into());
        self
    }

    /// Attaches a key read from the client's key directory, if there was one.
    pub fn with_optional_public_key(self, public_key: Option<String>) -> Self {
        match public_key {
            Some(key) => self.with_public_key(key),
            None => self,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Fails with [`Error::InvalidIdentity`] when there is nothing to search by.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.public_key.is_none() {
            return Err(Error::InvalidIdentity);
        }
        Ok(())
    }
}

/// Which strategy located a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Name,
    PublicKey,
}

/// Result of resolving an identity against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Found {
        block: PeerBlock,
        matched_by: MatchKind,
    },
    NotFound,
}

impl MatchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn block(&self) -> Option<&PeerBlock> {
        match self {
            Self::Found { block, .. } => Some(block),
            Self::NotFound => None,
        }
    }

    pub fn into_block(self) -> Option<PeerBlock> {
        match self {
            Self::Found { block, .. } => Some(block),
            Self::NotFound => None,
        }
    }

    pub fn matched_by(&self) -> Option<MatchKind> {
        match self {
            Self::Found { matched_by, .. } => Some(*matched_by),
            Self::NotFound => None,
        }
    }
}

fn match_blocks(blocks: Vec<PeerBlock>, identity: &ClientIdentity) -> Result<MatchOutcome> {
    if let Some(name) = identity.name() {
        let marker = FieldPattern::client_marker(name)?;
        if let Some(block) = blocks.iter().find(|block| marker.is_match(&block.text)) {
            tracing::debug!(name, line = block.start + 1, "Matched peer block by name");
            return Ok(MatchOutcome::Found {
                block: block.clone(),
                matched_by: MatchKind::Name,
            });
        }
    }

    if let Some(key) = identity.public_key() {
        if let Some(block) = blocks.into_iter().find(|block| block.text.contains(key)) {
            tracing::debug!(line = block.start + 1, "Matched peer block by public key");
            return Ok(MatchOutcome::Found {
                block,
                matched_by: MatchKind::PublicKey,
            });
        }
    }

    Ok(MatchOutcome::NotFound)
}

/// Resolves an identity to at most one peer block.
///
/// # Errors
/// Returns [`Error::InvalidIdentity`] if the identity has neither a name nor
/// a public key.
///
/// # Example
/// ```
/// use peer_blocks::editor::{find_block, ClientIdentity, MatchKind};
///
/// let config = "[Peer]\nPublicKey = K1\n# Client: alice\n\n[Peer]\nPublicKey = K2\n";
/// let outcome = find_block(config, &ClientIdentity::new("bob").with_public_key("K2")).unwrap();
/// assert_eq!(outcome.matched_by(), Some(MatchKind::PublicKey));
/// assert_eq!(outcome.block().unwrap().start, 4);
/// ```
pub fn find_block(document: &str, identity: &ClientIdentity) -> Result<MatchOutcome> {
    identity.validate()?;
    match_blocks(scanner::scan(document), identity)
}

/// Output of [`remove_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The edited document, or the original when nothing matched.
    pub document: String,
    pub removed: bool,
    /// The lookup that drove the edit; holds the removed block when found.
    pub outcome: MatchOutcome,
}

/// Removes the block belonging to `identity`.
///
/// Every other line is kept byte for byte. One blank line directly after the
/// removed block is dropped with it; further blank lines are left alone.
/// When no block matches, the original document is returned with
/// `removed = false`.
///
/// # Errors
/// Returns [`Error::InvalidIdentity`] if the identity has neither a name nor
/// a public key.
pub fn remove_block(document: &str, identity: &ClientIdentity) -> Result<Removal> {
    identity.validate()?;

    let lines = scanner::split_lines(document);
    let outcome = match_blocks(scanner::scan_lines(&lines), identity)?;

    let Some(block) = outcome.block().cloned() else {
        tracing::debug!(?identity, "No peer block to remove");
        return Ok(Removal {
            document: document.to_string(),
            removed: false,
            outcome,
        });
    };

    let mut resume = block.end;
    if lines.get(resume).is_some_and(|line| line.trim().is_empty()) {
        resume += 1;
    }

    let mut result = String::with_capacity(document.len());
    for line in lines[..block.start].iter().chain(&lines[resume..]) {
        result.push_str(line);
    }

    tracing::debug!(
        start = block.start,
        end = block.end,
        skipped_separator = resume > block.end,
        "Removed peer block"
    );

    Ok(Removal {
        document: result,
        removed: true,
        outcome,
    })
}

/// Display fields for one peer block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRecord {
    /// Position among the document's peer blocks.
    pub index: usize,
    /// 1-based line of the `[Peer]` header.
    pub line: usize,
    pub client_name: String,
    pub public_key: String,
    pub allowed_ip: String,
}

/// Lists every peer block with its display fields.
///
/// Missing fields come back as [`UNKNOWN`]; this never fails.
pub fn list_fields(document: &str) -> Vec<PeerRecord> {
    scanner::scan(document)
        .into_iter()
        .enumerate()
        .map(|(index, block)| PeerRecord {
            index,
            line: block.start + 1,
            client_name: block.client_name().unwrap_or_else(|| UNKNOWN.to_string()),
            public_key: block.public_key().unwrap_or_else(|| UNKNOWN.to_string()),
            allowed_ip: block.allowed_ip().unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect()
}

/// The `AllowedIPs` address of the block `identity` resolves to.
pub fn resolve_allowed_ip(document: &str, identity: &ClientIdentity) -> Result<Option<String>> {
    Ok(find_block(document, identity)?
        .into_block()
        .and_then(|block| block.allowed_ip()))
}
