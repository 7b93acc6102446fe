//! Domain logic: the signature table and the match rule.

/// A loaded content signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanSignature {
    /// Operator-facing label for the signature.
    pub name: String,
    /// Binary pattern that flags a payload when found anywhere inside it.
    pub pattern: Vec<u8>,
}

impl ScanSignature {
    /// Creates a signature.
    pub fn new(name: impl Into<String>, pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// True iff the pattern occurs in `data`.
    pub fn matches(&self, data: &[u8]) -> bool {
        !self.pattern.is_empty()
            && data
                .windows(self.pattern.len())
                .any(|window| window == self.pattern.as_slice())
    }
}

/// What kind of item a scan request concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanTarget {
    /// A mined block; always passes.
    Block,
    /// A transaction payload; matched against the signature table.
    Tx,
    /// Anything else; fails closed.
    Unknown,
}

impl ScanTarget {
    /// Maps a wire-level kind string onto a scan target. Unrecognized
    /// kinds scan as [`ScanTarget::Unknown`] and fail closed.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "block" => Self::Block,
            "tx" => Self::Tx,
            _ => Self::Unknown,
        }
    }
}

/// Returns the first signature matching `data`, if any.
pub fn find_match<'a>(data: &[u8], signatures: &'a [ScanSignature]) -> Option<&'a ScanSignature> {
    signatures.iter().find(|signature| signature.matches(data))
}
