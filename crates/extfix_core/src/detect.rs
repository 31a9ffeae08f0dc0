//! Two-stage format detection over a bounded header window.
//!
//! Stage one scans the prefix table in priority order. Stage two handles the
//! ISO-BMFF container family, where MP4/MOV/HEIC/AVIF share the same outer
//! box layout and are told apart only by the brand tag embedded after the
//! `ftyp` marker.

use crate::registry::SignatureRegistry;

/// Offset of the `ftyp` box type within an ISO-BMFF header (after the
/// 4-byte box size, which is arbitrary for detection purposes).
const FTYP_OFFSET: usize = 4;
const FTYP_MARKER: &[u8] = b"ftyp";
const BRAND_OFFSET: usize = 8;
const MIN_BMFF_WINDOW: usize = 12;

/// Outcome of detection: a format identifier or nothing. Detection is
/// binary per file, with no confidence scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Format(&'static str),
    Unknown,
}

impl Detection {
    /// The detected extension, if any.
    #[must_use]
    pub const fn format(&self) -> Option<&'static str> {
        match self {
            Self::Format(format) => Some(format),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(format) => write!(f, "{}", format),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classifies header windows against a signature registry.
///
/// Never fails; it only fails to classify. Read-only after construction,
/// so a single instance is shared by all workers.
#[derive(Debug, Clone)]
pub struct Detector {
    registry: SignatureRegistry,
}

impl Detector {
    #[must_use]
    pub fn new(registry: SignatureRegistry) -> Self {
        Self { registry }
    }

    /// A detector over the built-in signature tables.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new(SignatureRegistry::builtin())
    }

    #[must_use]
    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    #[must_use]
    pub fn detect(&self, window: &[u8]) -> Detection {
        if let Some(format) = self.registry.match_prefix(window) {
            return Detection::Format(format);
        }
        self.detect_brand(window)
    }

    fn detect_brand(&self, window: &[u8]) -> Detection {
        if window.len() < MIN_BMFF_WINDOW {
            return Detection::Unknown;
        }
        if &window[FTYP_OFFSET..FTYP_OFFSET + 4] != FTYP_MARKER {
            return Detection::Unknown;
        }

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&window[BRAND_OFFSET..BRAND_OFFSET + 4]);

        match self.registry.match_brand(tag) {
            Some(format) => Detection::Format(format),
            None => Detection::Unknown,
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::with_builtin()
    }
}
