//! Signature registry: the canonical tables of known binary formats.
//!
//! Two independent tables. The prefix table maps leading byte sequences to
//! an extension and is scanned in priority order. The brand table maps the
//! 4-byte brand tag of an ISO-BMFF `ftyp` box to an extension and is an
//! exact-match lookup.

use std::collections::HashMap;

/// A single prefix signature: the leading bytes of a format and the
/// extension they imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEntry {
    pub prefix: &'static [u8],
    pub format: &'static str,
}

/// Immutable after construction; shared freely across worker threads.
#[derive(Debug, Clone)]
pub struct SignatureRegistry {
    prefixes: Vec<SignatureEntry>,
    brands: HashMap<[u8; 4], &'static str>,
}

impl SignatureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefixes: Vec::new(),
            brands: HashMap::new(),
        }
    }

    /// Registers a prefix signature.
    ///
    /// Entries are kept sorted by descending prefix length so a longer,
    /// more specific signature is always tested before a shorter one that
    /// would also match its leading bytes. Registration order breaks ties
    /// among equal lengths.
    pub fn register_prefix(&mut self, prefix: &'static [u8], format: &'static str) {
        let entry = SignatureEntry { prefix, format };
        let at = self
            .prefixes
            .iter()
            .position(|e| e.prefix.len() < prefix.len())
            .unwrap_or(self.prefixes.len());
        self.prefixes.insert(at, entry);
    }

    /// Registers an ISO-BMFF brand tag.
    ///
    /// # Panics
    ///
    /// Panics if the tag is already registered. Brand lookup is exact-match,
    /// so a duplicate tag would silently replace an earlier mapping.
    pub fn register_brand(&mut self, tag: [u8; 4], format: &'static str) {
        let previous = self.brands.insert(tag, format);
        assert!(previous.is_none(), "duplicate brand tag {:02X?}", tag);
    }

    /// Returns the extension of the first prefix entry matching `window`,
    /// in priority order. A window shorter than a prefix never matches it.
    #[must_use]
    pub fn match_prefix(&self, window: &[u8]) -> Option<&'static str> {
        self.prefixes
            .iter()
            .find(|e| window.starts_with(e.prefix))
            .map(|e| e.format)
    }

    /// Exact-match brand lookup.
    #[must_use]
    pub fn match_brand(&self, tag: [u8; 4]) -> Option<&'static str> {
        self.brands.get(&tag).copied()
    }

    #[must_use]
    pub fn prefix_entries(&self) -> &[SignatureEntry] {
        &self.prefixes
    }

    pub fn brand_entries(&self) -> impl Iterator<Item = ([u8; 4], &'static str)> + '_ {
        self.brands.iter().map(|(tag, format)| (*tag, *format))
    }

    #[must_use]
    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }

    #[must_use]
    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    /// The built-in signature tables.
    ///
    /// Note: OLE compound documents are registered with the real magic
    /// `D0 CF 11 E0 A1 B1 1A E1`, not its ASCII spelling.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        // Images
        registry.register_prefix(&[0xFF, 0xD8, 0xFF], "jpg");
        registry.register_prefix(&[0x89, b'P', b'N', b'G'], "png");
        registry.register_prefix(b"GIF87a", "gif");
        registry.register_prefix(b"GIF89a", "gif");
        registry.register_prefix(b"BM", "bmp");
        registry.register_prefix(&[0x00, 0x00, 0x01, 0x00], "ico");
        registry.register_prefix(b"II*\x00", "tif");
        registry.register_prefix(b"MM\x00*", "tif");
        registry.register_prefix(b"IIRO", "cr2");
        registry.register_prefix(&[0x49, 0x49, 0xBC], "rw2");
        registry.register_prefix(b"FUJIFILMCCD", "raf");
        registry.register_prefix(b"\x00\x00\x00\x0CjP  ", "jp2");

        // Audio
        registry.register_prefix(b"ID3", "mp3");
        registry.register_prefix(&[0xFF, 0xF1], "aac");
        registry.register_prefix(&[0xFF, 0xF9], "aac");
        registry.register_prefix(b"fLaC", "flac");
        registry.register_prefix(b"OggS", "ogg");
        registry.register_prefix(b"RIFF", "riff");
        registry.register_prefix(&[0x4D, 0x54, 0x68, 0x64], "mid");

        // Video
        registry.register_prefix(&[0x1A, 0x45, 0xDF, 0xA3], "mkv");
        registry.register_prefix(&[0x00, 0x00, 0x01, 0xBA], "mpg");
        registry.register_prefix(&[0x00, 0x00, 0x01, 0xB3], "mpg");

        // Documents
        registry.register_prefix(b"%PDF", "pdf");
        registry.register_prefix(b"{\\rtf", "rtf");
        registry.register_prefix(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1], "ole");
        registry.register_prefix(b"PK\x03\x04", "zip");

        // Archives
        registry.register_prefix(&[0x1F, 0x8B, 0x08], "gz");
        registry.register_prefix(b"BZh", "bz2");
        registry.register_prefix(b"7z\xBC\xAF'\x1C", "7z");
        registry.register_prefix(b"Rar!\x1A\x07\x00", "rar");
        registry.register_prefix(b"Rar!\x1A\x07\x01\x00", "rar");

        // Disk images
        registry.register_prefix(b"CD001", "iso");
        registry.register_prefix(b"ITSF", "chm");

        // Fonts
        registry.register_prefix(b"OTTO", "otf");
        registry.register_prefix(&[0x00, 0x01, 0x00, 0x00], "ttf");
        registry.register_prefix(b"wOFF", "woff");
        registry.register_prefix(b"wOF2", "woff2");

        // ISO-BMFF brands: MP4 family
        registry.register_brand(*b"isom", "mp4");
        registry.register_brand(*b"iso2", "mp4");
        registry.register_brand(*b"iso3", "mp4");
        registry.register_brand(*b"avc1", "mp4");
        registry.register_brand(*b"mp41", "mp4");
        registry.register_brand(*b"mp42", "mp4");
        registry.register_brand(*b"MSNV", "mp4");
        registry.register_brand(*b"mmp4", "mp4");
        registry.register_brand(*b"dash", "mp4");

        registry.register_brand(*b"qt  ", "mov");
        registry.register_brand(*b"moov", "mov");

        registry.register_brand(*b"M4V ", "m4v");
        registry.register_brand(*b"M4A ", "m4a");
        registry.register_brand(*b"f4v ", "f4v");
        registry.register_brand(*b"f4a ", "f4a");

        registry.register_brand(*b"heic", "heic");
        registry.register_brand(*b"heix", "heic");
        registry.register_brand(*b"hevc", "heic");
        registry.register_brand(*b"hevx", "heic");
        registry.register_brand(*b"mif1", "heif");
        registry.register_brand(*b"msf1", "heif");

        registry.register_brand(*b"avif", "avif");
        registry.register_brand(*b"avis", "avif");

        registry
    }
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
