use serde::{Deserialize, Serialize};

/// Deflate strategy selector shared by both codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Default,
    Filtered,
    HuffmanOnly,
    Rle,
    Fixed,
}

/// Codec configuration understood identically by the reference and the
/// candidate. Absent fields fall back to each codec's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSet {
    /// Compression level, `-1` or `None` for the codec default.
    pub level: Option<i32>,
    /// Window size as a base-two log. Negative means raw (no container),
    /// `0` or `None` asks a decompressor to read it from the stream header.
    pub window_bits: Option<i32>,
    pub mem_level: Option<u8>,
    pub strategy: Option<Strategy>,
    /// Output chunk size used by chunked code paths.
    pub chunk_size: Option<usize>,
    /// Request raw mode without a negative window.
    pub raw: bool,
}

impl OptionSet {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_window_bits(mut self, bits: i32) -> Self {
        self.window_bits = Some(bits);
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// True when the options select a header-less stream.
    pub fn is_raw(&self) -> bool {
        self.raw || self.window_bits.is_some_and(|w| w < 0)
    }

    /// Window magnitude with the raw sign stripped.
    pub fn window_magnitude(&self) -> Option<u32> {
        self.window_bits.map(i32::unsigned_abs)
    }

    /// Options as handed to the reference codec. The reference requires a
    /// positive window; raw mode is chosen by its factory instead.
    pub fn for_reference(&self) -> OptionSet {
        let mut normalized = self.clone();
        if let Some(bits) = normalized.window_bits {
            if bits < 0 {
                normalized.window_bits = Some(-bits);
            }
        }
        normalized
    }

    /// One option set per compression level `0..=9`.
    pub fn level_sweep(base: &OptionSet) -> Vec<OptionSet> {
        (0..=9).map(|level| base.clone().with_level(level)).collect()
    }

    /// One option set per window size `8..=15`, negated when `raw`.
    pub fn window_sweep(base: &OptionSet, raw: bool) -> Vec<OptionSet> {
        (8..=15)
            .map(|bits| base.clone().with_window_bits(if raw { -bits } else { bits }))
            .collect()
    }
}
