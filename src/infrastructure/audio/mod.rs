pub mod mp3_codec;

pub use mp3_codec::Mp3Codec;

use std::time::Duration;

/// Decoded interleaved PCM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = self.frames() as u128 * 1_000_000_000 / u128::from(self.sample_rate);
        Duration::from_nanos(nanos as u64)
    }

    pub fn same_format(&self, other: &AudioSegment) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }

    /// Human readable format, e.g. "16000 Hz x1"
    pub fn format_label(&self) -> String {
        format!("{} Hz x{}", self.sample_rate, self.channels)
    }

    /// Append another segment of the same format, with no gap between them
    pub fn append(&mut self, other: AudioSegment) {
        debug_assert!(self.same_format(&other));
        self.samples.extend(other.samples);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported or corrupt audio: {0}")]
    Decode(String),

    #[error("audio contained no samples")]
    Empty,

    #[error("encoder failure: {0}")]
    Encode(String),
}

/// Audio codec capability used by the assembler
pub trait AudioCodec: Send + Sync {
    /// Decode an encoded blob into PCM
    fn decode(&self, bytes: &[u8]) -> Result<AudioSegment, CodecError>;

    /// Encode PCM into one blob in the codec's output format
    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>, CodecError>;

    /// File extension of encoded output
    fn extension(&self) -> &'static str;

    /// MIME type of encoded output
    fn mime_type(&self) -> &'static str;
}
