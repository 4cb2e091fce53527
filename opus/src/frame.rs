//! Opus frame type.

/// Largest packet libopus produces for a single frame, in bytes.
pub const MAX_PACKET_SIZE: usize = 4000;

/// Encoded Opus packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(pub Vec<u8>);

impl Frame {
    /// Creates a new frame from bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the frame and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the stereo flag of the TOC byte is set.
    pub fn is_stereo(&self) -> bool {
        self.0.first().is_some_and(|toc| toc & 0b0000_0100 != 0)
    }

    /// Returns true if the packet carries no audio data beyond its TOC
    /// byte, which is what the encoder emits for silence under DTX.
    pub fn is_dtx(&self) -> bool {
        self.0.len() <= 2
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}
