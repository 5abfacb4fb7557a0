/// Zero-copy byte reader for decoding Art-Net frames.
pub mod reader;
/// Byte writer for encoding Art-Net frames into a caller-owned buffer.
pub mod writer;
