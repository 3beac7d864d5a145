use std::io;

/// Decodes a frame payload, possibly borrowing from the receive buffer.
pub trait Deserialize<'a>: Sized {
    /// Fails with `InvalidData` when `buf` doesn't hold a well formed payload.
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}
