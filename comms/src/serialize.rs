use std::io;

pub trait Serialize<'a> {
    /// Writes the message into `buf`.
    ///
    /// # Arguments
    /// * `buf` - The buffer to append the owned part of the message to.
    ///
    /// # Returns
    /// A trailing slice borrowed from `self` that should be written right after `buf`
    /// without copying, or an io error if the message can't be represented on the wire.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> io::Result<Option<&'a [u8]>>;
}
