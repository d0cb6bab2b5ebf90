use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("target buffer is {actual} bytes, encoding needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("payload of {0} bytes does not fit the one-byte length field")]
    PayloadTooLong(usize),
}

pub trait Encodable {
    /// Number of bytes `encode` writes.
    fn encoded_len(&self) -> usize;

    /// Encode into a slice of exactly `encoded_len()` bytes.
    fn encode<'a>(&self, into: &'a mut [u8]) -> Result<&'a [u8], EncodingError>;

    fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = vec![0u8; self.encoded_len()];
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

pub(crate) fn check_len(into: &[u8], expected: usize) -> Result<(), EncodingError> {
    if into.len() != expected {
        return Err(EncodingError::BufferSize { expected, actual: into.len() });
    }
    Ok(())
}
