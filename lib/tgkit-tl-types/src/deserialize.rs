// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::serialize::{BOOL_FALSE_ID, BOOL_TRUE_ID, VECTOR_ID};
use crate::{Blob, RawVec};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The end of the buffer was reached earlier than anticipated, which
    /// implies there is not enough data to complete the deserialization.
    UnexpectedEof,

    /// A boxed value started with a constructor that does not belong to
    /// the type being read (e.g. reading a `bool` when a `Vec` was expected).
    ///
    /// Bare [`crate::types`] carry no constructor and cannot be validated this way.
    UnexpectedConstructor {
        /// The unexpected constructor identifier.
        id: u32,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnexpectedEof => write!(f, "unexpected eof"),
            Self::UnexpectedConstructor { id } => write!(f, "unexpected constructor: {id:08x}"),
        }
    }
}

/// In-memory reader over a response body.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// How many bytes have been consumed so far.
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::UnexpectedEof)?;
        let slice = self.buf.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(self.take(buf.len())?);
        Ok(())
    }

    pub fn read_to_end(&mut self, buf: &mut Vec<u8>) -> usize {
        let rest = &self.buf[self.pos..];
        buf.extend_from_slice(rest);
        self.pos = self.buf.len();
        rest.len()
    }
}

pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;
pub type Result<T> = std::result::Result<T, Error>;

/// This trait allows for data serialized according to the
/// [Binary Data Serialization] to be deserialized into concrete instances.
///
/// [Binary Data Serialization]: https://core.telegram.org/mtproto/serialize
pub trait Deserializable {
    /// Deserializes an instance of the type from a given buffer.
    fn deserialize(buf: Buffer) -> Result<Self>
    where
        Self: std::marker::Sized;

    /// Convenience function to deserialize an instance from a given buffer.
    ///
    /// ```
    /// use tgkit_tl_types::Deserializable;
    ///
    /// assert_eq!(bool::from_bytes(&[0x37, 0x97, 0x79, 0xbc]).unwrap(), false);
    /// ```
    fn from_bytes(buf: &[u8]) -> Result<Self>
    where
        Self: std::marker::Sized,
    {
        Self::deserialize(&mut Cursor::from_slice(buf))
    }
}

macro_rules! impl_le_deserializable {
    ($($ty:ty: $len:literal),*) => {
        $(
            impl Deserializable for $ty {
                fn deserialize(buf: Buffer) -> Result<Self> {
                    let mut buffer = [0u8; $len];
                    buf.read_exact(&mut buffer)?;
                    Ok(Self::from_le_bytes(buffer))
                }
            }
        )*
    };
}

impl_le_deserializable!(i32: 4, u32: 4, i64: 8, f64: 8);

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Result<Self> {
        match u32::deserialize(buf)? {
            BOOL_TRUE_ID => Ok(true),
            BOOL_FALSE_ID => Ok(false),
            id => Err(Error::UnexpectedConstructor { id }),
        }
    }
}

impl Deserializable for [u8; 16] {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let mut buffer = [0u8; 16];
        buf.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

impl Deserializable for [u8; 32] {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let mut buffer = [0u8; 32];
        buf.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != VECTOR_ID {
            return Err(Error::UnexpectedConstructor { id });
        }
        let len = u32::deserialize(buf)?;
        (0..len).map(|_| T::deserialize(buf)).collect()
    }
}

impl<T: Deserializable> Deserializable for RawVec<T> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let len = u32::deserialize(buf)?;
        Ok(Self((0..len).map(|_| T::deserialize(buf)).collect::<Result<_>>()?))
    }
}

impl Deserializable for Blob {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let mut blob = Vec::new();
        buf.read_to_end(&mut blob);
        Ok(Self(blob))
    }
}

impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let first = buf.read_byte()?;
        let (header, len) = if first == 254 {
            let mut len = [0u8; 3];
            buf.read_exact(&mut len)?;
            (4, len[0] as usize | (len[1] as usize) << 8 | (len[2] as usize) << 16)
        } else {
            (1, first as usize)
        };

        let data = buf.take(len)?.to_vec();
        let padding = (4 - ((header + len) % 4)) % 4;
        buf.take(padding)?;
        Ok(data)
    }
}

impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(String::from_utf8_lossy(&Vec::<u8>::deserialize(buf)?).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Serializable;

    #[test]
    fn reads_integers() {
        assert_eq!(i32::from_bytes(&[0xff, 0xff, 0xff, 0x7f]), Ok(i32::MAX));
        assert_eq!(u32::from_bytes(&[0x01, 0x00, 0x00, 0x00]), Ok(1));
        assert_eq!(i64::from_bytes(&[0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x80]), Ok(i64::MIN));
        assert_eq!(i32::from_bytes(&[0x01, 0x02]), Err(Error::UnexpectedEof));
    }

    #[test]
    fn rejects_unknown_bool() {
        assert_eq!(
            bool::from_bytes(&[0x15, 0xc4, 0xb5, 0x1c]),
            Err(Error::UnexpectedConstructor { id: 0x1cb5c415 })
        );
    }

    #[test]
    fn rejects_bare_vector() {
        assert_eq!(
            Vec::<i32>::from_bytes(&[0x01, 0x00, 0x00, 0x00, 0x7f, 0x00, 0x00, 0x00]),
            Err(Error::UnexpectedConstructor { id: 1 })
        );
    }

    #[test]
    fn blobs_take_the_rest() {
        let mut cursor = Cursor::from_slice(&[1, 0, 0, 0, 9, 9]);
        assert_eq!(i32::deserialize(&mut cursor), Ok(1));
        assert_eq!(Blob::deserialize(&mut cursor), Ok(Blob(vec![9, 9])));
        assert_eq!(cursor.pos(), 6);
    }

    #[test]
    fn strings_consume_padding() {
        let mut bytes = "Hello".to_owned().to_bytes();
        7i32.serialize(&mut bytes);
        let mut cursor = Cursor::from_slice(&bytes);
        assert_eq!(String::deserialize(&mut cursor), Ok("Hello".to_owned()));
        assert_eq!(cursor.pos(), 8);
        assert_eq!(i32::deserialize(&mut cursor), Ok(7));
    }

    #[test]
    fn long_byte_strings() {
        let data = (0..300).map(|i| i as u8).collect::<Vec<u8>>();
        assert_eq!(Vec::<u8>::from_bytes(&data.to_bytes()), Ok(data));
    }
}
