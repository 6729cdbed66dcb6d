// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{Blob, RawVec};

/// Constructor written before every boxed vector.
pub(crate) const VECTOR_ID: u32 = 0x1cb5c415;
pub(crate) const BOOL_TRUE_ID: u32 = 0x997275b5;
pub(crate) const BOOL_FALSE_ID: u32 = 0xbc799737;

/// This trait allows for concrete instances to be serialized into
/// binary data as specified by the [Binary Data Serialization].
///
/// [Binary Data Serialization]: https://core.telegram.org/mtproto/serialize
pub trait Serializable {
    /// Serializes the instance into the given buffer.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// Serialize the object into a new buffer and return its bytes.
    ///
    /// ```
    /// use tgkit_tl_types::Serializable;
    ///
    /// assert_eq!(true.to_bytes(), [0xb5, 0x75, 0x72, 0x99]);
    /// ```
    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.serialize(&mut buffer);
        buffer
    }
}

macro_rules! impl_le_serializable {
    ($($ty:ty),*) => {
        $(
            impl Serializable for $ty {
                fn serialize(&self, buf: &mut impl Extend<u8>) {
                    buf.extend(self.to_le_bytes())
                }
            }
        )*
    };
}

// `int`, `int` read as unsigned (used by flags and constructors), `long` and `double`.
impl_le_serializable!(i32, u32, i64, f64);

impl Serializable for bool {
    /// `boolTrue#997275b5` or `boolFalse#bc799737`.
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        if *self { BOOL_TRUE_ID } else { BOOL_FALSE_ID }.serialize(buf)
    }
}

impl Serializable for [u8; 16] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.iter().copied())
    }
}

impl Serializable for [u8; 32] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.iter().copied())
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    /// `vector#1cb5c415 {t:Type} # [ t ] = Vector t;`
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        VECTOR_ID.serialize(buf);
        (self.len() as i32).serialize(buf);
        self.iter().for_each(|item| item.serialize(buf));
    }
}

impl<T: Serializable> Serializable for RawVec<T> {
    /// `vector` without the boxed constructor, as used by bare-vector parameters.
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        (self.0.len() as i32).serialize(buf);
        self.0.iter().for_each(|item| item.serialize(buf));
    }
}

impl Serializable for Blob {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.0.iter().copied())
    }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf)
    }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_slice().serialize(buf)
    }
}

impl Serializable for &[u8] {
    /// Byte-strings up to 253 bytes long carry a single length byte.
    /// Longer ones are marked with 254 followed by a 24-bit length.
    /// Either way, the total is padded with zeros to a multiple of four.
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let len = self.len();
        let header = if len <= 253 {
            buf.extend([len as u8]);
            1
        } else {
            buf.extend([
                254,
                (len & 0xff) as u8,
                ((len >> 8) & 0xff) as u8,
                ((len >> 16) & 0xff) as u8,
            ]);
            4
        };

        buf.extend(self.iter().copied());
        let padding = (4 - ((header + len) % 4)) % 4;
        buf.extend(std::iter::repeat_n(0, padding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(1i32.to_bytes(), [0x01, 0x00, 0x00, 0x00]);
        assert_eq!((-1i32).to_bytes(), [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(0x1122334455667788i64.to_bytes(), [0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
        assert_eq!(1.5f64.to_bytes(), [0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0xf8, 0x3f]);
    }

    #[test]
    fn booleans_use_constructors() {
        assert_eq!(true.to_bytes(), [0xb5, 0x75, 0x72, 0x99]);
        assert_eq!(false.to_bytes(), [0x37, 0x97, 0x79, 0xbc]);
    }

    #[test]
    fn vectors_are_boxed() {
        assert_eq!(Vec::<i32>::new().to_bytes(), [0x15, 0xc4, 0xb5, 0x1c, 0x0, 0x0, 0x0, 0x0]);
        assert_eq!(
            vec![0x7f_i32].to_bytes(),
            [0x15, 0xc4, 0xb5, 0x1c, 0x1, 0x0, 0x0, 0x0, 0x7f, 0x0, 0x0, 0x0]
        );
    }

    #[test]
    fn bare_vectors_skip_constructor() {
        assert_eq!(
            crate::RawVec(vec![0x7f_i32]).to_bytes(),
            [0x1, 0x0, 0x0, 0x0, 0x7f, 0x0, 0x0, 0x0]
        );
    }

    #[test]
    fn short_strings_are_padded() {
        assert_eq!(String::new().to_bytes(), [0x00, 0x00, 0x00, 0x00]);
        assert_eq!("Hi".to_owned().to_bytes(), [0x02, b'H', b'i', 0x00]);
        assert_eq!("Hi!".to_owned().to_bytes(), [0x03, b'H', b'i', b'!']);
        assert_eq!("Hello".to_owned().to_bytes(), [0x05, b'H', b'e', b'l', b'l', b'o', 0x00, 0x00]);
    }

    #[test]
    fn long_strings_use_wide_header() {
        let data = vec![b'a'; 273];
        let bytes = data.to_bytes();
        assert_eq!(&bytes[..4], [0xfe, 0x11, 0x01, 0x00]);
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(bytes.len(), 4 + 273 + 3);
        assert!(bytes[4 + 273..].iter().all(|b| *b == 0));
    }
}
