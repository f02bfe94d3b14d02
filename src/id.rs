use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, ops, str};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Represents a 16-byte Universally Unique IDentifier.
///
/// Identifiers produced by this crate carry the version character `'b'` and embed a counter,
/// a process id, a hardware-address fragment, and a millisecond timestamp. Identifiers of any
/// other version parse and re-serialize losslessly, but their embedded fields read as `None`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Version character of identifiers produced by this crate's generator.
    pub const VERSION: char = 'b';

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID byte array from vB field values, using the 48 low-order bits of
    /// `unix_ts_ms` and the low nibble of `hardware_addr[2]`.
    pub const fn from_fields(
        counter: [u8; 4],
        process_id: u16,
        hardware_addr: &[u8; 6],
        unix_ts_ms: u64,
    ) -> Self {
        Self([
            counter[0],
            counter[1],
            counter[2],
            counter[3],
            (process_id >> 8) as u8,
            process_id as u8,
            0xb0 | (hardware_addr[2] & 0x0f),
            hardware_addr[3],
            hardware_addr[4],
            hardware_addr[5],
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
        ])
    }

    /// Recomposes a UUID from its most significant and least significant 64 bits.
    pub const fn from_u64_pair(msb: u64, lsb: u64) -> Self {
        Self((((msb as u128) << 64) | lsb as u128).to_be_bytes())
    }

    /// Returns the most significant and least significant 64 bits of the byte sequence.
    ///
    /// Unlike the embedded-field accessors, this is a pure bit reinterpretation and is
    /// available for any version.
    pub const fn as_u64_pair(&self) -> (u64, u64) {
        let n = u128::from_be_bytes(self.0);
        ((n >> 64) as u64, n as u64)
    }

    /// Returns the hexadecimal version character stored in the high nibble of byte 6.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use locality_uuid::Uuid;
    ///
    /// let x = "20be0ffc-314a-bd53-7a50-013a65ca76d2".parse::<Uuid>()?;
    /// assert_eq!(x.version(), 'b');
    ///
    /// let y = "20be0ffc-314a-7d53-7a50-013a65ca76d2".parse::<Uuid>()?;
    /// assert_eq!(y.version(), '7');
    /// # Ok::<(), locality_uuid::ParseError>(())
    /// ```
    pub const fn version(&self) -> char {
        DIGITS[(self.0[6] >> 4) as usize] as char
    }

    /// Returns the embedded 16-bit process id, or `None` if the version character is not
    /// [`Uuid::VERSION`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use locality_uuid::Uuid;
    ///
    /// let x = "20be0ffc-314a-bd53-7a50-013a65ca76d2".parse::<Uuid>()?;
    /// assert_eq!(x.process_id(), Some(0x314a));
    ///
    /// let y = "20be0ffc-314a-7d53-7a50-013a65ca76d2".parse::<Uuid>()?;
    /// assert_eq!(y.process_id(), None);
    /// # Ok::<(), locality_uuid::ParseError>(())
    /// ```
    pub const fn process_id(&self) -> Option<u16> {
        if self.version() != Self::VERSION {
            return None;
        }
        Some(u16::from_be_bytes([self.0[4], self.0[5]]))
    }

    /// Returns the embedded millisecond timestamp as a point in time, or `None` if the version
    /// character is not [`Uuid::VERSION`].
    pub fn timestamp(&self) -> Option<SystemTime> {
        if self.version() != Self::VERSION {
            return None;
        }
        let b = &self.0;
        let ms = u64::from_be_bytes([0, 0, b[10], b[11], b[12], b[13], b[14], b[15]]);
        Some(UNIX_EPOCH + Duration::from_millis(ms))
    }

    /// Returns the embedded hardware-address fragment as 6 bytes with the first two zeroed and
    /// the third masked to its low nibble, or `None` if the version character is not
    /// [`Uuid::VERSION`].
    pub const fn mac_fragment(&self) -> Option<[u8; 6]> {
        if self.version() != Self::VERSION {
            return None;
        }
        Some([0, 0, self.0[6] & 0x0f, self.0[7], self.0[8], self.0[9]])
    }

    /// Tests whether a string is a structurally valid 8-4-4-4-12 hexadecimal representation:
    /// exactly 36 characters, hyphens at offsets 8, 13, 18, and 23, hex digits of either case
    /// everywhere else.
    pub fn is_valid(text: &str) -> bool {
        let bytes = text.as_bytes();
        if bytes.len() != 36 {
            return false;
        }
        for (i, &b) in bytes.iter().enumerate() {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                if b != b'-' {
                    return false;
                }
            } else if !b.is_ascii_hexdigit() {
                return false;
            }
        }
        true
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use locality_uuid::Uuid;
    ///
    /// let x = "20be0ffc-314a-bd53-7a50-013a65ca76d2".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "20be0ffc-314a-bd53-7a50-013a65ca76d2");
    /// assert_eq!(format!("{}", y), "20be0ffc-314a-bd53-7a50-013a65ca76d2");
    /// # Ok::<(), locality_uuid::ParseError>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for i in 0..16 {
            let e = self.0[i] as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        UuidStr(buffer)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = FromSliceError;

    /// Creates an object from a slice of exactly 16 bytes, copying the content.
    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        match <[u8; 16]>::try_from(src) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(_) => Err(FromSliceError { len: src.len() }),
        }
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

/// Error parsing an invalid string representation of UUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid string representation")
    }
}

impl std::error::Error for ParseError {}

/// Error creating a UUID from a byte slice whose length is not 16.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FromSliceError {
    len: usize,
}

impl fmt::Display for FromSliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid slice length: expected 16 bytes, got {}", self.len)
    }
}

impl std::error::Error for FromSliceError {}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
