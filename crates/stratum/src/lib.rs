use {
    bitcoin::CompactTarget,
    byteorder::{BigEndian, ByteOrder, LittleEndian},
    serde::{
        Deserialize, Serialize, Serializer,
        de::{self, Deserializer},
        ser::SerializeSeq,
    },
    serde_with::{DeserializeFromStr, SerializeDisplay},
    snafu::{ResultExt, Snafu},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

pub use {
    error::{InternalError, Result},
    hash::Hash256,
    job_id::JobId,
    nbits::Nbits,
    nonce::Nonce,
    notify::{Notify, WorkerParams},
    ntime::Ntime,
    solution::Solution,
    version::Version,
};

mod error;
mod hash;
mod job_id;
mod nbits;
mod nonce;
mod notify;
mod ntime;
mod solution;
mod version;

/// Number of worker fields carried by the extended header.
pub const WORKER_FIELDS: usize = 3;

/// Decodes a hex string that must hold exactly `N` bytes.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s).context(error::HexSnafu { input: s })?;
    let actual = bytes.len();

    bytes
        .try_into()
        .map_err(|_| InternalError::Length { expected: N, actual })
}

/// Hex of `n` packed as four little-endian bytes.
pub fn pack_u32_le(n: u32) -> String {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, n);
    hex::encode(buf)
}

/// Inverse of [`pack_u32_le`].
pub fn unpack_u32_le(s: &str) -> Result<u32> {
    Ok(LittleEndian::read_u32(&decode_fixed::<4>(s)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_fixed_checks_length() {
        assert_eq!(decode_fixed::<2>("abcd").unwrap(), [0xab, 0xcd]);

        assert!(matches!(
            decode_fixed::<2>("abcdef"),
            Err(InternalError::Length {
                expected: 2,
                actual: 3
            })
        ));

        assert!(matches!(
            decode_fixed::<2>("zz"),
            Err(InternalError::Hex { .. })
        ));
    }

    #[test]
    fn little_endian_packing() {
        assert_eq!(pack_u32_le(4), "04000000");
        assert_eq!(pack_u32_le(0x5f000000), "0000005f");
        assert_eq!(unpack_u32_le("0000005f").unwrap(), 0x5f000000);
        assert!(unpack_u32_le("00").is_err());
    }
}
