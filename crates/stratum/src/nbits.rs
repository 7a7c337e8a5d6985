use super::*;

/// Compact difficulty target, parsed from the node's big-endian hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct Nbits(CompactTarget);

impl Nbits {
    pub fn to_compact(self) -> CompactTarget {
        self.0
    }

    /// Byte order used in the header and in `mining.notify`.
    pub fn to_le_bytes(self) -> [u8; 4] {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, self.0.to_consensus());
        buf
    }

    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(CompactTarget::from_consensus(LittleEndian::read_u32(&bytes)))
    }
}

impl FromStr for Nbits {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_fixed::<4>(s)?;
        Ok(Self(CompactTarget::from_consensus(BigEndian::read_u32(
            &bytes,
        ))))
    }
}

impl Display for Nbits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0.to_consensus())
    }
}

impl From<CompactTarget> for Nbits {
    fn from(compact: CompactTarget) -> Self {
        Self(compact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_for_header() {
        let nbits = "1d00ffff".parse::<Nbits>().unwrap();
        assert_eq!(nbits.to_string(), "1d00ffff");
        assert_eq!(hex::encode(nbits.to_le_bytes()), "ffff001d");
        assert_eq!(Nbits::from_le_bytes(nbits.to_le_bytes()), nbits);
    }

    #[test]
    fn must_be_four_bytes() {
        assert!("1d00ff".parse::<Nbits>().is_err());
        assert!("1d00ffff00".parse::<Nbits>().is_err());
        assert!("xd00ffff".parse::<Nbits>().is_err());
    }
}
