use super::*;

/// Header timestamp, kept as the four bytes a miner submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct Ntime([u8; 4]);

impl Ntime {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn to_unix(self) -> u32 {
        LittleEndian::read_u32(&self.0)
    }
}

impl From<u32> for Ntime {
    fn from(unix: u32) -> Self {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, unix);
        Self(buf)
    }
}

impl FromStr for Ntime {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<4>(s).map(Self)
    }
}

impl Display for Ntime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
