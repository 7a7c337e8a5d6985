use super::*;

/// A transparent base58check address: a one or two byte version prefix
/// followed by a 20-byte hash.
#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct PayoutAddress {
    encoded: String,
    script_pubkey: ScriptBuf,
}

impl PayoutAddress {
    const P2SH_PREFIXES: [&[u8]; 4] = [&[0x05], &[0xc4], &[0x1c, 0xbd], &[0x1c, 0xba]];

    pub fn script_pubkey(&self) -> &ScriptBuf {
        &self.script_pubkey
    }
}

impl FromStr for PayoutAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = bitcoin::base58::decode_check(s)
            .with_context(|| format!("invalid base58check address `{s}`"))?;

        ensure!(
            matches!(payload.len(), 21 | 22),
            "address `{s}` has a {} byte payload, expected 21 or 22",
            payload.len()
        );

        let (prefix, hash) = payload.split_at(payload.len() - 20);
        let hash: [u8; 20] = hash.try_into()?;

        let script_pubkey = if Self::P2SH_PREFIXES.iter().any(|p2sh| *p2sh == prefix) {
            ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(hash))
        } else {
            ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(hash))
        };

        Ok(Self {
            encoded: s.into(),
            script_pubkey,
        })
    }
}

impl fmt::Display for PayoutAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// A fixed cut of every block reward, in percent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Recipient {
    pub address: PayoutAddress,
    pub percent: f64,
}

impl FromStr for Recipient {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, percent) = s
            .split_once(':')
            .with_context(|| format!("recipient `{s}` is not of the form <ADDRESS>:<PERCENT>"))?;

        let percent = percent
            .parse::<f64>()
            .with_context(|| format!("invalid recipient percent `{percent}`"))?;

        ensure!(
            percent.is_finite() && (0.0..=100.0).contains(&percent),
            "recipient percent {percent} out of range 0 to 100"
        );

        Ok(Self {
            address: address.parse()?,
            percent,
        })
    }
}

/// Payout configuration a template is built against.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub address: PayoutAddress,
    pub recipients: Vec<Recipient>,
    pub reward_scale: u64,
    pub pool_sig: Option<String>,
}

impl PoolConfig {
    pub fn new(address: PayoutAddress) -> Self {
        Self {
            address,
            recipients: Vec::new(),
            reward_scale: DEFAULT_REWARD_SCALE,
            pool_sig: Some(POOL_SIG.into()),
        }
    }

    pub fn with_recipients(mut self, recipients: Vec<Recipient>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn with_reward_scale(mut self, reward_scale: u64) -> Self {
        self.reward_scale = reward_scale;
        self
    }

    pub fn with_pool_sig(mut self, pool_sig: Option<String>) -> Self {
        self.pool_sig = pool_sig;
        self
    }
}
