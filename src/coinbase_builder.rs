use super::*;

/// Everything the coinbase pays out for one template.
#[derive(Debug, Clone, Copy)]
pub struct CoinbaseRequest<'a> {
    pub height: u64,
    pub primary_reward: u64,
    pub fees: u64,
    pub recipients: &'a [Recipient],
    pub pool_address: &'a PayoutAddress,
    pub masternode: Option<&'a SecondaryReward>,
    pub governance: Option<&'a SecondaryReward>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coinbase {
    pub bytes: Vec<u8>,
    /// Txid in RPC display order.
    pub hash: Hash256,
}

pub trait CoinbaseFactory: Send + Sync {
    fn build(&self, request: &CoinbaseRequest) -> Result<Coinbase>;
}

/// Builds a version 1 transparent coinbase.
///
/// The pool address receives the miner reward plus fees minus the recipient
/// cuts; each recipient gets `percent` of that same total, rounded down.
/// Active masternode and governance payees follow, in that order.
#[derive(Debug, Clone, Default)]
pub struct CoinbaseBuilder {
    pool_sig: Option<String>,
}

impl CoinbaseBuilder {
    const MAX_COINBASE_SCRIPT_SIG_SIZE: usize = 100;
    const MIN_COINBASE_SCRIPT_SIG_SIZE: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_sig(mut self, pool_sig: String) -> Self {
        self.pool_sig = Some(pool_sig);
        self
    }

    fn script_sig(&self, height: u64) -> Result<ScriptBuf> {
        let mut buf: Vec<u8> = Vec::with_capacity(Self::MAX_COINBASE_SCRIPT_SIG_SIZE);

        // BIP34 encode block height
        let mut minimally_encoded_serialized_cscript = [0u8; 8];
        let len = write_scriptint(
            &mut minimally_encoded_serialized_cscript,
            i64::try_from(height).context("height does not fit a script integer")?,
        );
        buf.push(len as u8);
        buf.extend_from_slice(&minimally_encoded_serialized_cscript[..len]);

        if let Some(sig) = &self.pool_sig {
            buf.extend_from_slice(sig.as_bytes());
        }

        let size = buf.len();

        ensure!(
            size <= Self::MAX_COINBASE_SCRIPT_SIG_SIZE,
            "Script sig too large is {size} bytes (max {})",
            Self::MAX_COINBASE_SCRIPT_SIG_SIZE
        );

        ensure!(
            size >= Self::MIN_COINBASE_SCRIPT_SIG_SIZE,
            "Script sig too small is {size} bytes (min {})",
            Self::MIN_COINBASE_SCRIPT_SIG_SIZE
        );

        Ok(ScriptBuf::from_bytes(buf))
    }

    fn outputs(request: &CoinbaseRequest) -> Result<Vec<TxOut>> {
        let total = request
            .primary_reward
            .checked_add(request.fees)
            .context("coinbase value overflows")?;

        for recipient in request.recipients {
            ensure!(
                recipient.percent.is_finite() && recipient.percent >= 0.0,
                "recipient {} has invalid share {}",
                recipient.address,
                recipient.percent
            );
        }

        let percent = request.recipients.iter().map(|r| r.percent).sum::<f64>();

        ensure!(
            percent <= 100.0,
            "recipient shares add up to {percent}%, more than 100%"
        );

        let cuts = request
            .recipients
            .iter()
            .map(|recipient| {
                let value = (total as f64 * recipient.percent / 100.0).floor() as u64;
                (recipient.address.script_pubkey().clone(), value)
            })
            .collect::<Vec<(ScriptBuf, u64)>>();

        let pool_value = total
            .checked_sub(cuts.iter().map(|(_, value)| value).sum::<u64>())
            .context("recipient cuts exceed coinbase value")?;

        let secondary = request
            .masternode
            .into_iter()
            .chain(request.governance)
            .map(|reward| (reward.address.script_pubkey().clone(), reward.amount));

        Ok(
            std::iter::once((request.pool_address.script_pubkey().clone(), pool_value))
                .chain(cuts)
                .chain(secondary)
                .map(|(script_pubkey, value)| TxOut {
                    value: Amount::from_sat(value),
                    script_pubkey,
                })
                .collect(),
        )
    }
}

impl CoinbaseFactory for CoinbaseBuilder {
    fn build(&self, request: &CoinbaseRequest) -> Result<Coinbase> {
        let coinbase = Transaction {
            version: bitcoin::transaction::Version::ONE,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: self.script_sig(request.height)?,
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: Self::outputs(request)?,
        };

        Ok(Coinbase {
            bytes: consensus::serialize(&coinbase),
            hash: Hash256::from_byte_array(coinbase.compute_txid().to_byte_array()).reversed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::payout::tests::{address, pool_address},
        bitcoin::hashes::sha256d,
        pretty_assertions::assert_eq as pretty_assert_eq,
    };

    fn request<'a>(
        recipients: &'a [Recipient],
        pool_address: &'a PayoutAddress,
    ) -> CoinbaseRequest<'a> {
        CoinbaseRequest {
            height: 500_000,
            primary_reward: 50 * COIN_VALUE,
            fees: 10_000,
            recipients,
            pool_address,
            masternode: None,
            governance: None,
        }
    }

    fn decode(coinbase: &Coinbase) -> Transaction {
        consensus::deserialize(&coinbase.bytes).unwrap()
    }

    #[test]
    fn pays_pool_everything_without_recipients() {
        let pool = pool_address();
        let coinbase = CoinbaseBuilder::new().build(&request(&[], &pool)).unwrap();
        let tx = decode(&coinbase);

        assert!(tx.is_coinbase());
        assert_eq!(tx.version, bitcoin::transaction::Version::ONE);
        pretty_assert_eq!(
            tx.output,
            vec![TxOut {
                value: Amount::from_sat(50 * COIN_VALUE + 10_000),
                script_pubkey: pool.script_pubkey().clone(),
            }]
        );
    }

    #[test]
    fn hash_is_display_order_txid() {
        let pool = pool_address();
        let coinbase = CoinbaseBuilder::new()
            .with_pool_sig(POOL_SIG.into())
            .build(&request(&[], &pool))
            .unwrap();

        let internal = sha256d::Hash::hash(&coinbase.bytes).to_byte_array();
        assert_eq!(coinbase.hash.reversed().to_byte_array(), internal);
        assert_eq!(coinbase.hash.to_string(), decode(&coinbase).compute_txid().to_string());
    }

    #[test]
    fn recipients_take_their_cut_from_the_total() {
        let pool = pool_address();
        let recipients = vec![
            Recipient {
                address: address(2),
                percent: 1.0,
            },
            Recipient {
                address: address(3),
                percent: 0.5,
            },
        ];

        let tx = decode(
            &CoinbaseBuilder::new()
                .build(&request(&recipients, &pool))
                .unwrap(),
        );

        let total = 50 * COIN_VALUE + 10_000;
        let values = tx
            .output
            .iter()
            .map(|out| out.value.to_sat())
            .collect::<Vec<u64>>();

        assert_eq!(values, vec![total - total / 100 - total / 200, total / 100, total / 200]);
        assert_eq!(values.iter().sum::<u64>(), total);
        assert_eq!(&tx.output[1].script_pubkey, address(2).script_pubkey());
    }

    #[test]
    fn secondary_payees_follow_recipients() {
        let pool = pool_address();
        let masternode = SecondaryReward {
            address: address(4),
            amount: 7,
        };
        let governance = SecondaryReward {
            address: address(5),
            amount: 9,
        };

        let tx = decode(
            &CoinbaseBuilder::new()
                .build(&CoinbaseRequest {
                    masternode: Some(&masternode),
                    governance: Some(&governance),
                    ..request(&[], &pool)
                })
                .unwrap(),
        );

        assert_eq!(tx.output.len(), 3);
        assert_eq!(tx.output[0].value.to_sat(), 50 * COIN_VALUE + 10_000);
        assert_eq!(tx.output[1].value.to_sat(), 7);
        assert_eq!(&tx.output[1].script_pubkey, address(4).script_pubkey());
        assert_eq!(tx.output[2].value.to_sat(), 9);
        assert_eq!(&tx.output[2].script_pubkey, address(5).script_pubkey());
    }

    #[test]
    fn script_sig_starts_with_height_and_carries_pool_sig() {
        let pool = pool_address();
        let tx = decode(
            &CoinbaseBuilder::new()
                .with_pool_sig(POOL_SIG.into())
                .build(&request(&[], &pool))
                .unwrap(),
        );

        let script_sig = tx.input[0].script_sig.as_bytes();
        assert_eq!(&script_sig[..4], &[0x03, 0x20, 0xa1, 0x07]);
        assert!(
            script_sig
                .windows(POOL_SIG.len())
                .any(|w| w == POOL_SIG.as_bytes())
        );
    }

    #[test]
    fn shares_over_one_hundred_percent() {
        let pool = pool_address();
        let recipients = vec![
            Recipient {
                address: address(2),
                percent: 60.0,
            },
            Recipient {
                address: address(3),
                percent: 41.0,
            },
        ];

        let err = CoinbaseBuilder::new()
            .build(&request(&recipients, &pool))
            .unwrap_err()
            .to_string();

        assert!(err.contains("more than 100%"), "{err}");
    }

    #[test]
    fn script_sig_size_limits() {
        let pool = pool_address();

        let err = CoinbaseBuilder::new()
            .with_pool_sig("a".repeat(100))
            .build(&request(&[], &pool))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Script sig too large"), "{err}");

        let err = CoinbaseBuilder::new()
            .build(&CoinbaseRequest {
                height: 0,
                ..request(&[], &pool)
            })
            .unwrap_err()
            .to_string();
        assert!(err.contains("Script sig too small"), "{err}");
    }

    #[test]
    fn deterministic_with_same_inputs() {
        let pool = pool_address();
        let builder = CoinbaseBuilder::new().with_pool_sig(POOL_SIG.into());

        assert_eq!(
            builder.build(&request(&[], &pool)).unwrap(),
            builder.build(&request(&[], &pool)).unwrap()
        );
    }
}
