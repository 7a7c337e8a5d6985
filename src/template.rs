use super::*;

const RESERVED_HASH: [u8; 32] = [0; 32];

/// One of the extended header's worker fields, as the template reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerField {
    pub data: [u8; WORKER_FIELD_SIZE],
    pub hash: Hash256,
    pub n: u32,
}

impl WorkerField {
    fn parse(index: usize, info: &WorkerInfo) -> Result<Self, TemplateError> {
        let invalid = |what: &str, err: stratum::InternalError| {
            TemplateError::malformed("workers", format!("worker {index} {what}: {err}"))
        };

        Ok(Self {
            data: stratum::decode_fixed(&info.data).map_err(|err| invalid("data", err))?,
            hash: info.hash.parse().map_err(|err| invalid("hash", err))?,
            n: info.n,
        })
    }
}

/// The fee, coinbase and Merkle implementations a template is built with.
#[derive(Clone)]
pub struct Collaborators {
    pub fees: Arc<dyn FeeCalculator>,
    pub coinbase: Arc<dyn CoinbaseFactory>,
    pub merkle: Arc<dyn MerkleHasher>,
}

impl Collaborators {
    pub fn new(
        fees: Arc<dyn FeeCalculator>,
        coinbase: Arc<dyn CoinbaseFactory>,
        merkle: Arc<dyn MerkleHasher>,
    ) -> Self {
        Self {
            fees,
            coinbase,
            merkle,
        }
    }

    /// Declared fees, the transparent coinbase builder and a double-SHA256 tree.
    pub fn for_pool(config: &PoolConfig) -> Self {
        let mut coinbase = CoinbaseBuilder::new();

        if let Some(pool_sig) = &config.pool_sig {
            coinbase = coinbase.with_pool_sig(pool_sig.clone());
        }

        Self::new(
            Arc::new(DeclaredFees),
            Arc::new(coinbase),
            Arc::new(Sha256dMerkle),
        )
    }
}

/// One mining round's worth of work.
///
/// Everything is derived once in [`Template::build`]. Afterwards only the
/// submission set changes, so a template can be shared behind an `Arc` by
/// every session that hands out or validates its work.
#[derive(Debug)]
pub struct Template {
    job_id: JobId,
    raw: RawTemplate,
    target: U256,
    difficulty: f64,
    rewards: Rewards,
    total_fees: u64,
    coinbase: Coinbase,
    merkle_root: Hash256,
    merkle_root_reversed: Hash256,
    prev_hash_reversed: Hash256,
    version: Version,
    bits: Nbits,
    workers: [WorkerField; stratum::WORKER_FIELDS],
    transactions: Vec<Vec<u8>>,
    tx_count: usize,
    submissions: Submissions,
    job_params: OnceLock<Notify>,
}

impl Template {
    pub fn build(
        job_id: JobId,
        raw: RawTemplate,
        config: &PoolConfig,
        collaborators: &Collaborators,
    ) -> Result<Self, TemplateError> {
        let target = parse_target(&raw.target)?;
        let difficulty = difficulty(target);

        let prev_hash_reversed = raw
            .previous_block_hash
            .parse::<Hash256>()
            .map_err(|err| TemplateError::malformed("previousblockhash", err))?
            .reversed();

        let bits = raw
            .bits
            .parse::<Nbits>()
            .map_err(|err| TemplateError::malformed("bits", err))?;

        let workers = raw
            .workers
            .iter()
            .enumerate()
            .map(|(index, info)| WorkerField::parse(index, info))
            .collect::<Result<Vec<WorkerField>, TemplateError>>()?
            .try_into()
            .map_err(|workers: Vec<WorkerField>| {
                TemplateError::malformed(
                    "workers",
                    format!(
                        "expected {} worker fields, got {}",
                        stratum::WORKER_FIELDS,
                        workers.len()
                    ),
                )
            })?;

        let transactions = raw
            .transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                hex::decode(&tx.data).map_err(|err| {
                    TemplateError::malformed(
                        "transactions",
                        format!("transaction {index} ({}): {err}", tx.hash),
                    )
                })
            })
            .collect::<Result<Vec<Vec<u8>>, TemplateError>>()?;

        let rewards = Rewards::resolve(&raw, config.reward_scale)?;

        let total_fees = collaborators
            .fees
            .total_fees(&raw.transactions)
            .map_err(|err| TemplateError::collaborator_failure(Collaborator::Fees, err))?;

        let coinbase = collaborators
            .coinbase
            .build(&CoinbaseRequest {
                height: raw.height,
                primary_reward: rewards.primary,
                fees: total_fees,
                recipients: &config.recipients,
                pool_address: &config.address,
                masternode: rewards.masternode.as_ref(),
                governance: rewards.governance.as_ref(),
            })
            .map_err(|err| TemplateError::collaborator_failure(Collaborator::Coinbase, err))?;

        let merkle_root = collaborators
            .merkle
            .merkle_root(&raw.transactions, &coinbase.hash)
            .map_err(|err| TemplateError::collaborator_failure(Collaborator::Merkle, err))?;

        let tx_count = raw.transactions.len() + 1;

        info!(
            "Built template {job_id} at height {}: {tx_count} transactions, difficulty {difficulty}, fees {total_fees}",
            raw.height
        );

        Ok(Self {
            job_id,
            version: Version::from(raw.version),
            raw,
            target,
            difficulty,
            rewards,
            total_fees,
            coinbase,
            merkle_root,
            merkle_root_reversed: merkle_root.reversed(),
            prev_hash_reversed,
            bits,
            workers,
            transactions,
            tx_count,
            submissions: Submissions::new(),
            job_params: OnceLock::new(),
        })
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn raw(&self) -> &RawTemplate {
        &self.raw
    }

    pub fn height(&self) -> u64 {
        self.raw.height
    }

    pub fn target(&self) -> U256 {
        self.target
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    pub fn total_fees(&self) -> u64 {
        self.total_fees
    }

    pub fn coinbase(&self) -> &Coinbase {
        &self.coinbase
    }

    pub fn merkle_root(&self) -> Hash256 {
        self.merkle_root
    }

    pub fn merkle_root_reversed(&self) -> Hash256 {
        self.merkle_root_reversed
    }

    pub fn prev_hash_reversed(&self) -> Hash256 {
        self.prev_hash_reversed
    }

    pub fn tx_count(&self) -> usize {
        self.tx_count
    }

    pub fn submissions(&self) -> &Submissions {
        &self.submissions
    }

    /// The 248-byte extended header for one solution attempt.
    pub fn serialize_header(&self, ntime: &Ntime, nonce: &Nonce) -> Vec<u8> {
        let mut header = Vec::with_capacity(HEADER_SIZE);

        header
            .write_u32::<LittleEndian>(self.version.into())
            .expect("in-memory writers don't error");
        header.extend_from_slice(self.prev_hash_reversed.as_bytes());
        header.extend_from_slice(self.merkle_root_reversed.as_bytes());
        header.extend_from_slice(&RESERVED_HASH);
        header.extend_from_slice(ntime.as_bytes());
        header.extend_from_slice(&self.bits.to_le_bytes());

        for worker in &self.workers {
            header.extend(worker.data.iter().rev());
        }

        header.extend_from_slice(nonce.as_bytes());

        debug_assert_eq!(header.len(), HEADER_SIZE);

        header
    }

    /// Header, solution, transaction count, coinbase, then the template's
    /// transactions in order.
    pub fn serialize_block(&self, header: &[u8], solution: &Solution) -> Vec<u8> {
        let tx_count = compact_size(self.tx_count as u64);

        let size = header.len()
            + solution.len()
            + tx_count.len()
            + self.coinbase.bytes.len()
            + self.transactions.iter().map(Vec::len).sum::<usize>();

        let mut block = Vec::with_capacity(size);
        block.extend_from_slice(header);
        block.extend_from_slice(solution.as_bytes());
        block.extend_from_slice(&tx_count);
        block.extend_from_slice(&self.coinbase.bytes);

        for tx in &self.transactions {
            block.extend_from_slice(tx);
        }

        block
    }

    /// Records a submission, returning `false` if this exact header and
    /// solution were already submitted against this template.
    pub fn register_submit(&self, header: &[u8], solution: &Solution) -> bool {
        debug_assert_eq!(header.len(), HEADER_SIZE);

        let accepted = self.submissions.register(header, solution.as_bytes());

        if !accepted {
            debug!("Duplicate submission for template {}", self.job_id);
        }

        accepted
    }

    /// `mining.notify` params, computed on first use.
    pub fn job_params(&self) -> &Notify {
        self.job_params.get_or_init(|| Notify {
            job_id: self.job_id,
            version: self.version,
            prevhash: self.prev_hash_reversed,
            merkle_root: self.merkle_root_reversed,
            reserved: Hash256::from_byte_array(RESERVED_HASH),
            ntime: Ntime::from(self.raw.current_time),
            nbits: self.bits,
            workers: self.workers.map(|worker| WorkerParams {
                hash: worker.hash.reversed(),
                n: worker.n,
            }),
            clean_jobs: true,
        })
    }
}

/// Canonical CompactSize, the only transaction count encoding nodes accept.
pub(crate) fn compact_size(n: u64) -> Vec<u8> {
    consensus::serialize(&VarInt(n))
}
