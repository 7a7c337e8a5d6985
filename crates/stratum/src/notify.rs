use super::*;

/// Per-worker commitment broadcast alongside the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerParams {
    /// Already in header byte order.
    pub hash: Hash256,
    pub n: u32,
}

/// `mining.notify` params for the extended header.
#[derive(Debug, Clone, PartialEq)]
pub struct Notify {
    pub job_id: JobId,
    pub version: Version,
    pub prevhash: Hash256,
    pub merkle_root: Hash256,
    pub reserved: Hash256,
    pub ntime: Ntime,
    pub nbits: Nbits,
    pub workers: [WorkerParams; WORKER_FIELDS],
    pub clean_jobs: bool,
}

impl Notify {
    const LEN: usize = 8 + 2 * WORKER_FIELDS;
}

impl Serialize for Notify {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(Self::LEN))?;
        seq.serialize_element(&self.job_id)?;
        seq.serialize_element(&self.version)?;
        seq.serialize_element(&self.prevhash)?;
        seq.serialize_element(&self.merkle_root)?;
        seq.serialize_element(&self.reserved)?;
        seq.serialize_element(&self.ntime)?;
        seq.serialize_element(&hex::encode(self.nbits.to_le_bytes()))?;
        for worker in &self.workers {
            seq.serialize_element(&worker.hash)?;
            seq.serialize_element(&pack_u32_le(worker.n))?;
        }
        seq.serialize_element(&self.clean_jobs)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Notify {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (
            job_id,
            version,
            prevhash,
            merkle_root,
            reserved,
            ntime,
            nbits,
            hash0,
            n0,
            hash1,
            n1,
            hash2,
            n2,
            clean_jobs,
        ) = <(
            JobId,
            Version,
            Hash256,
            Hash256,
            Hash256,
            Ntime,
            String,
            Hash256,
            String,
            Hash256,
            String,
            Hash256,
            String,
            bool,
        )>::deserialize(deserializer)?;

        let nbits = decode_fixed::<4>(&nbits)
            .map(Nbits::from_le_bytes)
            .map_err(de::Error::custom)?;

        let worker = |hash: Hash256, n: String| -> Result<WorkerParams, D::Error> {
            Ok(WorkerParams {
                hash,
                n: unpack_u32_le(&n).map_err(de::Error::custom)?,
            })
        };

        Ok(Notify {
            job_id,
            version,
            prevhash,
            merkle_root,
            reserved,
            ntime,
            nbits,
            workers: [worker(hash0, n0)?, worker(hash1, n1)?, worker(hash2, n2)?],
            clean_jobs,
        })
    }
}
