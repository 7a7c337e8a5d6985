use {
    anyhow::{Context, Error, anyhow, ensure},
    arguments::Arguments,
    bitcoin::{
        Amount, OutPoint, PubkeyHash, ScriptBuf, ScriptHash, Sequence, Transaction, TxIn,
        TxMerkleNode, TxOut, Txid, VarInt, Witness, consensus, hashes::Hash,
        locktime::absolute::LockTime, merkle_tree, script::write_scriptint,
    },
    byteorder::{LittleEndian, WriteBytesExt},
    clap::Parser,
    dashmap::DashSet,
    derive_more::Display,
    options::Options,
    primitive_types::U256,
    serde::{Deserialize, Deserializer, Serialize},
    serde_with::{DeserializeFromStr, SerializeDisplay},
    snafu::Snafu,
    std::{
        collections::{BTreeMap, HashMap},
        env,
        fmt::{self, Formatter},
        fs,
        io::{self, Read},
        path::{Path, PathBuf},
        process,
        str::FromStr,
        sync::{Arc, LazyLock, OnceLock},
    },
    stratum::{Hash256, JobId, Nbits, Nonce, Notify, Ntime, Solution, Version, WorkerParams},
    tracing::{debug, info, warn},
    tracing_appender::non_blocking,
    tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt},
};

pub use {
    block_template::{Payee, RawTemplate, TemplateTransaction, WorkerInfo},
    coinbase_builder::{Coinbase, CoinbaseBuilder, CoinbaseFactory, CoinbaseRequest},
    difficulty::{DIFFICULTY_1_TARGET, difficulty, parse_target, target_hex},
    error::{Collaborator, TemplateError},
    fees::{DeclaredFees, FeeCalculator},
    jobs::Jobs,
    merkle::{MerkleHasher, Sha256dMerkle},
    payout::{PayoutAddress, PoolConfig, Recipient},
    rewards::{Rewards, SecondaryReward},
    submissions::Submissions,
    template::{Collaborators, Template, WorkerField},
};

mod arguments;
mod block_template;
mod coinbase_builder;
mod difficulty;
mod error;
mod fees;
mod jobs;
mod logs;
mod merkle;
mod options;
mod payout;
mod rewards;
pub mod settings;
pub mod subcommand;
mod submissions;
mod template;

pub const COIN_VALUE: u64 = 100_000_000;
pub const HEADER_SIZE: usize = 248;
pub const WORKER_FIELD_SIZE: usize = 36;
pub const DEFAULT_REWARD_SCALE: u64 = 100_000;
pub const POOL_SIG: &str = "/anima/";

type Result<T = (), E = Error> = std::result::Result<T, E>;

pub fn main() {
    let guard = logs::init();

    let args = Arguments::parse();

    let code = match args.run() {
        Err(err) => {
            eprintln!("error: {err}");

            for (i, cause) in err.chain().skip(1).enumerate() {
                if i == 0 {
                    eprintln!();
                    eprintln!("because:");
                }
                eprintln!("- {cause}");
            }

            if env::var_os("RUST_BACKTRACE")
                .map(|val| val == "1")
                .unwrap_or_default()
            {
                eprintln!();
                eprintln!("{}", err.backtrace());
            }

            1
        }
        Ok(_) => 0,
    };

    // Flush buffered log lines, process::exit skips destructors.
    drop(guard);

    process::exit(code);
}
