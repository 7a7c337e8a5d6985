use super::*;

#[derive(Debug, Parser)]
pub struct Job {
    #[arg(help = "Read getblocktemplate JSON from <TEMPLATE>, or `-` for stdin.")]
    template: PathBuf,
    #[arg(long, help = "Show raw mining.notify params.")]
    raw: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub job_id: JobId,
    pub height: u64,
    pub target: String,
    pub difficulty: f64,
    pub tx_count: usize,
    pub total_fees: u64,
    pub coinbase: CoinbaseInfo,
    pub merkle_root: Hash256,
    pub params: Notify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinbaseInfo {
    pub txid: Hash256,
    pub hex: String,
    pub size_bytes: usize,
    pub ascii_tag: Option<String>,
    pub outputs: Vec<CoinbaseOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinbaseOutput {
    pub value: u64,
    pub script_pubkey: ScriptBuf,
}

impl Job {
    pub(crate) fn run(self, settings: &Settings) -> Result {
        let template = publish_template(settings, &self.template)?;

        if self.raw {
            print_json(template.job_params())
        } else {
            print_json(&Self::interpret_template(&template)?)
        }
    }

    fn interpret_template(template: &Template) -> Result<Output> {
        let coinbase = template.coinbase();

        let coinbase_tx = consensus::deserialize::<Transaction>(&coinbase.bytes)
            .context("coinbase does not decode as a transaction")?;

        let outputs = coinbase_tx
            .output
            .iter()
            .map(|txout| CoinbaseOutput {
                value: txout.value.to_sat(),
                script_pubkey: txout.script_pubkey.clone(),
            })
            .collect();

        Ok(Output {
            job_id: template.job_id(),
            height: template.height(),
            target: target_hex(template.target()),
            difficulty: template.difficulty(),
            tx_count: template.tx_count(),
            total_fees: template.total_fees(),
            coinbase: CoinbaseInfo {
                txid: coinbase.hash,
                hex: hex::encode(&coinbase.bytes),
                size_bytes: coinbase.bytes.len(),
                ascii_tag: Self::extract_coinbase_text(&coinbase_tx),
                outputs,
            },
            merkle_root: template.merkle_root(),
            params: template.job_params().clone(),
        })
    }

    /// Printable runs of three or more bytes following the BIP34 height push.
    fn extract_coinbase_text(tx: &Transaction) -> Option<String> {
        let bytes = tx.input.first()?.script_sig.as_bytes();

        let skip_bytes = 1 + usize::from(*bytes.first()?);

        let mut ascii_parts = Vec::new();
        let mut current_string = String::new();

        for &byte in bytes.iter().skip(skip_bytes) {
            if (0x20..=0x7e).contains(&byte) {
                current_string.push(byte as char);
            } else if !current_string.is_empty() {
                if current_string.len() >= 3 {
                    ascii_parts.push(current_string.clone());
                }
                current_string.clear();
            }
        }

        if current_string.len() >= 3 {
            ascii_parts.push(current_string);
        }

        (!ascii_parts.is_empty()).then(|| ascii_parts.join(" "))
    }
}
