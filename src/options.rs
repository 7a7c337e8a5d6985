use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
    #[arg(long, help = "Load configuration from <CONFIG>.")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Load configuration from <CONFIG_DIR>/anima.json.")]
    pub config_dir: Option<PathBuf>,

    #[arg(long, help = "Pay the pool share of every block to <POOL_ADDRESS>.")]
    pub pool_address: Option<PayoutAddress>,

    #[arg(
        long = "recipient",
        value_name = "ADDRESS:PERCENT",
        help = "Pay <PERCENT> of every block reward to <ADDRESS>. May be repeated."
    )]
    pub recipients: Vec<Recipient>,

    #[arg(
        long,
        help = "Convert node reward amounts to coinbase units by multiplying with <REWARD_SCALE>. [default: 100000]"
    )]
    pub reward_scale: Option<u64>,

    #[arg(
        long,
        help = "Tag coinbase script sigs with <POOL_SIG>. Empty to omit. [default: /anima/]"
    )]
    pub pool_sig: Option<String>,
}
