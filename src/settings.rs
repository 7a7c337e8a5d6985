use super::*;

const CONFIG_FILE_NAME: &str = "anima.json";

/// JSON config file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pool_address: Option<PayoutAddress>,
    pub recipients: Option<Vec<Recipient>>,
    pub reward_scale: Option<u64>,
    pub pool_sig: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct Settings {
    pub config: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    pub pool_address: Option<PayoutAddress>,
    pub recipients: Option<Vec<Recipient>>,
    pub reward_scale: Option<u64>,
    pub pool_sig: Option<String>,
}

impl Settings {
    /// Load settings from all sources with proper priority
    pub(crate) fn load(options: Options) -> Result<Self> {
        let mut env = BTreeMap::<String, String>::new();

        for (var, value) in std::env::vars_os() {
            let Some(var) = var.to_str() else {
                continue;
            };

            let Some(key) = var.strip_prefix("ANIMA_") else {
                continue;
            };

            env.insert(
                key.into(),
                value.into_string().map_err(|value| {
                    anyhow!(
                        "environment variable `{var}` not valid unicode: `{}`",
                        value.to_string_lossy()
                    )
                })?,
            );
        }

        Self::merge(options, env)
    }

    pub(crate) fn merge(options: Options, env: BTreeMap<String, String>) -> Result<Self> {
        let settings = Self::from_options(options).or(Self::from_env(&env)?);

        let config = match Self::find_config_path(&settings) {
            Some(path) => serde_json::from_str::<Config>(
                &fs::read_to_string(&path)
                    .with_context(|| format!("failed to open config file `{}`", path.display()))?,
            )
            .with_context(|| format!("failed to deserialize config file `{}`", path.display()))?,
            None => Config::default(),
        };

        let settings = settings.or(Self::from_config(config)).or_defaults();

        settings.validate()?;

        Ok(settings)
    }

    fn find_config_path(settings: &Self) -> Option<PathBuf> {
        if let Some(path) = &settings.config {
            return Some(path.clone());
        }

        if let Some(dir) = &settings.config_dir {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.exists() {
                return Some(path);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("anima").join(CONFIG_FILE_NAME);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    pub(crate) fn from_options(options: Options) -> Self {
        Self {
            config: options.config,
            config_dir: options.config_dir,
            pool_address: options.pool_address,
            recipients: (!options.recipients.is_empty()).then_some(options.recipients),
            reward_scale: options.reward_scale,
            pool_sig: options.pool_sig,
        }
    }

    pub fn from_env(env: &BTreeMap<String, String>) -> Result<Self> {
        let get_path = |key: &str| env.get(key).map(PathBuf::from);

        let get_parsed = |key: &str| -> Result<Option<u64>> {
            env.get(key)
                .map(|int| int.parse::<u64>())
                .transpose()
                .with_context(|| format!("failed to parse environment variable ANIMA_{key} as u64"))
        };

        let recipients = env
            .get("RECIPIENTS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse::<Recipient>)
                    .collect::<Result<Vec<Recipient>>>()
            })
            .transpose()
            .context("failed to parse environment variable ANIMA_RECIPIENTS")?;

        Ok(Self {
            config: get_path("CONFIG"),
            config_dir: get_path("CONFIG_DIR"),
            pool_address: env
                .get("POOL_ADDRESS")
                .map(|address| address.parse::<PayoutAddress>())
                .transpose()
                .context("failed to parse environment variable ANIMA_POOL_ADDRESS")?,
            recipients,
            reward_scale: get_parsed("REWARD_SCALE")?,
            pool_sig: env.get("POOL_SIG").cloned(),
        })
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            pool_address: config.pool_address,
            recipients: config.recipients,
            reward_scale: config.reward_scale,
            pool_sig: config.pool_sig,
            ..Default::default()
        }
    }

    pub fn or(self, other: Self) -> Self {
        Self {
            config: self.config.or(other.config),
            config_dir: self.config_dir.or(other.config_dir),
            pool_address: self.pool_address.or(other.pool_address),
            recipients: self.recipients.or(other.recipients),
            reward_scale: self.reward_scale.or(other.reward_scale),
            pool_sig: self.pool_sig.or(other.pool_sig),
        }
    }

    fn or_defaults(self) -> Self {
        Self {
            recipients: Some(self.recipients.unwrap_or_default()),
            reward_scale: Some(self.reward_scale.unwrap_or(DEFAULT_REWARD_SCALE)),
            pool_sig: Some(self.pool_sig.unwrap_or_else(|| POOL_SIG.into())),
            ..self
        }
    }

    fn validate(&self) -> Result {
        ensure!(
            self.reward_scale != Some(0),
            "reward scale must be greater than zero"
        );

        let recipients = self.recipients.as_deref().unwrap_or_default();

        for recipient in recipients {
            ensure!(
                recipient.percent.is_finite() && recipient.percent >= 0.0,
                "recipient {} has invalid share {}",
                recipient.address,
                recipient.percent
            );
        }

        let total = recipients.iter().map(|r| r.percent).sum::<f64>();

        ensure!(
            total <= 100.0,
            "recipient shares add up to {total}%, more than 100%"
        );

        Ok(())
    }

    pub fn pool_config(&self) -> Result<PoolConfig> {
        let address = self.pool_address.clone().context(
            "no pool address configured: pass --pool-address, set ANIMA_POOL_ADDRESS, or add `pool_address` to the config file",
        )?;

        Ok(PoolConfig::new(address)
            .with_recipients(self.recipients.clone().unwrap_or_default())
            .with_reward_scale(self.reward_scale.unwrap_or(DEFAULT_REWARD_SCALE))
            .with_pool_sig(
                self.pool_sig
                    .clone()
                    .or_else(|| Some(POOL_SIG.into()))
                    .filter(|sig| !sig.is_empty()),
            ))
    }
}
