use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryReward {
    pub address: PayoutAddress,
    pub amount: u64,
}

/// Block reward split, in coinbase output units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewards {
    pub primary: u64,
    pub masternode: Option<SecondaryReward>,
    pub governance: Option<SecondaryReward>,
}

impl Rewards {
    /// Scales the node's amounts by `reward_scale`.
    ///
    /// A secondary class pays out only when the template names a payee and a
    /// positive amount for it. `{}`, `null`, an empty payee or a zero amount
    /// all mean the class is inactive for this block.
    pub fn resolve(raw: &RawTemplate, reward_scale: u64) -> Result<Self, TemplateError> {
        Ok(Self {
            primary: scale("miner", raw.miner, reward_scale)?,
            masternode: secondary("masternode", raw.masternode.as_ref(), reward_scale)?,
            governance: secondary("governance", raw.governance.as_ref(), reward_scale)?,
        })
    }

    pub fn secondary(&self) -> impl Iterator<Item = &SecondaryReward> {
        self.masternode.iter().chain(self.governance.iter())
    }
}

fn scale(field: &'static str, amount: f64, reward_scale: u64) -> Result<u64, TemplateError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(TemplateError::malformed(
            field,
            format!("reward {amount} is not a non-negative number"),
        ));
    }

    let scaled = (amount * reward_scale as f64).round();

    if scaled >= u64::MAX as f64 {
        return Err(TemplateError::malformed(
            field,
            format!("reward {amount} overflows after scaling by {reward_scale}"),
        ));
    }

    Ok(scaled as u64)
}

fn secondary(
    field: &'static str,
    payee: Option<&Payee>,
    reward_scale: u64,
) -> Result<Option<SecondaryReward>, TemplateError> {
    let Some(payee) = payee else {
        return Ok(None);
    };

    if payee.payee.is_empty() || payee.amount <= 0.0 {
        debug!("{field} payee inactive for this block");
        return Ok(None);
    }

    let amount = scale(field, payee.amount, reward_scale)?;

    let address = payee
        .payee
        .parse::<PayoutAddress>()
        .map_err(|err| TemplateError::malformed(field, format!("{err:#}")))?;

    Ok(Some(SecondaryReward { address, amount }))
}
