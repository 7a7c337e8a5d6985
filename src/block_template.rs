use super::*;

/// A `getblocktemplate` result as the node returns it.
///
/// Hex fields stay as strings here; [`Template::build`] validates them so a
/// bad field surfaces as a [`TemplateError`] naming it.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct RawTemplate {
    pub height: u64,
    #[serde(rename = "previousblockhash")]
    pub previous_block_hash: String,
    pub bits: String,
    pub target: String,
    #[serde(rename = "curtime")]
    pub current_time: u32,
    pub version: u32,
    pub transactions: Vec<TemplateTransaction>,
    /// Miner subsidy in node units.
    pub miner: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub masternode: Option<Payee>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub governance: Option<Payee>,
    pub workers: Vec<WorkerInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct TemplateTransaction {
    pub data: String,
    /// Txid in RPC display order.
    pub hash: Hash256,
    #[serde(default)]
    pub fee: u64,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Payee {
    #[serde(default)]
    pub payee: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct WorkerInfo {
    pub data: String,
    pub hash: String,
    pub n: u32,
}

impl RawTemplate {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(json).map_err(|err| TemplateError::MalformedTemplate {
            field: "template",
            message: err.to_string(),
        })
    }
}

// Nodes report an inactive payee class as `{}` or `null` rather than omitting it.
fn empty_as_none<'de, D>(d: D) -> Result<Option<Payee>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(d)?;

    match value {
        None => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn template_json() -> serde_json::Value {
        json!({
            "capabilities": ["proposal"],
            "version": 4,
            "previousblockhash": "00".repeat(31) + "01",
            "transactions": [
                {
                    "data": "0100",
                    "hash": "ab".repeat(32),
                    "fee": 1500,
                    "depends": []
                }
            ],
            "miner": 12.5,
            "masternode": {},
            "governance": { "payee": "t1Hsc1LR8yKnbbe3twRp88p6vFfC5t7DLbs", "amount": 1.25 },
            "curtime": 1_600_000_000u32,
            "bits": "1d00ffff",
            "target": "00000000ffff0000000000000000000000000000000000000000000000000000",
            "height": 100,
            "workers": []
        })
    }

    #[test]
    fn parses_node_template() {
        let raw = RawTemplate::from_json(&template_json().to_string()).unwrap();

        assert_eq!(raw.height, 100);
        assert_eq!(raw.version, 4);
        assert_eq!(raw.transactions.len(), 1);
        assert_eq!(raw.transactions[0].fee, 1500);
        assert_eq!(raw.masternode, None);
        assert_eq!(
            raw.governance,
            Some(Payee {
                payee: "t1Hsc1LR8yKnbbe3twRp88p6vFfC5t7DLbs".into(),
                amount: 1.25,
            })
        );
    }

    #[test]
    fn null_and_missing_payees_are_inactive() {
        let mut value = template_json();
        value["masternode"] = serde_json::Value::Null;
        value.as_object_mut().unwrap().remove("governance");

        let raw = RawTemplate::from_json(&value.to_string()).unwrap();
        assert_eq!(raw.masternode, None);
        assert_eq!(raw.governance, None);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let mut value = template_json();
        value.as_object_mut().unwrap().remove("target");

        let err = RawTemplate::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, TemplateError::MalformedTemplate { .. }));
        assert!(err.to_string().contains("target"));
    }
}
