use super::*;

/// Equihash pow limit, `0007ffff…ff`.
pub static DIFFICULTY_1_TARGET: LazyLock<U256> = LazyLock::new(|| U256::MAX >> 13usize);

/// Parses the template's hex target. Zero is rejected since no hash can meet it.
pub fn parse_target(hex: &str) -> Result<U256, TemplateError> {
    if hex.is_empty() || hex.len() > 64 {
        return Err(TemplateError::malformed(
            "target",
            format!("expected 1 to 64 hex digits, got {}", hex.len()),
        ));
    }

    let target = U256::from_str_radix(hex, 16)
        .map_err(|err| TemplateError::malformed("target", format!("`{hex}`: {err:?}")))?;

    if target.is_zero() {
        return Err(TemplateError::malformed("target", "target is zero"));
    }

    Ok(target)
}

/// Zero-padded big-endian hex, the form nodes report targets in.
pub fn target_hex(target: U256) -> String {
    hex::encode(target.to_big_endian())
}

/// `DIFFICULTY_1_TARGET / target`, rounded to nine decimal places.
///
/// Lossy: both sides go through `f64`. The target remains authoritative.
pub fn difficulty(target: U256) -> f64 {
    let difficulty = to_f64(*DIFFICULTY_1_TARGET) / to_f64(target);
    (difficulty * 1e9).round() / 1e9
}

fn to_f64(n: U256) -> f64 {
    n.0.iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_limit_is_difficulty_one() {
        assert_eq!(
            target_hex(*DIFFICULTY_1_TARGET),
            format!("0007{}", "f".repeat(60))
        );
        assert_eq!(difficulty(*DIFFICULTY_1_TARGET), 1.0);
    }

    #[test]
    fn halving_the_target_doubles_difficulty() {
        let target = parse_target(&format!("0003{}", "f".repeat(60))).unwrap();
        assert_eq!(difficulty(target), 2.0);
    }

    #[test]
    fn rounds_to_nine_places() {
        let target = parse_target(&format!("0006{}", "0".repeat(60))).unwrap();
        let d = difficulty(target);
        assert_eq!(d, 1.333333333);
    }

    #[test]
    fn easiest_target_is_still_positive() {
        let target = parse_target(&"f".repeat(64)).unwrap();
        assert!(difficulty(target) > 0.0);
    }

    #[test]
    fn target_round_trips() {
        let hex = "00000000ffff0000000000000000000000000000000000000000000000000000";
        let target = parse_target(hex).unwrap();
        assert_eq!(target_hex(target), hex);
        assert!(difficulty(target) > 1.0);
    }

    #[test]
    fn invalid_targets() {
        assert!(parse_target("").unwrap_err().is_malformed());
        assert!(parse_target("xyz").unwrap_err().is_malformed());
        assert!(parse_target(&"0".repeat(64)).unwrap_err().is_malformed());
        assert!(parse_target(&"f".repeat(65)).unwrap_err().is_malformed());
    }
}
