use super::*;

fn pool_value(output: &JobOutput) -> u64 {
    output.coinbase.outputs[0].value
}

#[test]
fn pool_address_from_config_dir() {
    let output = CommandBuilder::new("--config-dir . job template.json")
        .write("template.json", template())
        .write(
            "anima.json",
            json!({ "pool_address": address(1) }).to_string(),
        )
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(pool_value(&output), 1_251_000);
}

#[test]
fn pool_address_from_xdg_config() {
    let output = CommandBuilder::new("job template.json")
        .write("template.json", template())
        .write(
            ".config/anima/anima.json",
            json!({ "pool_address": address(1) }).to_string(),
        )
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(output.height, 500_000);
}

#[test]
fn config_file_settings() {
    let output = CommandBuilder::new("--config pool.json job template.json")
        .write("template.json", template())
        .write(
            "pool.json",
            json!({
                "pool_address": address(1),
                "recipients": [{ "address": address(2), "percent": 10.0 }],
                "reward_scale": 100_000_000,
                "pool_sig": "/file/"
            })
            .to_string(),
        )
        .run_and_deserialize_output::<JobOutput>();

    let total = 1_250_000_000 + 1000;

    pretty_assert_eq!(
        output
            .coinbase
            .outputs
            .iter()
            .map(|output| output.value)
            .collect::<Vec<u64>>(),
        vec![total - total / 10, total / 10, 375_000_000]
    );
    assert_eq!(output.coinbase.ascii_tag.as_deref(), Some("/file/"));
}

#[test]
fn env_overrides_config_file() {
    let output = CommandBuilder::new("--config pool.json job template.json")
        .write("template.json", template())
        .write(
            "pool.json",
            json!({ "pool_address": address(1), "reward_scale": 1 }).to_string(),
        )
        .env("ANIMA_REWARD_SCALE", "10")
        .env("ANIMA_POOL_SIG", "/env/")
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(pool_value(&output), 125 + 1000);
    assert_eq!(output.coinbase.ascii_tag.as_deref(), Some("/env/"));
}

#[test]
fn cli_overrides_env() {
    let output = CommandBuilder::new("--reward-scale 100 job template.json")
        .write("template.json", template())
        .env("ANIMA_POOL_ADDRESS", address(1))
        .env("ANIMA_REWARD_SCALE", "10")
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(pool_value(&output), 1250 + 1000);
}

#[test]
fn env_recipients() {
    let output = CommandBuilder::new(pool_args("job template.json"))
        .write("template.json", template())
        .env(
            "ANIMA_RECIPIENTS",
            format!("{}:1,{}:2", address(2), address(3)),
        )
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(output.coinbase.outputs.len(), 4);
    assert_eq!(output.coinbase.outputs[1].value, 12_510);
    assert_eq!(output.coinbase.outputs[2].value, 25_020);
}

#[test]
fn empty_pool_sig_omits_tag() {
    let output = CommandBuilder::new(pool_args("job template.json"))
        .write("template.json", template())
        .env("ANIMA_POOL_SIG", "")
        .run_and_deserialize_output::<JobOutput>();

    assert_eq!(output.coinbase.ascii_tag, None);
}

#[test]
fn unknown_config_field() {
    CommandBuilder::new("--config pool.json job template.json")
        .write("template.json", template())
        .write("pool.json", r#"{ "port": 1 }"#)
        .expected_exit_code(1)
        .expected_stderr("failed to deserialize config file `pool.json`")
        .run_and_extract_stdout();
}

#[test]
fn invalid_env_value() {
    CommandBuilder::new(pool_args("job template.json"))
        .write("template.json", template())
        .env("ANIMA_REWARD_SCALE", "lots")
        .expected_exit_code(1)
        .expected_stderr("failed to parse environment variable ANIMA_REWARD_SCALE as u64")
        .run_and_extract_stdout();
}

#[test]
fn recipient_shares_over_one_hundred_percent() {
    CommandBuilder::new(pool_args(&format!(
        "--recipient {}:60 --recipient {}:41 job template.json",
        address(2),
        address(3)
    )))
    .write("template.json", template())
    .expected_exit_code(1)
    .expected_stderr("more than 100%")
    .run_and_extract_stdout();
}
