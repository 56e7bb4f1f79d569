//! Environment overrides of the settings file
//!
//! Kept in its own test binary: the process environment is shared by every
//! test in a binary.

use candy_mint::Settings;
use solana_sdk::commitment_config::CommitmentConfig;
use std::io::Write;

#[test]
fn test_env_overrides_nested_keys_over_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[rpc]
url = "http://127.0.0.1:8899"
commitment = "processed"

[send]
timeout_ms = 30000
"#
    )
    .unwrap();

    std::env::set_var("CANDY_MINT_SEND__TIMEOUT_MS", "45000");
    std::env::set_var("CANDY_MINT_RPC__COMMITMENT", "finalized");
    // CLI variables share the prefix and must not disturb the settings
    std::env::set_var("CANDY_MINT_KEYPAIR", "/tmp/candy-mint-id.json");
    std::env::set_var("CANDY_MINT_RPC_URL", "https://rpc.example.org");
    std::env::set_var("CANDY_MINT_SETTINGS", file.path());

    let settings = Settings::load(file.path().to_str()).unwrap();

    assert_eq!(settings.send.timeout_ms, 45_000);
    assert_eq!(settings.commitment().unwrap(), CommitmentConfig::finalized());
    // File values without an override survive
    assert_eq!(settings.rpc.url.as_deref(), Some("http://127.0.0.1:8899"));
    assert_eq!(settings.send.resend_interval_ms, 500);
    assert_eq!(
        settings.send_options().unwrap().timeout,
        std::time::Duration::from_millis(45_000)
    );
}
