mod helpers;

use helpers::CliRunner;
use serial_test::serial;
use std::io::Write;

#[test]
#[serial]
fn help_lists_expected_commands() {
    let cli = CliRunner::new();
    let res = cli.run(&["--help"]);
    assert_eq!(res.exit_code, 0);
    for cmd in ["play", "balance", "reset", "stats", "history", "alias", "cfg", "games"] {
        assert!(res.stdout.contains(cmd), "help should list subcommand `{}`", cmd);
    }
}

#[test]
#[serial]
fn unknown_command_prints_usage_and_exits_2() {
    let cli = CliRunner::new();
    let res = cli.run(&["spin"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Usage: arcade <command> [options]"));
    assert!(res.stderr.contains("  history"));
}

#[test]
#[serial]
fn games_lists_every_table() {
    let cli = CliRunner::new();
    let res = cli.run(&["games"]);
    assert_eq!(res.exit_code, 0);
    assert_eq!(res.stdout.lines().count(), 21);
    let blackjack = res
        .stdout
        .lines()
        .find(|l| l.starts_with("blackjack"))
        .expect("blackjack row");
    assert!(blackjack.contains("Blackjack"));
    assert!(blackjack.contains("50"));
    assert!(res.stdout.contains("cee_lo"));
}

#[test]
#[serial]
fn cfg_reports_value_sources() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "starting_credits = 750").unwrap();
    let cli = CliRunner::new()
        .with_env("ARCADE_CONFIG", file.path().to_str().unwrap())
        .with_env("ARCADE_SEED", "7");

    let res = cli.run(&["cfg"]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["starting_credits"]["value"], 750);
    assert_eq!(json["starting_credits"]["source"], "file");
    assert_eq!(json["seed"]["value"], 7);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["log_capacity"]["source"], "default");
    assert_eq!(json["tables"]["value"]["crash"]["tick_ms"], 70);
}

#[test]
#[serial]
fn invalid_config_exits_2() {
    let cli = CliRunner::new().with_env("ARCADE_STARTING_CREDITS", "lots");
    let res = cli.run(&["balance"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Error: Configuration error: Invalid starting credits"));
}

#[test]
#[serial]
fn fresh_bankroll_uses_configured_credits() {
    let cli = CliRunner::new().with_env("ARCADE_STARTING_CREDITS", "2500");
    let res = cli.run(&["balance"]);
    assert_eq!(res.exit_code, 0);
    assert_eq!(res.stdout.trim(), "Balance: 2500 credits");
    // nothing is written until something changes
    assert!(cli.data_dir().read_dir().unwrap().next().is_none());
}

#[test]
#[serial]
fn alias_is_set_shown_and_cleared() {
    let cli = CliRunner::new();
    assert_eq!(cli.run(&["alias"]).stdout.trim(), "No alias set.");

    let res = cli.run(&["alias", "  High Roller  "]);
    assert_eq!(res.stdout.trim(), "Alias: High Roller");
    assert_eq!(cli.run(&["balance"]).stdout.trim(), "High Roller: 1000 credits");

    let res = cli.run(&["alias", ""]);
    assert_eq!(res.stdout.trim(), "No alias set.");
}

#[test]
#[serial]
fn reset_requires_confirmation() {
    let cli = CliRunner::new();
    // a false start loses the stake
    cli.run_with_input(&["play", "reflex", "--stake", "20"], "tap\n");
    assert_eq!(cli.run(&["balance"]).stdout.trim(), "Balance: 980 credits");

    let res = cli.run_with_input(&["reset"], "no\n");
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("Reset cancelled."));
    assert_eq!(cli.run(&["balance"]).stdout.trim(), "Balance: 980 credits");

    let res = cli.run_with_input(&["reset"], "reset\n");
    assert!(res.stdout.contains("Bankroll reset to 1000 credits."));
    assert_eq!(cli.run(&["balance"]).stdout.trim(), "Balance: 1000 credits");
}

#[test]
#[serial]
fn reset_yes_can_clear_stats() {
    let cli = CliRunner::new();
    cli.run_with_input(&["play", "reflex", "--stake", "20"], "tap\n");

    let res = cli.run(&["reset", "--yes", "--stats"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("Stats cleared."));

    let stats: serde_json::Value =
        serde_json::from_str(&cli.run(&["stats", "--json"]).stdout).unwrap();
    assert_eq!(stats["rounds"], 0);
}

#[test]
#[serial]
fn history_rejects_zero_limit() {
    let cli = CliRunner::new();
    let res = cli.run(&["history", "--limit", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("limit must be >= 1"));
    assert!(cli.run(&["history"]).stdout.contains("No settlements yet."));
}
