use std::{env, env::VarError};

/// The bot takes no arguments, so any argument prints the help text instead of starting it.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "PRICEBOT_CATALOG_DIR",
        "PRICEBOT_PRICE_SHEET",
        "PRICEBOT_CATALOG_REFRESH_INTERVAL",
        "PRICEBOT_TRACKING_INTERVAL",
        "PRICEBOT_TRACKING_DURATION",
        "PRICEBOT_MAX_TRACKING_DURATION",
        "PRICEBOT_DEFAULT_REGION",
        "PRICEBOT_FUZZY_MATCHING",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
