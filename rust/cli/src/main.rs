use arcade_floor::init_logging_with_filter;

/// Warnings only unless `RUST_LOG` asks for more; stdout belongs to the game.
const CLI_LOG_FILTER: &str = "warn";

fn main() {
    let format = arcade_cli::config::load_with_sources()
        .map(|resolved| resolved.config.log_format)
        .unwrap_or_default();
    if let Err(e) = init_logging_with_filter(format, CLI_LOG_FILTER) {
        eprintln!("WARNING: {}", e);
    }

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = arcade_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
