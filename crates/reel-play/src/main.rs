#![forbid(unsafe_code)]

//! reel-play binary entry point.

use reel_play::cli;
use reel_runtime::Player;

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = reel_play::logging::init(path, &opts.log_filter)
    {
        eprintln!("Cannot open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    let animation = match reel_play::build_animation(&opts) {
        Ok(animation) => animation,
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    };

    // The session guard inside `run` has restored the terminal by the time
    // it returns, so errors print to a sane screen.
    if let Err(e) = Player::new(opts.player_config()).run(animation) {
        tracing::error!(error = %e, "playback failed");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
