// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, File, Login};

use freezer::logging::{init_logging, parse_level};
use freezer::AppState;

command_enum! {
    (File, File),
    (Login, Login),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let state = match AppState::load(args.config_path.clone()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Flag > config file > warn
    let level = parse_level(
        args.log_level
            .as_deref()
            .unwrap_or(state.config.log_level.as_str()),
    );
    let guards = init_logging(level, state.config.log_dir.as_ref());

    let code = match cli::op::OpContext::connect(&args, state).await {
        Ok(ctx) => match args.command.execute(&ctx).await {
            Ok(output) => {
                println!("{}", output);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush non-blocking writers before exiting
    drop(guards);
    std::process::exit(code);
}
