use std::env;
use std::process::exit;

use anyhow::Result;
use cli::constants::{EXIT_CODE_INVALID_ARGUMENTS, EXIT_CODE_RUN_FAILED};
use cli::utils::print_configuration;
use kernel::constants::{CARGO_VERSION, VERSION};
use remove_comments::{build_configuration, get_options, print_languages, print_usage, run};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "remove-comments".to_string());
    let opts = get_options();

    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("error when parsing arguments: {}", f);
            print_usage(&program, &opts);
            exit(EXIT_CODE_INVALID_ARGUMENTS)
        }
    };

    if matches.opt_present("version") {
        println!("Version: {}, revision: {}", CARGO_VERSION, VERSION);
        exit(0);
    }

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        exit(0);
    }

    if matches.opt_present("list-languages") {
        print_languages();
        exit(0);
    }

    if !matches.free.is_empty() {
        eprintln!("unexpected arguments: {}", matches.free.join(" "));
        print_usage(&program, &opts);
        exit(EXIT_CODE_INVALID_ARGUMENTS);
    }

    // logs go to stderr, the report owns stdout
    let default_level = if matches.opt_present("debug") {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let configuration = match build_configuration(&matches) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            exit(e.exit_code())
        }
    };

    if configuration.use_debug {
        print_configuration(&configuration);
    }

    if let Err(e) = run(&configuration, std::io::stdout()) {
        eprintln!("{:#}", e);
        exit(EXIT_CODE_RUN_FAILED);
    }
    Ok(())
}
