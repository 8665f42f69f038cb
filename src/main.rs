use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};
use treehandler::cli::args::Cli;
use treehandler::cli::commands::execute_command;
use treehandler::cli::output;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Formatted output directed to stderr, stdout carries data
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use treehandler::util::testing;

    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_access_list_when_parsing_then_splits_on_commas() {
        let cli = Cli::try_parse_from(["treehandler", "plan", "a.json", "b.json", "-a", "item,list"])
            .expect("parse");
        match cli.command {
            Some(treehandler::cli::Commands::Plan { trees, access }) => {
                assert_eq!(trees.len(), 2);
                assert_eq!(
                    access,
                    Some(vec![
                        treehandler::domain::AccessSpec::Item,
                        treehandler::domain::AccessSpec::List
                    ])
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_unknown_access_tag_when_parsing_then_rejects() {
        let result = Cli::try_parse_from(["treehandler", "plan", "a.json", "-a", "items"]);
        assert!(result.is_err());
    }
}
