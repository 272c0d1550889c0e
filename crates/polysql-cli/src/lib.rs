mod cli;
mod compile;
mod config;
mod dialects;
mod document;
mod logging;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Compile(args) => {
            logging::setup_logging(&args.log)?;
            dotenvy::dotenv().ok();
            compile::run(args)
        }
        cli::Command::Dialects(log) => {
            logging::setup_logging(&log)?;
            dialects::run();
            Ok(())
        }
    }
}
