use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Compile,
    Dialects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(HelpTopic),
    Compile(CompileArgs),
    Dialects(LogArgs),
}

/// Logging flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    pub verbose: u8,
    pub quiet: bool,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileArgs {
    /// Explicit `--config`; `None` means the optional default file.
    pub config: Option<PathBuf>,
    pub driver: Option<String>,
    pub format: Option<String>,
    /// Query document path; `None` reads stdin.
    pub input: Option<PathBuf>,
    pub log: LogArgs,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "compile" => parse_compile(it.map(|s| s.as_str())),
        "dialects" => parse_dialects(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume a logging flag. Returns false if `token` is not one.
fn parse_log_flag(token: &str, log: &mut LogArgs) -> bool {
    match token {
        "-v" | "--verbose" => log.verbose = log.verbose.saturating_add(1),
        "-vv" => log.verbose = log.verbose.saturating_add(2),
        "-q" | "--quiet" => log.quiet = true,
        "--log-json" => log.json = true,
        _ => return false,
    }
    true
}

fn parse_compile<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut driver: Option<String> = None;
    let mut format: Option<String> = None;
    let mut input: Option<PathBuf> = None;
    let mut log = LogArgs::default();

    while let Some(token) = it.next() {
        if parse_log_flag(token, &mut log) {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Compile)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--driver" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--driver requires a value");
                };
                driver = Some(v.to_string());
            }
            _ if token.starts_with("--driver=") => {
                driver = Some(token.trim_start_matches("--driver=").to_string());
            }
            "--format" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--format requires a value");
                };
                format = Some(v.to_string());
            }
            _ if token.starts_with("--format=") => {
                format = Some(token.trim_start_matches("--format=").to_string());
            }
            "-" => {
                input = None;
            }
            _ if token.starts_with('-') => anyhow::bail!("unknown argument: {token}"),
            _ => {
                if input.is_some() {
                    anyhow::bail!("only one query document may be given");
                }
                input = Some(PathBuf::from(token));
            }
        }
    }

    Ok(Command::Compile(CompileArgs {
        config,
        driver,
        format,
        input,
        log,
    }))
}

fn parse_dialects<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut log = LogArgs::default();
    for token in it {
        if parse_log_flag(token, &mut log) {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Dialects)),
            _ => anyhow::bail!("unknown argument: {token}"),
        }
    }
    Ok(Command::Dialects(log))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
polysql - compile query documents into dialect SQL

USAGE:
  polysql <COMMAND> [OPTIONS]

COMMANDS:
  compile       Compile a JSON query document
  dialects      List driver identifiers and their dialects

Run `polysql <command> --help` for more."
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  polysql compile [OPTIONS] [FILE]

Reads the query document from FILE, or stdin if omitted or `-`.

OPTIONS:
  --config <FILE>       Config file path (default: polysql.toml, optional)
  --driver <NAME>       Driver identifier (mysql, sqlsrv, oci, ibm, firebird, nuodb, ...)
  --format <FMT>        Output format: text | json (default: text)
  -v, -vv               Log compiled statements (debug / trace)
  -q, --quiet           Only log errors
  --log-json            Emit logs as JSON lines
  -h, --help            Print help"
            );
        }
        HelpTopic::Dialects => {
            println!(
                "\
USAGE:
  polysql dialects [OPTIONS]

OPTIONS:
  -h, --help            Print help"
            );
        }
    }
}
