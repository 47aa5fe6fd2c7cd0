use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use termdispatch_lib::terminal::{LaunchRequest, QuotingMode, DEFAULT_THEME};
use termdispatch_lib::{logging, DispatcherConfig, TerminalDispatcher};

/// Exit status when no supported terminal is installed
const EXIT_NO_TERMINAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "termdispatch")]
#[command(about = "Run a command in the first terminal emulator found on this system")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log probing and launching in detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch a command in a terminal
    Run(LaunchArgs),
    /// Print the command line that `run` would launch
    Render(LaunchArgs),
    /// Show which terminal would be used
    Detect {
        /// List every installed candidate instead of the first
        #[arg(long)]
        all: bool,
    },
}

#[derive(Args, Debug)]
struct LaunchArgs {
    /// Color theme for terminals that support one
    #[arg(long, default_value = DEFAULT_THEME)]
    theme: String,

    /// Extra environment variable for the terminal, may be repeated
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Use only the --env variables instead of inheriting the environment
    #[arg(long)]
    replace_env: bool,

    /// Quote every nesting level instead of the compatible quoting
    #[arg(long)]
    escaped: bool,

    /// Command to run: one argument is taken as a shell line, several are quoted as words
    #[arg(trailing_var_arg = true, required = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl LaunchArgs {
    fn command_line(&self) -> String {
        match self.command.as_slice() {
            [line] => line.clone(),
            words => shell_words::join(words),
        }
    }

    fn request(&self) -> LaunchRequest {
        let request = LaunchRequest::new(self.command_line())
            .with_theme(&self.theme)
            .with_envs(self.env.iter().cloned());
        if self.replace_env {
            request.replacing_env()
        } else {
            request
        }
    }
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn load_dispatcher(cli: &Cli, escaped: bool) -> anyhow::Result<TerminalDispatcher> {
    let config = match &cli.config {
        Some(path) => DispatcherConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DispatcherConfig::load().context("Failed to load config")?,
    };

    let dispatcher = TerminalDispatcher::from_config(&config)?;
    Ok(if escaped {
        dispatcher.with_quoting(QuotingMode::Escaped)
    } else {
        dispatcher
    })
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Run(args) => {
            let dispatcher = load_dispatcher(&cli, args.escaped)?;
            if dispatcher.execute(&args.request())? {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("No supported terminal emulator found");
                Ok(ExitCode::from(EXIT_NO_TERMINAL))
            }
        }
        Commands::Render(args) => {
            let dispatcher = load_dispatcher(&cli, args.escaped)?;
            match dispatcher.detect() {
                Some(terminal) => {
                    println!("{}", dispatcher.render_for(terminal, &args.request()));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No supported terminal emulator found");
                    Ok(ExitCode::from(EXIT_NO_TERMINAL))
                }
            }
        }
        Commands::Detect { all } => {
            let dispatcher = load_dispatcher(&cli, false)?;
            let found = if *all {
                dispatcher.detect_all()
            } else {
                dispatcher.detect().into_iter().collect()
            };
            if found.is_empty() {
                eprintln!("No supported terminal emulator found");
                return Ok(ExitCode::from(EXIT_NO_TERMINAL));
            }
            for terminal in found {
                println!("{}", terminal.executable_name);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
