use anyhow::{Context, Result};
use argh::FromArgs;
use command_template::config::Config;
use command_template::env::Environment;
use command_template::repl::{Repl, ReplMode, write_command_line};
use command_template::{Launcher, Template, parse};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Parse and run shell-like command templates without a shell.
struct Cli {
    /// encoding of captured output (utf-8, cp850, windows-1252, ...).
    /// Overrides COMMAND_TEMPLATE_ENCODING.
    #[argh(option)]
    encoding: Option<String>,

    #[argh(subcommand)]
    command: Subcommand,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    Parse(ParseCmd),
    Run(RunCmd),
    Repl(ReplCmd),
}

#[derive(FromArgs)]
/// Print the executable and arguments a template parses to.
#[argh(subcommand, name = "parse")]
struct ParseCmd {
    /// the template; every `{}` is replaced by the next --value,
    /// `{{}}` is a literal `{}`.
    #[argh(positional)]
    template: String,

    /// scalar substitution for the next `{}` placeholder.
    #[argh(option, short = 'v')]
    value: Vec<String>,
}

#[derive(FromArgs)]
/// Run a template as a command and exit with its exit code.
#[argh(subcommand, name = "run")]
struct RunCmd {
    /// the template; every `{}` is replaced by the next --value,
    /// `{{}}` is a literal `{}`.
    #[argh(positional)]
    template: String,

    /// scalar substitution for the next `{}` placeholder.
    #[argh(option, short = 'v')]
    value: Vec<String>,

    /// capture stdout and stderr and print them decoded instead of
    /// inheriting the terminal.
    #[argh(switch, short = 'c')]
    capture: bool,
}

#[derive(FromArgs)]
/// Read templates interactively, one per line.
#[argh(subcommand, name = "repl")]
struct ReplCmd {
    /// only print how each line parses.
    #[argh(switch, short = 'n')]
    dry_run: bool,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    let mut config = Config::from_env()?;
    if let Some(label) = &cli.encoding {
        config.set_encoding(label)?;
    }
    init_logging(&config);

    let launcher = Launcher::new(Environment::capture(), config.encoding);

    match cli.command {
        Subcommand::Parse(cmd) => {
            let template = Template::with_placeholders(&cmd.template, cmd.value);
            let line = parse(&template).context("invalid command template")?;
            write_command_line(&mut std::io::stdout(), &line)?;
        }
        Subcommand::Run(cmd) => {
            let template = Template::with_placeholders(&cmd.template, cmd.value);
            let code = if cmd.capture {
                let output = launcher.exec(&template).context("failed to run command")?;
                print!("{}", output.decoded.stdout);
                eprint!("{}", output.decoded.stderr);
                output.exit_code()
            } else {
                launcher
                    .exec_inherit(&template)
                    .context("failed to run command")?
                    .exit_code()
            };
            std::process::exit(code);
        }
        Subcommand::Repl(cmd) => {
            let mode = if cmd.dry_run {
                ReplMode::DryRun
            } else {
                ReplMode::Execute
            };
            Repl::new(launcher, mode).run()?;
        }
    }

    Ok(())
}
