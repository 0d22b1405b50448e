use crate::demo::{run_demo, DemoArgs};
use crate::responses::{hash_admin_password, run_export, run_summary, ExportArgs};
use crate::server;
use crate::terminal::run_terminal_assessment;
use clap::{Args, Parser, Subcommand};
use stress_check::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "BRAC IED Stress Assessment",
    about = "Run the Bengali stress self-assessment service and inspect its responses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Take the assessment in this terminal and store the result
    Take,
    /// Inspect the persisted responses table
    Responses {
        #[command(subcommand)]
        command: ResponsesCommand,
    },
    /// Admin dashboard utilities
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Replay the reference answer scenarios against an in-memory table
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ResponsesCommand {
    /// Write every response as CSV
    Export(ExportArgs),
    /// Print participant count, average, maximum and level distribution
    Summary,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Print an argon2 hash to use as APP_ADMIN_PASSWORD_HASH
    HashPassword {
        /// Plaintext password to hash
        password: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Take => run_terminal_assessment(),
        Command::Responses {
            command: ResponsesCommand::Export(args),
        } => run_export(args),
        Command::Responses {
            command: ResponsesCommand::Summary,
        } => run_summary(),
        Command::Admin {
            command: AdminCommand::HashPassword { password },
        } => hash_admin_password(&password),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["stress-check-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["stress-check-api", "responses", "export", "--output", "out.csv"])
            .expect("parses");
        match cli.command {
            Some(Command::Responses {
                command: ResponsesCommand::Export(args),
            }) => assert_eq!(args.output.as_deref(), Some(std::path::Path::new("out.csv"))),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["stress-check-api", "serve", "--port", "8080"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Serve(ServeArgs { port: Some(8080), .. }))
        ));
    }
}
