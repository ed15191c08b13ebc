use std::io::{self, Write};
use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use reqx_core::{ExportError, ExportFormat, ExportOptions, ExportRequest, OutputSink};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = ReqxCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let code = match &cli.command {
        CommandCli::Export(args) => run_export(args)?,
    };
    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("reqx_core={level},reqx_domain={level},reqx={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_export(args: &ExportArgs) -> Result<i32> {
    let project_dir = match &args.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let request = ExportRequest {
        project_dir,
        format: args.format.clone(),
        options: ExportOptions {
            with_hashes: !args.without_hashes,
            dev: args.dev,
            extras: args.extras.clone(),
            with_credentials: args.with_credentials,
        },
    };

    let result = match &args.output {
        Some(path) => reqx_core::export_project(&request, &mut OutputSink::File(path.clone())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let result = reqx_core::export_project(&request, &mut OutputSink::Stream(&mut handle));
            handle.flush()?;
            result
        }
    };

    match result {
        Ok(()) => Ok(0),
        Err(err) => match err.downcast_ref::<ExportError>() {
            Some(export) => {
                eprintln!("{}: {export}", export.code());
                if export.is_user_error() {
                    eprintln!("hint: supported formats: {}", supported_formats());
                    Ok(1)
                } else {
                    Ok(2)
                }
            }
            None => Err(eyre!("{err:?}")),
        },
    }
}

fn supported_formats() -> String {
    ExportFormat::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Parser, Debug)]
#[command(
    name = "reqx",
    version,
    about = "Export a locked Python project as a pinned requirements file"
)]
struct ReqxCli {
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v")]
    trace: bool,
    #[command(subcommand)]
    command: CommandCli,
}

#[derive(Subcommand, Debug)]
enum CommandCli {
    #[command(
        about = "Export the lock file to another format.",
        override_usage = "reqx export [--format FORMAT] [--output PATH] [--dev] [-E EXTRA]...",
        after_help = "Examples:\n  reqx export -o requirements.txt\n  reqx export --without-hashes --dev -E postgres\n"
    )]
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(
        short,
        long,
        default_value = "requirements.txt",
        help = "Format to export to"
    )]
    format: String,
    #[arg(
        short,
        long,
        value_parser = value_parser!(PathBuf),
        help = "File to write to, relative to the project (defaults to stdout)"
    )]
    output: Option<PathBuf>,
    #[arg(long, help = "Exclude --hash entries from the output")]
    without_hashes: bool,
    #[arg(long, help = "Include development dependencies")]
    dev: bool,
    #[arg(
        short = 'E',
        long = "extras",
        value_name = "EXTRA",
        action = ArgAction::Append,
        help = "Extra sets of dependencies to include"
    )]
    extras: Vec<String>,
    #[arg(long, help = "Embed source credentials in index URLs")]
    with_credentials: bool,
    #[arg(long, value_parser = value_parser!(PathBuf), help = "Project directory (defaults to the current directory)")]
    project: Option<PathBuf>,
}
