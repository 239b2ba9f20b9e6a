use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vplan::debug::format_model;
use vplan::{compile, load_network, CompileOpt};

/// Initial voltage plan formulation for AC power flow.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a network snapshot into the nonlinear program and print
    /// it.
    Compile(CompileArgs),
}

#[derive(Args)]
struct CompileArgs {
    /// Network snapshot (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Power base (MW).
    #[arg(long, default_value_t = 100.0)]
    s_base: f64,
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let Commands::Compile(args) = &cli.command;

    let net = load_network(&args.input)?;
    let opt = CompileOpt {
        s_base: args.s_base,
    };
    let model = compile(&net, &opt)?;

    print!("{}", format_model(&model));

    Ok(())
}
