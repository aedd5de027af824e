use anyhow::Result;
use clap::{Parser, Subcommand};
use quasi_cli::{Overrides, WhitespaceArg};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quasi", version, about = "Compile markup literals into template strings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile .tsx/.jsx files.
    Build {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory (default: target/quasi-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print the output instead of writing files
        #[arg(long)]
        stdout: bool,
        /// Config file (default: quasi.toml next to each input)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Strip leading/trailing whitespace of text runs
        #[arg(long)]
        trim: bool,
        #[arg(long, value_enum)]
        whitespace: Option<WhitespaceArg>,
        /// Callee used for object merges
        #[arg(long)]
        merge_helper: Option<String>,
        /// Extra names compiled as component calls
        #[arg(long = "component")]
        components: Vec<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            inputs,
            out_dir,
            stdout,
            config,
            trim,
            whitespace,
            merge_helper,
            components,
        } => {
            let overrides = Overrides {
                trim,
                whitespace,
                merge_helper,
                components,
            };
            for input in &inputs {
                let mut options = quasi_cli::load_options(input, config.as_deref())?;
                overrides.apply(&mut options);
                if stdout {
                    print!("{}", quasi_cli::compile_file(input, &options)?);
                } else {
                    let out_path = quasi_cli::build_cmd(input, out_dir.as_deref(), &options)?;
                    println!("Generated: {}", out_path.display());
                }
            }
        }
    }
    Ok(())
}
