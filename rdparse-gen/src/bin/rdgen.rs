//! Command-line interface for the `rdparse-gen` generator.
//!
//! Reads a grammar description and writes `<name>_tokens.rs`,
//! `<name>_lexer.rs` and `<name>_parser.rs` into the output directory.

#[cfg(feature = "cli")]
mod real {
    use anyhow::Context;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(version, about = "Generate an LL(1) recursive-descent lexer and parser from a grammar")]
    struct Args {
        /// Path to the input grammar description.
        #[arg(short = 'g', long)]
        grammar: PathBuf,

        /// Path to the output directory.
        #[arg(short = 'o', long)]
        output_dir: PathBuf,

        /// Prefix used to construct output file and type names (default: grammar file stem).
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Write FIRST/FOLLOW tables into the parser and log at debug level.
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        let args = Args::parse();
        let level = if args.debug { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

        let name = match args.name {
            Some(name) => name,
            None => args
                .grammar
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_owned)
                .context("cannot derive a name from the grammar path; pass --name")?,
        };
        rdparse_gen::generate(&args.grammar, &args.output_dir, &name, args.debug)?;
        log::info!("generated {} into {}", name, args.output_dir.display());
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("rdgen disabled (compiled without `cli` feature)");
}
