use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use static_search::core::config::Config;
use static_search::doc::loader::FsDocumentSource;
use static_search::{IndexBuilder, Searcher};

#[derive(Parser)]
#[command(name = "search-cli", about = "Build and query a static-corpus search index")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full index-build pipeline over a document corpus.
    Build {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        chunk_size: usize,
    },
    /// Query an already-built index.
    Query {
        #[arg(long)]
        index: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Ranked)]
        mode: Mode,
        query: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Ranked,
    Bool,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "search-cli failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> static_search::Result<()> {
    match cli.command {
        Command::Build { corpus, out, chunk_size } => {
            let config = Config { corpus_dir: corpus.clone(), index_dir: out, chunk_size, top_k: 10 };
            let source = FsDocumentSource::new(&corpus);
            let report = IndexBuilder::new().build(&source, &config)?;
            println!(
                "indexed {} documents across {} partial files",
                report.doc_count, report.partial_file_count
            );
            Ok(())
        }
        Command::Query { index, mode, query } => {
            let searcher = Searcher::open(index)?;
            let query = query.join(" ");
            let urls = match mode {
                Mode::Ranked => searcher.search(&query)?,
                Mode::Bool => searcher.bool_search(&query)?,
            };
            for url in urls {
                println!("{url}");
            }
            Ok(())
        }
    }
}
