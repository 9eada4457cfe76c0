use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;

use repfind_rust::esa::{self, MaxPairsOpt};
use repfind_rust::index::encseq::EncodedSeq;
use repfind_rust::index::esa::{EnhancedSuffixArray, IndexMeta};
use repfind_rust::io::fasta::FastaReader;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "repfind-rust", author, version, about = "Maximal repeat pairs on an enhanced suffix array", arg_required_else_help = true)]
struct Cli {
    /// Log traversal statistics (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an enhanced suffix array from a FASTA reference
    Index {
        /// Reference FASTA file
        reference: String,
        /// Output prefix for the index file (<prefix>.esa)
        #[arg(short, long, default_value = "ref")]
        output: String,
    },
    /// Enumerate left-maximal repeat pairs
    Maxpairs {
        /// Path to the index (.esa)
        #[arg(short = 'i', long = "index")]
        index: String,
        /// Minimum match length
        #[arg(short = 'l', long = "min-len", default_value_t = 20)]
        min_len: u32,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        /// Report contig names and 1-based offsets instead of text positions
        #[arg(long = "contig-coords")]
        contig_coords: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Index { reference, output } => run_index(&reference, &output),
        Commands::Maxpairs { index, min_len, out, contig_coords } => {
            let opt = MaxPairsOpt { min_len, contig_coords };
            run_maxpairs(&index, out.as_deref(), opt)
        }
    }
}

fn run_index(reference: &str, output: &str) -> Result<()> {
    let fh = std::fs::File::open(reference)
        .with_context(|| format!("cannot open reference FASTA '{}'", reference))?;
    let reader = FastaReader::new(std::io::BufReader::new(fh));

    let mut seq = EncodedSeq::new();
    let mut total_len = 0usize;
    for rec in reader {
        let rec = rec.with_context(|| format!("malformed FASTA '{}'", reference))?;
        total_len += rec.seq.len();
        seq.push_record(&rec.id, &rec.seq);
    }

    let n_seqs = seq.contigs().len();
    if n_seqs == 0 {
        anyhow::bail!("FASTA file '{}' contains no sequences", reference);
    }
    if total_len == 0 {
        anyhow::bail!("FASTA file '{}' contains only empty sequences", reference);
    }
    if seq.len() > u32::MAX as usize {
        anyhow::bail!("reference '{}' is too long for 32-bit positions ({} symbols)", reference, seq.len());
    }
    info!("reference: {}", reference);
    info!("sequences: {}", n_seqs);
    info!("total_len: {}", total_len);

    let mut idx = EnhancedSuffixArray::build(seq);
    idx.set_meta(IndexMeta {
        reference_file: Some(reference.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });
    info!("longest repeated prefix: {}", idx.max_lcp());

    let out_path = format!("{}.esa", output);
    idx.save_to_file(&out_path)
        .with_context(|| format!("cannot write index to '{}'", out_path))?;
    info!("ESA index saved: {}", out_path);
    Ok(())
}

fn run_maxpairs(index_path: &str, out_path: Option<&str>, opt: MaxPairsOpt) -> Result<()> {
    let idx = EnhancedSuffixArray::load_from_file(index_path)
        .with_context(|| format!("cannot load index '{}'", index_path))?;
    if let Some(ts) = &idx.meta.build_timestamp {
        info!("index built {}", ts);
    }

    let out: Box<dyn Write> = match out_path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout().lock())),
    };

    let stats = esa::write_maxpairs(&idx, out, opt)?;
    info!(
        "min_len={}: {} maximal pairs ({} suffixes, {} lcp intervals)",
        opt.min_len, stats.pairs, stats.leaves, stats.internal_nodes
    );
    Ok(())
}
