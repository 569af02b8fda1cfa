use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use eduhistory::{
    classify,
    cli::{self, Command},
    config,
    history::locator::HomeLocator,
    logging,
    normalize::UrlRecord,
    output::{self, json},
    pipeline::{self, CollectOptions},
    similarity,
    title::NoTitleFetcher,
};

fn main() -> Result<()> {
    let cli_opts = cli::parse();
    logging::init_logging(cli_opts.log_json);

    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let cfg = loaded.config;
    info!(
        "eduhistory {} config_hash={} api={} aggregator={}",
        env!("CARGO_PKG_VERSION"),
        loaded.config_hash,
        cfg.api_name,
        cfg.aggregator_datasite
    );

    match cli_opts.command {
        Command::Collect {
            output,
            private,
            force,
        } => {
            let locator =
                HomeLocator::system().ok_or_else(|| anyhow!("cannot determine home directory"))?;
            let opts = CollectOptions {
                output_dir: output,
                private: private || cfg.private_mode,
                force,
            };
            match pipeline::run_collect(&cfg, locator, &NoTitleFetcher, &opts, chrono::Utc::now())? {
                Some(summary) => {
                    for file in &summary.files {
                        info!("wrote {}", file.display());
                    }
                }
                None => info!("nothing to do"),
            }
        }
        Command::Compare {
            first,
            second,
            format,
            out,
            workers,
        } => {
            info!("opening browser history files");
            let a: Vec<UrlRecord> = json::read_envelope(&first, output::HISTORY_LABEL)
                .with_context(|| format!("reading {}", first.display()))?;
            let b: Vec<UrlRecord> = json::read_envelope(&second, output::HISTORY_LABEL)
                .with_context(|| format!("reading {}", second.display()))?;

            info!("comparing browser histories ({} x {})", a.len(), b.len());
            let matrix = similarity::compare_histories_parallel(&a, &b, workers.max(1))?;

            let writer = output::build_matrix_writer(format);
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut buf = BufWriter::new(file);
                    writer.write_matrix(&matrix, &mut buf)?;
                    buf.flush()?;
                    info!("wrote {}", path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    writer.write_matrix(&matrix, &mut lock)?;
                }
            }
        }
        Command::Classify { urls } => {
            for url in urls {
                println!("{}\t{}", classify::classify_url(&url), url);
            }
        }
    }

    Ok(())
}
