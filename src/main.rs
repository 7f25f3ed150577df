use clap::{Parser, Subcommand};
use mimili::{amor, assets, config, export, output, routing};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mimili")]
#[command(about = "Static export for the amor site")]
#[command(long_about = "\
Static export for the amor site

Every route that can be rendered without arguments is rendered in-process
and written as <path>/index.html. Collected static files land in static/
and a catch-all _redirects rule serves the root page for every other path.

Output structure:

  dist/
  ├── index.html                   # /
  ├── playlists/index.html         # /playlists/
  ├── diary/index.html             # /diary/
  ├── proposal/index.html          # /proposal/
  ├── static/                      # copy of the static root
  └── _redirects                   # /*    /index.html   200

Routes with parameters (<slug>) or regex groups are skipped, and paths
under /admin and /static are never exported. If the route table cannot be
used, the fixed list /, /playlists/, /diary/, /proposal/ is exported instead.

Run 'mimili gen-config' to generate a documented mimili.toml.")]
#[command(version)]
struct Cli {
    /// Project directory holding mimili.toml and the static sources
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Log filter (e.g. "info", "mimili=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every static route into a deployable directory
    ExportStatic {
        /// Output directory, relative to the current directory
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,
    },
    /// List the routes an export would render
    Routes,
    /// Aggregate static source directories into the static root
    CollectStatic,
    /// Print a stock mimili.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::ExportStatic { output: out } => {
            let config = config::load_config(&cli.project)?;
            let site = amor::Site::new(&config, &cli.project);
            let dir = resolve_output(&out)?;

            let report = export::export(&site, &config, &cli.project, &dir)?;
            output::print_export_report(&report);

            println!("==> Static export finished in {}", dir.display());
        }
        Command::Routes => {
            let config = config::load_config(&cli.project)?;
            let site = amor::Site::new(&config, &cli.project);
            let discovery =
                routing::discover_or_fallback(&site, &config.routes.exclude_prefixes)?;
            output::print_routes(&discovery);
        }
        Command::CollectStatic => {
            let config = config::load_config(&cli.project)?;
            let summary = assets::collect_static(&config.static_files, &cli.project)?;
            output::print_collect_summary(&summary);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve the output directory against the current working directory.
fn resolve_output(out: &Path) -> std::io::Result<PathBuf> {
    if out.is_absolute() {
        Ok(out.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(out))
    }
}
