use anyhow::Context;
use clap::{Parser, Subcommand};
use pagehost::VirtualClock;
use std::path::{Path, PathBuf};
use vitrine::config;
use vitrine::driver::Driver;
use vitrine::fixture::PageFixture;
use vitrine::script;
use vitrine::sys::runtime;

#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the one in the platform config directory
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Replay a step script against an in-memory page on a virtual clock
    Replay {
        /// Page fixture (TOML); defaults to five skill slides
        #[arg(short = 'f', long)]
        fixture: Option<PathBuf>,

        script: PathBuf,
    },
    /// Read steps from stdin and run the page on real timers
    Live {
        #[arg(short = 'f', long)]
        fixture: Option<PathBuf>,
    },
    /// Write the default config file if none exists yet
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { fixture, script } => {
            replay(cli.config.as_deref(), fixture.as_deref(), &script)
        }
        Commands::Live { fixture } => {
            let config = config::load_or_default(cli.config.as_deref());
            let config_path = config::resolve_path(cli.config.as_deref())?;
            let fixture = load_fixture(fixture.as_deref())?;
            runtime::run_live(config, config_path, fixture)
        }
        Commands::InitConfig => {
            let path = config::write_default_config(cli.config.as_deref())?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn load_fixture(path: Option<&Path>) -> anyhow::Result<PageFixture> {
    match path {
        Some(p) => PageFixture::load(p)
            .with_context(|| format!("Failed to load fixture {}", p.display())),
        None => Ok(PageFixture::default()),
    }
}

fn replay(config_path: Option<&Path>, fixture: Option<&Path>, script: &Path) -> anyhow::Result<()> {
    let config = config::load_or_default(config_path);
    let fixture = load_fixture(fixture)?;
    let src = fs_err::read_to_string(script)?;
    let steps = script::parse_script(&src)
        .with_context(|| format!("Failed to parse {}", script.display()))?;

    let dom = fixture.build(&config, VirtualClock::new())?;
    let mut driver = Driver::new(dom, config);
    driver.run(&steps, |line, snapshot| println!("{line}: {snapshot}"))?;
    println!("end: {}", driver.snapshot());
    Ok(())
}
