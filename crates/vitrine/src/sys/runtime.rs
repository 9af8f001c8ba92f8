use crate::config;
use crate::config::Config;
use crate::driver::{Driver, Outcome};
use crate::events::AppEvent;
use crate::fixture::PageFixture;
use crate::sys::{input, timers::TokioTimers};
use async_channel::Receiver;
use pagehost::Scheduler;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tokio::runtime::Runtime;

/// Runs the page against wall-clock timers, reading steps from stdin and
/// reloading the config file when it changes. Prints a snapshot after every
/// event until input ends.
pub fn run_live(config: Config, config_path: PathBuf, fixture: PageFixture) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    rt.block_on(async move {
        let (tx, rx) = async_channel::bounded(32);

        let dom = fixture.build(&config, TokioTimers::new(tx.clone()))?;
        let mut driver = Driver::new(dom, config);

        {
            let tx = tx.clone();
            tokio::spawn(async move {
                input::read_steps(BufReader::new(tokio::io::stdin()), tx).await;
            });
        }

        {
            let tx = tx.clone();
            let path = config_path.clone();
            tokio::spawn(async move {
                config::run_async_watcher(path, tx).await;
            });
        }

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", driver.snapshot())?;
        event_loop(&mut driver, rx, &config_path, &mut stdout).await?;
        Ok::<_, anyhow::Error>(())
    })
}

/// Processes events one at a time until `Quit` or until every sender is
/// gone.
pub async fn event_loop<S, W>(
    driver: &mut Driver<S>,
    rx: Receiver<AppEvent>,
    config_path: &Path,
    out: &mut W,
) -> std::io::Result<()>
where
    S: Scheduler,
    W: Write,
{
    while let Ok(event) = rx.recv().await {
        match event {
            AppEvent::Ui(e) => driver.dispatch(e),
            AppEvent::Step(step) => match driver.apply(&step) {
                Ok(Outcome::Applied | Outcome::Snapshot(_)) => {}
                Ok(Outcome::Wait(d)) => log::debug!("ignoring wait of {:?} in live mode", d),
                Err(e) => {
                    log::error!("{}", e);
                    continue;
                }
            },
            AppEvent::ConfigReload => match config::load_config(config_path) {
                Ok(config) => driver.reconfigure(config),
                Err(e) => {
                    log::error!("Failed to reload config: {}", e);
                    continue;
                }
            },
            AppEvent::Quit => break,
        }
        writeln!(out, "{}", driver.snapshot())?;
    }
    Ok(())
}
