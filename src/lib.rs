use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::time::Duration;

use glimpse_infra::logging;
use glimpse_protocol::models::QueryView;
use glimpse_protocol::{AppError, AppResult};
use glimpse_search::SearchService;

const DATA_DIR_NAME: &str = "glimpse";

/// Settle time for the interactive loop: debounce plus headroom for the
/// ranking pass.
const LOOP_SETTLE_MS: u64 = 400;

pub fn data_dir() -> AppResult<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| AppError::new("data_dir_unresolved", "no data directory for this user"))?;
    Ok(base.join(DATA_DIR_NAME))
}

/// Host wiring: resolve the data directory, initialize logging, bring the
/// index up per its schedule and serve queries typed on stdin. All domain
/// behavior lives in the member crates.
pub async fn run() -> AppResult<()> {
    let data_dir = data_dir()?;
    let logging_guard = logging::init_logging(&data_dir)?;
    tracing::info!(
        event = "glimpse_started",
        data_dir = %data_dir.display(),
        log_level = logging_guard.level()
    );

    let service = SearchService::new(&data_dir);
    service.startup().await;

    let views = service.views();
    print_view(&views.borrow());
    println!("type to search, :rebuild to reindex, :quit to exit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        match line.trim_end() {
            ":quit" => break,
            ":rebuild" => {
                service.rebuild().await;
                println!("indexed {} entries", service.index().catalog().len());
            }
            query => {
                service.query(query);
                tokio::time::sleep(Duration::from_millis(LOOP_SETTLE_MS)).await;
                print_view(&views.borrow());
            }
        }
    }

    tracing::info!(event = "glimpse_stopped");
    Ok(())
}

fn print_view(view: &QueryView) {
    for hit in &view.hits {
        println!("[{}] {}  ({})", hit.group, hit.name, hit.path);
    }
}
