mod classify;
mod collect;
mod dashboard;
mod document;
mod error;
mod filter;
#[cfg(test)]
mod fixtures;
mod format;
mod html;
mod loader;
mod options;
mod shell;
mod stats;
mod tab;
mod table;
mod url_sync;
mod utils;

use std::path::PathBuf;

use dashboard::Dashboard;
use error::Error;
use loader::{DataSource, Loader};
use options::{Command, ViewOptions};
use shell::Shell;

#[tokio::main]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let options = options::initialize();
    log::info!("config = {:?}", options::get());

    match options.command.clone() {
        Command::Collect(collect_options) => {
            let output_file = collect_options.output_file.clone();
            let document = collect::collect(collect_options).await?;
            match output_file {
                Some(path) => utils::write_json(path, &document)?,
                None => utils::print_json(&document)?,
            }
        }
        Command::Render { view, output } => {
            let source = data_source(view.file.clone());
            let mut dashboard = new_dashboard(&view)?;
            let document = Loader::new(&options.cache_path).load(&source).await?;
            dashboard.display(document)?;
            dashboard.restore(&view.query);
            let page = html::render_page(&dashboard, &source);
            utils::write_text(&output, &page)?;
            log::info!("rendered {source} to {output:?}");
        }
        Command::Stats { file } => {
            let loader = Loader::new(&options.cache_path);
            let document = loader.load(&data_source(file)).await?;
            utils::print_json(&stats::collect(&document))?;
        }
        Command::Shell { view } => {
            let source = data_source(view.file.clone());
            let mut shell = Shell::new(new_dashboard(&view)?, Loader::new(&options.cache_path));
            if let Err(e) = shell.load(source).await {
                log::warn!("start without data: {e}");
            } else {
                shell.dashboard.restore(&view.query);
            }
            shell.run().await?;
        }
    }
    Ok(())
}

fn data_source(file: Option<PathBuf>) -> DataSource {
    match file {
        Some(path) => DataSource::Upload(path),
        None => DataSource::Cache,
    }
}

fn new_dashboard(view: &ViewOptions) -> Result<Dashboard, Error> {
    let mut dashboard = Dashboard::new(options::get().default_tab);
    dashboard.set_show_reverted(view.show_reverted)?;
    Ok(dashboard)
}
