use std::fmt::Write;
use std::path::PathBuf;
use std::{ffi::OsString, iter};

use clap::{ColorChoice, Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::dashboard::Dashboard;
use crate::error::Error;
use crate::filter::FilterOutcome;
use crate::loader::{DataSource, Loader};
use crate::tab::TabId;
use crate::table::{self, Table};

#[derive(Debug, Parser)]
#[command(name = "shell",
            color = ColorChoice::Never,
            no_binary_name = true,
)]
pub enum ShellCommand {
    #[command(about = "load the cached data or a local file")]
    Load {
        #[arg(long, short)]
        upload: Option<PathBuf>,
    },
    #[command(about = "open a tab")]
    Tab {
        #[arg(value_enum)]
        tab: TabId,
    },
    #[command(about = "type a pattern into a filter input of the active tab")]
    Filter {
        column: usize,
        #[arg(allow_hyphen_values = true)]
        pattern: String,
        /// Selection inside the input after typing, as 'start:end'
        #[arg(long, short, value_parser = parse_selection)]
        selection: Option<(usize, usize)>,
    },
    #[command(about = "show or hide reverted commits")]
    Reverted {
        #[arg(value_enum)]
        switch: Switch,
    },
    #[command(about = "restore tab and filters from a query string")]
    Restore { query: String },
    #[command(about = "print the active table")]
    Show,
    #[command(about = "print the current location")]
    Url,
    #[command(about = "print the data source overview")]
    Overview,
    #[command(about = "leave the shell")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub fn parse(raw_input: String) -> Result<ShellCommand, Error> {
    let input = parse_raw(raw_input)?.into_iter().map(OsString::from);
    Ok(ShellCommand::try_parse_from(input)?)
}

pub fn parse_selection(s: &str) -> Result<(usize, usize), Error> {
    let invalid = || Error::InvalidSelection(s.to_owned());
    let (start, end) = s.split_once(':').ok_or_else(invalid)?;
    let start: usize = start.trim().parse().map_err(|_| invalid())?;
    let end: usize = end.trim().parse().map_err(|_| invalid())?;
    if start > end {
        return Err(invalid());
    }
    Ok((start, end))
}

#[derive(Debug)]
enum PRState {
    Out,
    InWord,
    InQuote { end_mark: char },
    Escape,
}

pub fn parse_raw(raw_input: String) -> Result<Vec<String>, Error> {
    let mut state = PRState::Out;
    let mut chars = raw_input.chars().chain(iter::once('\0')).peekable();
    let mut current = String::new();
    let mut result = Vec::new();

    while let Some(c) = chars.peek().cloned() {
        let mut next = true;
        state = match state {
            PRState::Out => {
                if c == '\0' || c.is_whitespace() {
                    PRState::Out
                } else {
                    next = false;
                    PRState::InWord
                }
            }
            PRState::InWord => match c {
                _ if c == '\0' || c.is_whitespace() => {
                    result.push(std::mem::take(&mut current));
                    PRState::Out
                }
                '\'' | '"' => PRState::InQuote { end_mark: c },
                '\\' => PRState::Escape,
                _ => {
                    current.push(c);
                    PRState::InWord
                }
            },
            PRState::InQuote { end_mark } => match c {
                _ if c == end_mark => PRState::InWord,
                '\0' => return Err(Error::UnclosedQuote),
                _ => {
                    current.push(c);
                    PRState::InQuote { end_mark }
                }
            },
            PRState::Escape => match c {
                '\0' => return Err(Error::BadEscape),
                _ => {
                    current.push(c);
                    PRState::InWord
                }
            },
        };
        if next {
            chars.next();
        }
    }
    Ok(result)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct Shell {
    pub dashboard: Dashboard,
    loader: Loader,
    source: DataSource,
}

impl Shell {
    pub fn new(dashboard: Dashboard, loader: Loader) -> Self {
        Self {
            dashboard,
            loader,
            source: DataSource::Cache,
        }
    }

    pub async fn load(&mut self, source: DataSource) -> Result<(), Error> {
        let document = self.loader.load(&source).await?;
        self.dashboard.display(document)?;
        self.source = source;
        Ok(())
    }

    pub async fn execute(&mut self, command: ShellCommand, out: &mut String) -> Result<Control, Error> {
        match command {
            ShellCommand::Load { upload } => {
                let source = match upload {
                    Some(path) => DataSource::Upload(path),
                    None => DataSource::Cache,
                };
                self.load(source).await?;
                let _ = writeln!(out, "loaded {}", self.source);
                self.print_summary(out);
            }
            ShellCommand::Tab { tab } => {
                self.dashboard.open_tab(tab);
                self.print_summary(out);
            }
            ShellCommand::Filter {
                column,
                pattern,
                selection,
            } => {
                let tab = self.dashboard.active_tab();
                match self.dashboard.type_filter(tab, column, &pattern, selection)? {
                    FilterOutcome::Applied { visible, total } => {
                        let _ = writeln!(
                            out,
                            "[{}] f{column} = {pattern:?}, {visible} of {total} rows",
                            tab.label()
                        );
                    }
                    FilterOutcome::Rejected(e) => {
                        let _ = writeln!(out, "invalid pattern, filter f{column} unchanged: {e}");
                    }
                }
            }
            ShellCommand::Reverted { switch } => {
                self.dashboard.set_show_reverted(switch == Switch::On)?;
                self.print_summary(out);
            }
            ShellCommand::Restore { query } => {
                self.dashboard.restore(&query);
                self.print_summary(out);
            }
            ShellCommand::Show => {
                let table = self.dashboard.active_table().ok_or(Error::NoDocument)?;
                out.push_str(&format_table(table));
            }
            ShellCommand::Url => {
                let _ = writeln!(out, "{}", self.dashboard.location.href());
            }
            ShellCommand::Overview => {
                let document = self.dashboard.document().ok_or(Error::NoDocument)?;
                for entry in table::overview(document) {
                    let _ = writeln!(out, "{}: {}", entry.name, entry.value.text);
                }
            }
            ShellCommand::Quit => return Ok(Control::Quit),
        }
        Ok(Control::Continue)
    }

    fn print_summary(&self, out: &mut String) {
        let tab = self.dashboard.active_tab();
        log::debug!("view state: {:?}", self.dashboard.state());
        match self.dashboard.active_table() {
            Some(table) => {
                let _ = writeln!(out, "[{}] {}", tab.label(), table.summary);
            }
            None => {
                let _ = writeln!(out, "[{}] nothing loaded", tab.label());
            }
        }
    }

    pub async fn run(&mut self) -> Result<(), Error> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let mut out = String::new();
            let result = match parse(line) {
                Ok(command) => self.execute(command, &mut out).await,
                Err(e) => Err(e),
            };
            print!("{out}");
            match result {
                Ok(Control::Continue) => {}
                Ok(Control::Quit) => break,
                Err(Error::Clap(e)) => {
                    // help and usage errors are meant for the user as they are
                    print!("{e}");
                }
                Err(e) => {
                    log::warn!("command failed: {e}");
                    println!("error: {e}");
                }
            }
        }
        Ok(())
    }
}

pub fn format_table(table: &Table) -> String {
    let mut result = String::new();
    let _ = writeln!(result, "{}", table.headers.join(" | "));
    let inputs: Vec<String> = table
        .inputs
        .iter()
        .enumerate()
        .map(|(i, input)| format!("f{i}={} ({})", input.value, input.validity.color()))
        .collect();
    let _ = writeln!(result, "{}", inputs.join(" | "));
    for row in table.visible_texts() {
        let _ = writeln!(result, "{}", row.join(" | "));
    }
    let _ = writeln!(result, "{}", table.summary);
    result
}
