use std::fmt;
use std::fs::{create_dir_all, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Error;

fn create_parent<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            log::info!("auto create directory: {parent:?}");
            Ok(create_dir_all(parent)?)
        }
        _ => Ok(()),
    }
}

pub fn write_json<P, T>(path: P, rs: &T) -> Result<(), Error>
where
    P: AsRef<Path> + fmt::Debug,
    T: Serialize,
{
    log::debug!("write to file: {path:?}");
    create_parent(&path)?;
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rs)?;
    writer.flush()?;
    Ok(())
}

pub fn write_text<P>(path: P, text: &str) -> Result<(), Error>
where
    P: AsRef<Path> + fmt::Debug,
{
    log::debug!("write to file: {path:?}");
    create_parent(&path)?;
    Ok(std::fs::write(path, text)?)
}

pub fn print_json<T: Serialize>(rs: &T) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, rs)?;
    writeln!(lock)?;
    Ok(())
}
