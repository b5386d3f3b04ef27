use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AggregatorError, Result};
use crate::types::{OutputFormat, User};

/// Path of the output file for a directory and format: `<dir>/users.<ext>`.
pub fn output_path(dir: &Path, format: OutputFormat) -> PathBuf {
    dir.join(format!("users.{}", format.extension()))
}

/// Write all users to `<dir>/users.<ext>`, creating the directory if needed.
///
/// Returns the written path and the number of records.
pub fn write_users(dir: &Path, format: OutputFormat, users: &[User]) -> Result<(PathBuf, usize)> {
    let path = output_path(dir, format);
    let io_err = |source| AggregatorError::OutputWrite {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    match format {
        OutputFormat::Json => write_json(&mut out, users, &path)?,
        OutputFormat::Csv => write_csv(&mut out, users, &path)?,
    }

    out.flush().map_err(io_err)?;
    Ok((path, users.len()))
}

fn write_json<W: Write>(out: &mut W, users: &[User], path: &Path) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, users).map_err(|e| AggregatorError::OutputEncode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writeln!(out).map_err(|source| AggregatorError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv<W: Write>(out: &mut W, users: &[User], path: &Path) -> Result<()> {
    let encode_err = |e: csv::Error| AggregatorError::OutputEncode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_writer(out);
    // Serializing an empty list would skip the header, so write it explicitly.
    writer
        .write_record(["first_name", "last_name", "email", "source_id"])
        .map_err(encode_err)?;
    for user in users {
        writer
            .write_record([&user.first_name, &user.last_name, &user.email, &user.source_id])
            .map_err(encode_err)?;
    }
    writer.flush().map_err(|source| AggregatorError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
