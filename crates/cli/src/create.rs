// litho create - build one composition table from mixed inputs

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lithoframe_config::Config;
use lithoframe_core::{Frame, Table};
use lithoframe_io::{csv, image, las};

use crate::percent;
use crate::CliError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "bmp", "jpg", "jpeg"];

pub fn cmd_create(
    config: Option<&Path>,
    output: Option<PathBuf>,
    translate: bool,
    percent: bool,
    files: &[PathBuf],
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mut frame = process_files(&config, files)?;

    if translate || frame.requires_translation() {
        frame
            .apply_translation(&config.translation)
            .map_err(CliError::data)?;
    }

    let minerals = frame.minerals().map_err(CliError::data)?.to_vec();
    let mut result = frame.result().map_err(CliError::data)?.clone();
    if percent {
        result = percent::percentages(&result, &percent::mineral_union(&config));
    }

    match output {
        Some(path) => match extension(&path).as_deref() {
            Some("las") => las::write_las(&result, &minerals, &path).map_err(CliError::io),
            _ => csv::write_table(&result, &path).map_err(CliError::io),
        },
        None => print_table(&result).map_err(|e| CliError {
            code: crate::exit_codes::EXIT_IO,
            message: format!("failed to write to stdout: {e}"),
            hint: None,
        }),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    Config::load(path).map_err(CliError::config)
}

/// Build a frame from a list of input files, dispatching each by extension.
pub fn process_files(config: &Config, files: &[PathBuf]) -> Result<Frame, CliError> {
    let mut frame = Frame::new(config.classifiers());
    for path in files {
        eprintln!("processing {}", path.display());
        append_file(&mut frame, path)
            .map_err(|e| e.with_hint(format!("while processing {}", path.display())))?;
    }
    Ok(frame)
}

fn append_file(frame: &mut Frame, path: &Path) -> Result<(), CliError> {
    match extension(path).as_deref() {
        Some("las") => {
            for row in las::read_rows(path).map_err(CliError::io)? {
                frame.append_row(row).map_err(CliError::data)?;
            }
            Ok(())
        }
        Some("csv") => {
            for row in csv::read_rows(path).map_err(CliError::io)? {
                frame.append_row(row).map_err(CliError::data)?;
            }
            Ok(())
        }
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
            let input = image::read_image(path).map_err(CliError::io)?;
            frame.append_classified(&input).map_err(CliError::data)
        }
        _ => Err(CliError::usage(format!("unsupported file type: {}", path.display()))
            .with_hint("expected .las, .csv or an image (png, tif, jpg, bmp)")),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Space-aligned table dump for terminal use.
fn print_table(table: &Table) -> io::Result<()> {
    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.len()).collect();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let cells: Vec<String> = (0..widths.len())
            .map(|col| table.value(row, col).to_string())
            .collect();
        for (width, cell) in widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.len());
        }
        rows.push(cells);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_aligned(&mut out, table.columns(), &widths)?;
    for cells in &rows {
        write_aligned(&mut out, cells, &widths)?;
    }
    Ok(())
}

fn write_aligned(
    out: &mut impl Write,
    cells: &[impl AsRef<str>],
    widths: &[usize],
) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}
