//! Discovery of simulation output files

use crate::netcdf_reader::NetcdfReader;
use crate::variables::GridVariables;
use lakesim_core::{Error, FrameReader, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sub-folder holding the per-week split of the raw output
pub const POSTPROCESS_DIR: &str = "postprocess";

/// List the NetCDF files of a simulation in chronological order
///
/// Files are taken from `<folder>/postprocess`, falling back to `<folder>`
/// itself when that holds none. Names sort chronologically by construction.
pub fn discover_datasets(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(Error::resource(format!(
            "simulation folder {} does not exist",
            folder.display()
        )));
    }

    let postprocess = folder.join(POSTPROCESS_DIR);
    if postprocess.is_dir() {
        let files = netcdf_files(&postprocess)?;
        if !files.is_empty() {
            return Ok(files);
        }
        debug!("{} holds no NetCDF files", postprocess.display());
    }

    let files = netcdf_files(folder)?;
    if files.is_empty() {
        return Err(Error::resource(format!(
            "no NetCDF output found in {}",
            folder.display()
        )));
    }
    Ok(files)
}

fn netcdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "nc") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Open a reader for every output file of a simulation
pub fn open_readers(
    folder: impl AsRef<Path>,
    variables: &GridVariables,
) -> Result<Vec<Box<dyn FrameReader>>> {
    let files = discover_datasets(folder)?;
    info!("Reading {} output files", files.len());

    files
        .iter()
        .map(|path| {
            NetcdfReader::open(path, variables)
                .map(|reader| Box::new(reader) as Box<dyn FrameReader>)
        })
        .collect()
}
