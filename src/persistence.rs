// File: src/persistence.rs
use crate::core::catalog::Catalog;
use crate::core::q_table::QTable;
use crate::error::StoreError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.display().to_string(), source }
}

/// Writes through a temp file in the target directory and renames it into
/// place, so readers never observe a half-written file.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), StoreError>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(io_error(parent_dir))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(io_error(parent_dir))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush().map_err(io_error(path))?;
    }
    temp_file.as_file().sync_all().map_err(io_error(path))?;
    temp_file.persist(path).map_err(|e| io_error(path)(e.error))?;
    Ok(())
}

/// Full rewrite of the value table.
pub fn save_q_table(table: &QTable, path: &Path) -> Result<(), StoreError> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, table).map_err(|source| StoreError::TableEncode { source })
    })
}

/// Loads the value table. `Ok(None)` means the file does not exist yet,
/// which is the first-run path; every other failure is an error.
pub fn load_q_table(path: &Path) -> Result<Option<QTable>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path)(e)),
    };
    let reader = BufReader::new(file);
    let table: QTable = bincode::deserialize_from(reader).map_err(|source| StoreError::TableCorrupt {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(table))
}

pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<(), StoreError> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, catalog.words()).map_err(|source| {
            StoreError::CatalogParse { path: path.display().to_string(), source }
        })?;
        writer.write_all(b"\n").map_err(io_error(path))
    })
}

/// Loads the catalog; a missing file is an error, unlike the value table.
pub fn load_catalog(path: &Path) -> Result<Catalog, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::CatalogMissing { path: path.display().to_string() })
        }
        Err(e) => return Err(io_error(path)(e)),
    };
    let words = serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::CatalogParse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Catalog::from_words(words))
}
