use crate::error::{MaterializeError, materialize_io};
use crate::generation::SOURCE_EXT;
use std::fs;
use std::path::Path;

pub const BARREL_FILE: &str = "index.js";

/// Component names of every source file in `dir`, sorted
///
/// The listing is taken from disk, so files left by earlier runs are included.
pub fn list_modules(dir: &Path) -> Result<Vec<String>, MaterializeError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(materialize_io(dir)(e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry.map_err(materialize_io(dir))?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Barrel source re-exporting each named module's default export
pub fn render(names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        out.push_str(&format!("export {{ default as {} }} from './{}';\n", name, name));
    }
    out
}

/// Rewrite `<dir>/index.js` from the current directory listing
pub fn write(dir: &Path) -> Result<Vec<String>, MaterializeError> {
    let names = list_modules(dir)?;
    fs::create_dir_all(dir).map_err(materialize_io(dir))?;
    let path = dir.join(BARREL_FILE);
    fs::write(&path, render(&names)).map_err(materialize_io(&path))?;
    ::log::debug!("Barrel {} exports {} components", path.display(), names.len());
    Ok(names)
}
