use std::io;
use std::path::Path;

use crate::error::LoadError;

/// Format a fixture I/O error message with a suggestion.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the fixture directory exists and the path is correct.",
        PermissionDenied => "Check permissions on the fixture files.",
        UnexpectedEof => "Fixture appears truncated or corrupted.",
        _ => "Check the fixture directory.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a load error with context.
pub fn load_io_error(operation: &str, path: &Path, err: io::Error) -> LoadError {
    LoadError::Io {
        msg: format_io_error(operation, path, &err),
        source: err,
    }
}

/// Read a whole fixture file.
pub fn read_fixture(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|e| load_io_error("reading fixture", path, e))
}
