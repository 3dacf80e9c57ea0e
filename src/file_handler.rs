use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a source file the way a C string buffer would see it: everything
/// after the first NUL byte is ignored. Invalid UTF-8 is replaced, so it
/// later lexes as unrecognized characters.
pub fn read_source<P: AsRef<Path>>(path: P) -> std::io::Result<String> {
    let mut file = File::open(path)?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(nul);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
