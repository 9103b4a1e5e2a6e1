//! Filesystem utilities.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Read a text file one line at a time.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Invalid UTF-8 is
/// replaced rather than rejected, since generated files occasionally carry
/// stray bytes in comments.
pub fn read_lines(path: &Path) -> io::Result<impl Iterator<Item = io::Result<String>>> {
    let reader = BufReader::new(fs::File::open(path)?);

    Ok(reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            String::from_utf8_lossy(&bytes).into_owned()
        })
    }))
}

/// A line read together with its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Line content without the terminator.
    pub body: String,
    /// `"\n"`, `"\r\n"`, or empty for a final unterminated line.
    pub terminator: &'static str,
    /// The bytes exactly as read.
    pub raw: Vec<u8>,
}

/// Read the next line from `reader`, keeping its original bytes.
///
/// Returns `Ok(None)` at end of input.
pub fn read_raw_line(reader: &mut impl BufRead) -> io::Result<Option<RawLine>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }

    let (body, terminator) = if raw.ends_with(b"\r\n") {
        (&raw[..raw.len() - 2], "\r\n")
    } else if raw.ends_with(b"\n") {
        (&raw[..raw.len() - 1], "\n")
    } else {
        (&raw[..], "")
    };
    let body = String::from_utf8_lossy(body).into_owned();

    Ok(Some(RawLine {
        body,
        terminator,
        raw,
    }))
}

/// Overwrite `dst` with the contents of `src`.
///
/// `dst` is truncated and written in place, so it keeps its inode and
/// permissions. Unlike a rename this works while another process keeps
/// `dst` open, which the generator does with its build files.
pub fn copy_over(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(dst)?;

    let copied = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(copied)
}

/// Remove a file, if it exists. Returns whether a file was removed.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_lines_strips_terminators() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("demo.ioc");
        fs::write(&path, "a=1\r\nb=2\nc=3").unwrap();

        let lines: Vec<String> = read_lines(&path).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn test_read_raw_line_keeps_terminators() {
        let mut reader = Cursor::new(b"one\r\ntwo\nthree".to_vec());

        let first = read_raw_line(&mut reader).unwrap().unwrap();
        assert_eq!(first.body, "one");
        assert_eq!(first.terminator, "\r\n");
        assert_eq!(first.raw, b"one\r\n");

        let second = read_raw_line(&mut reader).unwrap().unwrap();
        assert_eq!(second.terminator, "\n");

        let third = read_raw_line(&mut reader).unwrap().unwrap();
        assert_eq!(third.body, "three");
        assert_eq!(third.terminator, "");

        assert!(read_raw_line(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_remove_file_if_exists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt.tmp");

        assert!(!remove_file_if_exists(&path).unwrap());
        fs::write(&path, "scratch").unwrap();
        assert!(remove_file_if_exists(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_copy_over_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old content").unwrap();

        copy_over(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_over_keeps_target_permissions() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("CMakeLists.txt.tmp");
        let dst = tmp.path().join("CMakeLists.txt");
        fs::write(&src, "rewritten\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o600)).unwrap();
        fs::write(&dst, "original\n").unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o664)).unwrap();
        let inode = fs::metadata(&dst).unwrap().ino();

        copy_over(&src, &dst).unwrap();

        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o664);
        assert_eq!(meta.ino(), inode);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "rewritten\n");
    }

    #[test]
    fn test_copy_over_requires_existing_target() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        fs::write(&src, "new").unwrap();

        assert!(copy_over(&src, &tmp.path().join("missing.txt")).is_err());
    }
}
