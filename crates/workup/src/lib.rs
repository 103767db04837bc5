pub mod annotation;
pub mod modification;
pub mod table;

use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to access `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Stream(#[from] std::io::Error),
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
    #[error("column `{column}` not found in header (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("invalid modification tag: {0:?}")]
    InvalidTag(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io<P: AsRef<Path>>(path: P) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }
}

/// Open a file for buffered line reading
pub fn open<P: AsRef<Path>>(path: P) -> Result<std::io::BufReader<std::fs::File>, Error> {
    let path = path.as_ref();
    std::fs::File::open(path)
        .map(std::io::BufReader::new)
        .map_err(Error::io(path))
}

/// Create (or truncate) a file for buffered writing
pub fn create<P: AsRef<Path>>(path: P) -> Result<std::io::BufWriter<std::fs::File>, Error> {
    let path = path.as_ref();
    std::fs::File::create(path)
        .map(std::io::BufWriter::new)
        .map_err(Error::io(path))
}

/// Deserialize a JSON document from disk
pub fn read_json<P, T>(path: P) -> Result<T, Error>
where
    P: AsRef<Path>,
    T: for<'de> serde::Deserialize<'de>,
{
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(Error::io(path))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Call `f` with every line of `rdr` and the terminator it ended with
/// (`"\n"`, `"\r\n"`, or `""` for a final unterminated line)
pub(crate) fn for_each_line<R, F>(mut rdr: R, mut f: F) -> Result<(), Error>
where
    R: std::io::BufRead,
    F: FnMut(&str, &'static str) -> Result<(), Error>,
{
    let mut buf = String::new();
    loop {
        buf.clear();
        if rdr.read_line(&mut buf)? == 0 {
            return Ok(());
        }
        let line = buf.as_str();
        let (line, terminator) = match line.strip_suffix('\n') {
            Some(rest) => match rest.strip_suffix('\r') {
                Some(rest) => (rest, "\r\n"),
                None => (rest, "\n"),
            },
            None => (line, ""),
        };
        f(line, terminator)?;
    }
}
