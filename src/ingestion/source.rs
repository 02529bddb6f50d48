//! Source locators and their resolution into something the engine can read.
//!
//! A [`Source`] is what the caller hands in. [`resolve`] turns it into a [`SourceHandle`], which
//! owns any stream that had to be opened (remote URIs) and releases it when dropped. The
//! [`prepare_file_arg`] helper scopes a handle to exactly one consumer.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use polars::prelude::{PlRefPath, ScanSources};
use regex::Regex;
use url::Url;

use crate::error::{ReadError, ReadResult};

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("invalid regex in source"));

/// Where to read data from.
pub enum Source {
    /// A local path. The engine opens it itself.
    Path(PathBuf),
    /// An already-open stream.
    Stream(Box<dyn Read + Send>),
    /// Bytes already held in memory.
    Bytes(Vec<u8>),
    /// A URI. `http`, `https` and `file` schemes are opened by [`resolve`].
    Uri(Url),
}

impl Source {
    /// Wrap an open reader.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// Short description used in logs and observer contexts.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Stream(_) => "<stream>".to_string(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
            Self::Uri(u) => u.to_string(),
        }
    }

    /// Path of a path-like source, used for extension-based format detection.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p.as_path()),
            Self::Uri(u) => Some(Path::new(u.path())),
            Self::Stream(_) | Self::Bytes(_) => None,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Uri(u) => f.debug_tuple("Uri").field(&u.as_str()).finish(),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::Path(PathBuf::from(s))
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::Path(PathBuf::from(s))
    }
}

impl From<&Path> for Source {
    fn from(p: &Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&PathBuf> for Source {
    fn from(p: &PathBuf) -> Self {
        Self::Path(p.clone())
    }
}

impl From<Url> for Source {
    fn from(u: Url) -> Self {
        Self::Uri(u)
    }
}

impl From<Vec<u8>> for Source {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Source {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

/// A stream opened from a URI. Closed when dropped.
pub struct RemoteStream {
    origin: Url,
    inner: Box<dyn Read + Send>,
}

impl RemoteStream {
    /// The URI this stream was opened from.
    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

impl Read for RemoteStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for RemoteStream {
    fn drop(&mut self) {
        tracing::debug!(uri = %self.origin, "closing remote stream");
    }
}

impl fmt::Debug for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStream")
            .field("origin", &self.origin.as_str())
            .finish()
    }
}

/// A resolved source, ready to be handed to one engine call.
pub enum SourceHandle {
    /// Local path, passed through unchanged.
    Path(PathBuf),
    /// Caller-provided stream, passed through unchanged.
    Stream(Box<dyn Read + Send>),
    /// Caller-provided bytes.
    Bytes(Vec<u8>),
    /// Stream opened from a URI.
    Remote(RemoteStream),
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Remote(r) => f.debug_tuple("Remote").field(r).finish(),
        }
    }
}

/// What the engine actually reads: either a path it opens itself, or an in-memory buffer.
#[derive(Debug)]
pub(crate) enum EngineInput {
    Path(PathBuf),
    Buffer(Cursor<Vec<u8>>),
}

/// What a lazy scan reads: a normalized path, or an in-memory buffer owned by the plan.
pub(crate) enum ScanInput {
    Path(PlRefPath),
    Buffer(ScanSources),
}

impl SourceHandle {
    /// Drain stream-like handles into memory. Path handles are left for the engine to open.
    ///
    /// Streams are consumed (and remote streams closed) before this returns.
    pub(crate) fn into_engine_input(self) -> ReadResult<EngineInput> {
        match self {
            Self::Path(p) => Ok(EngineInput::Path(p)),
            Self::Bytes(b) => Ok(EngineInput::Buffer(Cursor::new(b))),
            Self::Stream(mut r) => Ok(EngineInput::Buffer(Cursor::new(drain(&mut r)?))),
            Self::Remote(mut r) => Ok(EngineInput::Buffer(Cursor::new(drain(&mut r)?))),
        }
    }

    /// Prepare a handle for a lazy scan.
    ///
    /// Paths go through [`format_path`]. Streams are drained and closed before this returns; the
    /// bytes are moved into the plan and parsed only when it is collected.
    pub(crate) fn into_scan_input(self) -> ReadResult<ScanInput> {
        match self.into_engine_input()? {
            EngineInput::Path(path) => {
                let path = format_path(&path)?;
                tracing::debug!(path = %path.display(), "scanning path");
                Ok(ScanInput::Path(PlRefPath::new(path.to_string_lossy().as_ref())))
            }
            EngineInput::Buffer(buf) => {
                let bytes = buf.into_inner();
                tracing::debug!(bytes = bytes.len(), "scanning in-memory buffer");
                Ok(ScanInput::Buffer(ScanSources::Buffers(Arc::from_iter([bytes.into()]))))
            }
        }
    }
}

fn drain(reader: &mut dyn Read) -> ReadResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

fn reject_bare_url(path: &Path) -> ReadResult<()> {
    if let Some(s) = path.to_str() {
        if BARE_URL_RE.is_match(s) {
            return Err(ReadError::config(format!(
                "use Source::Uri(..) for remote files, got bare url string {s:?}"
            )));
        }
    }
    Ok(())
}

/// Resolve a source into a handle.
///
/// - A path whose text starts with `http://` or `https://` is rejected. Remote data must be
///   requested explicitly through [`Source::Uri`].
/// - `http`/`https` URIs are fetched with a blocking GET. This layer imposes no timeout; the
///   defaults of `reqwest::blocking` apply (30 seconds per request at the time of writing).
/// - `file` URIs are opened from the local filesystem.
/// - Every other source is passed through unchanged.
pub fn resolve(source: Source) -> ReadResult<SourceHandle> {
    match source {
        Source::Path(p) => {
            reject_bare_url(&p)?;
            Ok(SourceHandle::Path(p))
        }
        Source::Stream(r) => Ok(SourceHandle::Stream(r)),
        Source::Bytes(b) => Ok(SourceHandle::Bytes(b)),
        Source::Uri(url) => open_uri(url).map(SourceHandle::Remote),
    }
}

/// Resolve a source for readers that do not auto-open URIs (single JSON and NDJSON eager reads).
pub fn resolve_local(source: Source) -> ReadResult<SourceHandle> {
    match source {
        Source::Uri(url) => Err(ReadError::config(format!(
            "remote sources are not supported by this reader, got {url}"
        ))),
        other => resolve(other),
    }
}

fn open_uri(url: Url) -> ReadResult<RemoteStream> {
    tracing::debug!(uri = %url, "opening remote source");
    let inner: Box<dyn Read + Send> = match url.scheme() {
        "http" | "https" => {
            let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
            Box::new(response)
        }
        "file" => {
            let path = url.to_file_path().map_err(|_| {
                ReadError::config(format!("file uri does not name a local path: {url}"))
            })?;
            Box::new(File::open(path)?)
        }
        other => {
            return Err(ReadError::config(format!(
                "unsupported uri scheme '{other}' in {url}"
            )));
        }
    };
    Ok(RemoteStream { origin: url, inner })
}

/// Resolve `source` and pass the handle to `body`.
///
/// The handle is owned by `body` and dropped when it returns, on success and error alike.
pub fn prepare_file_arg<T, F>(source: Source, body: F) -> ReadResult<T>
where
    F: FnOnce(SourceHandle) -> ReadResult<T>,
{
    let handle = resolve(source)?;
    body(handle)
}

/// Expand `~` and make `path` absolute, without touching the filesystem.
pub fn format_path(path: &Path) -> ReadResult<PathBuf> {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };
    Ok(std::path::absolute(expanded)?)
}
