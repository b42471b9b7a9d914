use std::fmt;

use crate::backend::{ResolveError, VcsBackend};

pub const DEFAULT_DEFINE_NAME: &str = "FIRMWARE_VERSION";
pub const UNKNOWN: &str = "UNKNOWN";

const DIRTY_SUFFIX: &str = "-d";

/// Firmware version derived from source control, or the sentinel when it
/// could not be derived.
///
/// `Display` renders the double-quoted literal that ends up in the define,
/// e.g. `"v2.3.0-abc1234-d"` or `"UNKNOWN"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareVersion {
    Described {
        tag: String,
        short_hash: String,
        dirty: bool,
    },
    Unknown,
}

impl FirmwareVersion {
    /// The unquoted value.
    pub fn value(&self) -> String {
        match self {
            FirmwareVersion::Described {
                tag,
                short_hash,
                dirty,
            } => compose(tag, short_hash, *dirty),
            FirmwareVersion::Unknown => UNKNOWN.to_string(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, FirmwareVersion::Described { .. })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value())
    }
}

/// A compiler define flag, rendered as one shell token:
/// `'-DFIRMWARE_VERSION="v2.3.0-abc1234"'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub version: FirmwareVersion,
}

impl Define {
    pub fn new(name: impl Into<String>, version: FirmwareVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn firmware_version(version: FirmwareVersion) -> Self {
        Self::new(DEFAULT_DEFINE_NAME, version)
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'-D{}={}'", self.name, self.version)
    }
}

pub fn resolve_tag(backend: &dyn VcsBackend) -> Result<String, ResolveError> {
    let tag = backend.describe_tags()?.trim().to_string();
    if tag.is_empty() {
        return Err(ResolveError::Empty("describe --tags"));
    }
    Ok(tag)
}

pub fn resolve_short_hash(backend: &dyn VcsBackend) -> Result<String, ResolveError> {
    let hash = backend.short_head()?.trim().to_string();
    if hash.is_empty() {
        return Err(ResolveError::Empty("rev-parse --short HEAD"));
    }
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ResolveError::MalformedHash(hash));
    }
    Ok(hash)
}

/// Only the unstaged diff counts; staged-but-uncommitted changes read as clean.
pub fn resolve_dirty(backend: &dyn VcsBackend) -> Result<bool, ResolveError> {
    Ok(!backend.diff_stat()?.trim().is_empty())
}

pub fn compose(tag: &str, short_hash: &str, dirty: bool) -> String {
    let suffix = if dirty { DIRTY_SUFFIX } else { "" };
    format!("{tag}-{short_hash}{suffix}")
}

/// Runs the tag, hash and dirty queries in that order, stopping at the first
/// failure.
pub fn try_resolve(backend: &dyn VcsBackend) -> Result<FirmwareVersion, ResolveError> {
    let tag = resolve_tag(backend)?;
    let short_hash = resolve_short_hash(backend)?;
    let dirty = resolve_dirty(backend)?;
    Ok(FirmwareVersion::Described {
        tag,
        short_hash,
        dirty,
    })
}

/// Best-effort resolution: any failure yields [`FirmwareVersion::Unknown`].
pub fn resolve_version(backend: &dyn VcsBackend) -> FirmwareVersion {
    match try_resolve(backend) {
        Ok(version) => {
            tracing::debug!(version = %version.value(), "resolved firmware version");
            version
        }
        Err(err) => {
            tracing::debug!(error = %err, "version resolution unavailable, falling back to UNKNOWN");
            FirmwareVersion::Unknown
        }
    }
}
