//! Calibration files.
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::{error, fmt};

use log::{debug, warn};

use crate::calibration::{
    self, CalibrationFormatError, CalibrationProfile, SensorIdentity, StoredCalibration,
    STORED_SIZE,
};

/// Failure to read a calibration file.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Malformed(CalibrationFormatError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot read calibration file: {}", e),
            LoadError::Malformed(e) => write!(f, "malformed calibration file: {}", e),
        }
    }
}

impl error::Error for LoadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<CalibrationFormatError> for LoadError {
    fn from(e: CalibrationFormatError) -> Self {
        LoadError::Malformed(e)
    }
}

/// Reads and decodes a calibration file in either form.
pub fn load(path: impl AsRef<Path>) -> Result<StoredCalibration, LoadError> {
    let path = path.as_ref();
    let mut bytes = Vec::with_capacity(STORED_SIZE);
    // One byte past the largest form is enough to detect oversized files.
    File::open(path)?
        .take(STORED_SIZE as u64 + 1)
        .read_to_end(&mut bytes)?;

    let stored = calibration::deserialize(&bytes)?;
    debug!(
        "loaded calibration from {} ({} bytes)",
        path.display(),
        bytes.len()
    );

    Ok(stored)
}

/// Writes a calibration file. With an identity the versioned form is written,
/// without one the legacy 22-byte form.
///
/// The data goes to a sibling temporary file first and is renamed over `path`
/// only once fully written and synced.
pub fn save(
    path: impl AsRef<Path>,
    profile: &CalibrationProfile,
    identity: Option<SensorIdentity>,
) -> io::Result<()> {
    let path = path.as_ref();
    let versioned;
    let legacy;
    let bytes: &[u8] = match identity {
        Some(identity) => {
            versioned = calibration::serialize_versioned(profile, identity);
            &versioned
        }
        None => {
            legacy = calibration::serialize(profile);
            &legacy
        }
    };

    let tmp = temp_path(path);
    let written = write_synced(&tmp, bytes).and_then(|_| fs::rename(&tmp, path));
    if written.is_err() {
        if let Err(e) = fs::remove_file(&tmp) {
            warn!("cannot remove {}: {}", tmp.display(), e);
        }
    } else {
        debug!(
            "saved calibration to {} ({} bytes)",
            path.display(),
            bytes.len()
        );
    }

    written
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
