use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::read::MultiGzDecoder;

use sigcorr_core::TrackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum FileType {
    BEDGRAPH,
    WIG,
    BIGWIG,
    UNKNOWN,
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bg" | "bedgraph" => Ok(FileType::BEDGRAPH),
            "wig" => Ok(FileType::WIG),
            "bw" | "bigwig" => Ok(FileType::BIGWIG),
            _ => Ok(FileType::UNKNOWN),
        }
    }
}

pub struct FileInfo {
    pub file_type: FileType,
    pub is_gzipped: bool,
}

///
/// Work out the track format of a file from its name. A trailing `.gz` is
/// stripped before looking at the extension.
///
pub fn get_file_info(path: &Path) -> FileInfo {
    let mut file_type = FileType::UNKNOWN;
    let mut is_gzipped = false;

    if let Some(filename) = path.file_name().and_then(OsStr::to_str) {
        let base_filename = match filename.strip_suffix(".gz") {
            Some(base) => {
                is_gzipped = true;
                base
            }
            None => filename,
        };
        if let Some(ext) = PathBuf::from(base_filename)
            .extension()
            .and_then(|e| e.to_str())
        {
            file_type = FileType::from_str(ext).unwrap_or(FileType::UNKNOWN);
        }
    }

    FileInfo {
        file_type,
        is_gzipped,
    }
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, TrackError> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match get_file_info(path).is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Label of a file-backed track: its file name.
pub fn track_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
