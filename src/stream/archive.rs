//! Local archive of precomputed digits, as plain text or zipped
//!
//! The archive text starts with `3.` followed by the fractional digits. Plain
//! files are read with seeks; zip entries cannot seek, so a worker thread
//! inflates the entry into a pipe and reads move forward only.

use crate::io::configuration::{ARCHIVE_HEADER, ARCHIVE_TEXT_NAME};
use crate::io::error::{Result, SearchError, corrupt_archive, file_system, invalid_parameter};
use crate::stream::{DigitSource, decode_hex_digit};
use std::fs::File;
use std::io::{self, BufReader, PipeReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use zip::ZipArchive;

enum ArchiveReader {
    Text(BufReader<File>),
    Zip {
        pipe: BufReader<PipeReader>,
        worker: Option<JoinHandle<Result<()>>>,
    },
}

impl Read for ArchiveReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Text(reader) => reader.read(buf),
            Self::Zip { pipe, .. } => pipe.read(buf),
        }
    }
}

/// Digits read from a local `pi_hex_1b.txt` or `pi_hex_1b.zip`
pub struct ArchiveSource {
    path: PathBuf,
    reader: ArchiveReader,
    position: u64,
    digit_count: u64,
    end: Option<u64>,
}

impl ArchiveSource {
    /// Open an archive, choosing zip or plain text by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or does not look like a
    /// digit archive
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            Self::open_zip(path)
        } else {
            Self::open_text(path)
        }
    }

    /// Open a plain text archive
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or its size read
    /// - The file does not start with `3.`
    pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| file_system(&path, "open archive", e))?;
        let size = file
            .metadata()
            .map_err(|e| file_system(&path, "read archive metadata", e))?
            .len();

        let mut source = Self {
            digit_count: size.saturating_sub(ARCHIVE_HEADER.len() as u64),
            reader: ArchiveReader::Text(BufReader::new(file)),
            position: 0,
            end: None,
            path,
        };
        source.check_header()?;
        Ok(source)
    }

    /// Open a zip archive holding exactly one entry named `pi_hex_1b.txt`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The file is not a readable zip archive or holds other entries
    /// - The entry does not start with `3.`
    pub fn open_zip<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| file_system(&path, "open archive", e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| corrupt_archive(&path, &e))?;

        let names: Vec<&str> = archive.file_names().collect();
        if names != [ARCHIVE_TEXT_NAME] {
            return Err(corrupt_archive(
                &path,
                &format!("expected a single entry named {ARCHIVE_TEXT_NAME}, found {names:?}"),
            ));
        }
        let size = archive
            .by_name(ARCHIVE_TEXT_NAME)
            .map_err(|e| corrupt_archive(&path, &e))?
            .size();

        let (pipe, mut writer) = io::pipe().map_err(|e| file_system(&path, "create pipe", e))?;
        let worker_path = path.clone();
        let worker = thread::Builder::new()
            .name("archive-inflate".to_string())
            .spawn(move || -> Result<()> {
                let mut entry = archive
                    .by_name(ARCHIVE_TEXT_NAME)
                    .map_err(|e| corrupt_archive(&worker_path, &e))?;
                match io::copy(&mut entry, &mut writer) {
                    // The reading side hung up before the end of the entry
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    Err(e) => Err(corrupt_archive(&worker_path, &e)),
                    Ok(_) => Ok(()),
                }
            })
            .map_err(|e| file_system(&path, "spawn archive reader", e))?;

        let mut source = Self {
            digit_count: size.saturating_sub(ARCHIVE_HEADER.len() as u64),
            reader: ArchiveReader::Zip {
                pipe: BufReader::new(pipe),
                worker: Some(worker),
            },
            position: 0,
            end: None,
            path,
        };
        source.check_header()?;
        Ok(source)
    }

    /// Path of the archive file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_header(&mut self) -> Result<()> {
        let mut header = [0u8; 2];
        match self.reader.read_exact(&mut header) {
            Ok(()) if &header == ARCHIVE_HEADER => Ok(()),
            Ok(()) => Err(corrupt_archive(
                &self.path,
                &format!("expected header '3.', found {header:?}"),
            )),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.worker_result()?;
                Err(corrupt_archive(&self.path, &"archive is shorter than its header"))
            }
            Err(e) => Err(file_system(&self.path, "read archive header", e)),
        }
    }

    // Moves the reader so that the next byte read is digit `start`
    fn seek_to(&mut self, start: u64) -> Result<()> {
        if start == self.position {
            return Ok(());
        }
        match &mut self.reader {
            ArchiveReader::Text(reader) => {
                reader
                    .seek(SeekFrom::Start(start + ARCHIVE_HEADER.len() as u64))
                    .map_err(|e| file_system(&self.path, "seek archive", e))?;
            }
            ArchiveReader::Zip { pipe, .. } => {
                if start < self.position {
                    return Err(invalid_parameter(
                        "start",
                        &start,
                        &format!(
                            "zip archives are read forward only; already at digit {}",
                            self.position
                        ),
                    ));
                }
                let gap = start - self.position;
                let skipped = io::copy(&mut pipe.by_ref().take(gap), &mut io::sink())
                    .map_err(|e| file_system(&self.path, "skip archive digits", e))?;
                if skipped < gap {
                    self.position += skipped;
                    self.end = Some(self.position);
                    self.worker_result()?;
                    return Err(SearchError::SourceExhausted { offset: start });
                }
            }
        }
        self.position = start;
        Ok(())
    }

    // Surfaces a failure of the inflate worker once the pipe has closed
    fn worker_result(&mut self) -> Result<()> {
        let ArchiveReader::Zip { worker, .. } = &mut self.reader else {
            return Ok(());
        };
        match worker.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(corrupt_archive(&self.path, &"archive reader thread panicked")),
            None => Ok(()),
        }
    }
}

impl DigitSource for ArchiveSource {
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        if self.end.is_some_and(|end| start >= end) || start >= self.digit_count {
            return Err(SearchError::SourceExhausted { offset: start });
        }
        self.seek_to(start)?;

        let mut raw = Vec::with_capacity(length);
        self.reader
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut raw)
            .map_err(|e| file_system(&self.path, "read archive", e))?;
        self.position = start + raw.len() as u64;

        let mut digits = Vec::with_capacity(raw.len());
        for (offset, &byte) in raw.iter().enumerate() {
            match decode_hex_digit(byte) {
                Some(digit) => digits.push(digit),
                None if byte.is_ascii_whitespace() => {
                    self.end = Some(start + offset as u64);
                    break;
                }
                None => {
                    return Err(corrupt_archive(
                        &self.path,
                        &format!(
                            "byte 0x{byte:02x} at digit {} is not a hexadecimal digit",
                            start + offset as u64
                        ),
                    ));
                }
            }
        }

        if raw.len() < length && self.end.is_none() {
            self.end = Some(self.position);
            self.worker_result()?;
        }
        if digits.is_empty() {
            return Err(SearchError::SourceExhausted { offset: start });
        }
        Ok(digits)
    }

    fn digit_count(&self) -> Option<u64> {
        Some(self.end.unwrap_or(self.digit_count))
    }

    fn describe(&self) -> String {
        format!("archive {}", self.path.display())
    }
}
