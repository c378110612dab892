use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::constants::TOKENS_PER_FRAME;
use super::error::ScanFileError;
use super::vfat_frame::VFATFrame;

const DEFAULT_BUFFER_SIZE: usize = 1_000_000; // 1MB buffer per file?

/// The threshold-scan sweep parameters at the head of every capture.
/// Consumed by the downstream analysis to size its histograms; the codec
/// only parses and reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppHeader {
    pub min_th: i32,
    pub max_th: i32,
    pub step_size: i32
}

impl AppHeader {
    pub fn bin_count(&self) -> i32 {
        ((self.max_th - self.min_th) + 1) / self.step_size
    }
}

/// # ScanFile
/// A captured threshold-scan readout stream: whitespace-separated text
/// tokens, three decimal header tokens first, then 9 tokens per VFAT frame.
#[allow(dead_code)]
#[derive(Debug)]
pub struct ScanFile {
    file_handle: BufReader<File>,
    size_bytes: u64,
    pending_tokens: VecDeque<String>,
    is_eof: bool,
    is_open: bool
}

impl ScanFile {

    pub fn new(path: &Path) -> Result<Self, ScanFileError> {
        if !path.exists() {
            return Err(ScanFileError::BadFilePath(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let size_bytes = file.metadata()?.len();
        let handle = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);

        Ok(ScanFile { file_handle: handle, size_bytes, pending_tokens: VecDeque::new(), is_eof: false, is_open: true })
    }

    /// Next whitespace-delimited token, None once the file is exhausted.
    pub fn next_token(&mut self) -> Result<Option<String>, ScanFileError> {
        loop {
            if let Some(token) = self.pending_tokens.pop_front() {
                return Ok(Some(token));
            }
            if self.is_eof {
                return Ok(None);
            }
            let mut line = String::new();
            let n_read = self.file_handle.read_line(&mut line)?;
            if n_read == 0 {
                self.is_eof = true;
                return Ok(None);
            }
            self.pending_tokens.extend(line.split_whitespace().map(String::from));
        }
    }

    /// The scan header triple {minTh, maxTh, stepSize}, decimal.
    pub fn read_header(&mut self) -> Result<AppHeader, ScanFileError> {
        let mut values: [i32; 3] = [0; 3];
        for (idx, value) in values.iter_mut().enumerate() {
            let token = match self.next_token()? {
                Some(t) => t,
                None => return Err(ScanFileError::Truncated(idx))
            };
            *value = token.parse::<i32>().map_err(|_| ScanFileError::BadHeaderToken(token))?;
        }
        if values[2] <= 0 {
            return Err(ScanFileError::BadStepSize(values[2]));
        }
        Ok(AppHeader { min_th: values[0], max_th: values[1], step_size: values[2] })
    }

    /// Gather the next 9 tokens and decode them as one frame. A clean end of
    /// stream before the first token is EndOfFile; running dry mid frame is
    /// Truncated.
    pub fn get_next_frame(&mut self) -> Result<VFATFrame, ScanFileError> {
        let mut tokens: Vec<String> = Vec::with_capacity(TOKENS_PER_FRAME);
        for idx in 0..TOKENS_PER_FRAME {
            match self.next_token()? {
                Some(t) => tokens.push(t),
                None => {
                    if idx == 0 {
                        return Err(ScanFileError::EndOfFile);
                    }
                    return Err(ScanFileError::Truncated(idx));
                }
            }
        }
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        Ok(VFATFrame::from_tokens(&token_refs)?)
    }

    pub fn is_eof(&self) -> &bool {
        &self.is_eof
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_scan(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("scan.dat");
        let mut file = File::create(&path).expect("create scan file");
        file.write_all(contents.as_bytes()).expect("write scan file");
        (dir, path)
    }

    const ONE_FRAME: &str = "10 50 2\n\
        a0fa c1c5 0000 1f2e edea\n\
        8000000000000001 4\n\
        12.5 beef\n";

    #[test]
    fn missing_file_is_bad_path() {
        let result = ScanFile::new(Path::new("/definitely/not/here.dat"));
        assert!(matches!(result, Err(ScanFileError::BadFilePath(_))));
    }

    #[test]
    fn header_then_frame_then_eof() {
        let (_dir, path) = write_scan(ONE_FRAME);
        let mut scan = ScanFile::new(&path).unwrap();

        let header = scan.read_header().unwrap();
        assert_eq!(header, AppHeader { min_th: 10, max_th: 50, step_size: 2 });
        assert_eq!(header.bin_count(), 20);

        let frame = scan.get_next_frame().unwrap();
        assert_eq!(frame.chip_id_number(), 0xdea);
        assert_eq!(frame.del_vt, 12.5);

        assert!(matches!(scan.get_next_frame(), Err(ScanFileError::EndOfFile)));
        assert!(*scan.is_eof());
    }

    #[test]
    fn mid_frame_eof_is_truncated() {
        let (_dir, path) = write_scan("10 50 2\na0fa c1c5 0000\n");
        let mut scan = ScanFile::new(&path).unwrap();
        scan.read_header().unwrap();
        assert!(matches!(scan.get_next_frame(), Err(ScanFileError::Truncated(3))));
    }

    #[test]
    fn short_header_is_truncated() {
        let (_dir, path) = write_scan("10 50\n");
        let mut scan = ScanFile::new(&path).unwrap();
        assert!(matches!(scan.read_header(), Err(ScanFileError::Truncated(2))));
    }

    #[test]
    fn non_positive_step_size_rejected() {
        let (_dir, path) = write_scan("10 50 0\n");
        let mut scan = ScanFile::new(&path).unwrap();
        assert!(matches!(scan.read_header(), Err(ScanFileError::BadStepSize(0))));
    }

    #[test]
    fn bad_frame_token_propagates() {
        let (_dir, path) = write_scan("10 50 2\nzzzz c1c5 0000 1f2e edea 0 0 1.0 beef\n");
        let mut scan = ScanFile::new(&path).unwrap();
        scan.read_header().unwrap();
        assert!(matches!(scan.get_next_frame(), Err(ScanFileError::BadFrame(_))));
    }
}
