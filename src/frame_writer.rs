use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};
use serde_derive::{Serialize, Deserialize};

use super::error::WriterError;
use super::geb_frame::{GebFrame, GemFrame};
use super::vfat_frame::VFATFrame;

/// Selectable serialization of re-written frames: lowercase hex text, one
/// field per line, or packed big-endian binary with no separators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputMode {
    Hex,
    Binary
}

/// # FrameWriter
/// Serializes board frames to a single append-only output file. Both modes
/// emit the same lossy field subset per VFAT: BC, EC, ChipID, lsData,
/// msData, crc. bxExp, bxNum and delVT are not re-written. Binary words are
/// big-endian so the output does not depend on the host.
///
/// The writer owns the sink; one write_board call emits header, bodies and
/// trailer without interleaving.
#[derive(Debug)]
pub struct FrameWriter {
    file_handle: BufWriter<File>,
    mode: OutputMode
}

impl FrameWriter {

    /// Open the output file for append, creating it if needed.
    pub fn new(path: &Path, mode: OutputMode) -> Result<Self, WriterError> {
        let file = match OpenOptions::new().append(true).create(true).open(path) {
            Ok(f) => f,
            Err(e) => return Err(WriterError::BadFilePath(path.to_path_buf(), e))
        };
        Ok(FrameWriter { file_handle: BufWriter::new(file), mode })
    }

    /// Write one board frame: header word, every VFAT in arrival order,
    /// trailer word.
    pub fn write_board(&mut self, geb: &GebFrame) -> Result<(), WriterError> {
        self.write_board_words(geb)?;
        self.file_handle.flush()?;
        Ok(())
    }

    /// Write one link-level event: the three header words, every board,
    /// then the two trailer words, all passed through unmodified.
    pub fn write_link_event(&mut self, gem: &GemFrame) -> Result<(), WriterError> {
        self.write_u64_word(gem.header1)?;
        self.write_u64_word(gem.header2)?;
        self.write_u64_word(gem.header3)?;
        for geb in gem.gebs.iter() {
            self.write_board_words(geb)?;
        }
        self.write_u64_word(gem.trailer2)?;
        self.write_u64_word(gem.trailer1)?;
        self.file_handle.flush()?;
        Ok(())
    }

    fn write_board_words(&mut self, geb: &GebFrame) -> Result<(), WriterError> {
        self.write_u64_word(geb.header)?;
        for vfat in geb.vfats.iter() {
            self.write_vfat(vfat)?;
        }
        self.write_u64_word(geb.trailer)?;
        Ok(())
    }

    fn write_u64_word(&mut self, word: u64) -> Result<(), WriterError> {
        match self.mode {
            OutputMode::Hex => writeln!(self.file_handle, "{:x}", word)?,
            OutputMode::Binary => self.file_handle.write_u64::<BigEndian>(word)?
        }
        Ok(())
    }

    fn write_vfat(&mut self, vfat: &VFATFrame) -> Result<(), WriterError> {
        match self.mode {
            OutputMode::Hex => {
                writeln!(self.file_handle, "{:x}", vfat.bc)?;
                writeln!(self.file_handle, "{:x}", vfat.ec)?;
                writeln!(self.file_handle, "{:x}", vfat.chip_id)?;
                writeln!(self.file_handle, "{:x}", vfat.ls_data)?;
                writeln!(self.file_handle, "{:x}", vfat.ms_data)?;
                writeln!(self.file_handle, "{:x}", vfat.crc)?;
            }
            OutputMode::Binary => {
                self.file_handle.write_u16::<BigEndian>(vfat.bc)?;
                self.file_handle.write_u16::<BigEndian>(vfat.ec)?;
                self.file_handle.write_u16::<BigEndian>(vfat.chip_id)?;
                self.file_handle.write_u64::<BigEndian>(vfat.ls_data)?;
                self.file_handle.write_u64::<BigEndian>(vfat.ms_data)?;
                self.file_handle.write_u16::<BigEndian>(vfat.crc)?;
            }
        }
        Ok(())
    }
}
