use std::fmt::Display;
use std::fmt::Write;

use super::bits;
use super::constants::*;
use super::error::VFATFrameError;

/*
    Little parsing functions to handle the bare hex tokens of the capture
 */

//A token wider than its target field shows up as a positive overflow from
//from_str_radix. That is corrupt data, never silently masked to width.
fn hex_error(token: &str, e: std::num::ParseIntError) -> VFATFrameError {
    if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) {
        VFATFrameError::Overflow(token.to_string())
    } else {
        VFATFrameError::BadHexToken(token.to_string(), e)
    }
}

fn parse_hex_u16(token: &str) -> Result<u16, VFATFrameError> {
    u16::from_str_radix(token, 16).map_err(|e| hex_error(token, e))
}

fn parse_hex_u32(token: &str) -> Result<u32, VFATFrameError> {
    u32::from_str_radix(token, 16).map_err(|e| hex_error(token, e))
}

fn parse_hex_u64(token: &str) -> Result<u64, VFATFrameError> {
    u64::from_str_radix(token, 16).map_err(|e| hex_error(token, e))
}

fn parse_f64(token: &str) -> Result<f64, VFATFrameError> {
    token.parse::<f64>().map_err(|e| VFATFrameError::BadFloatToken(token.to_string(), e))
}

/// The tracking words that carry a control marker in their top nibble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameField {
    BunchCrossing,
    EventCounter,
    ChipId
}

impl Display for FrameField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameField::BunchCrossing => write!(f, "BC"),
            FrameField::EventCounter => write!(f, "EC"),
            FrameField::ChipId => write!(f, "ChipID")
        }
    }
}

/// A control marker that did not match its expected constant. Diagnostic,
/// not fatal: the parsed frame is still handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFault {
    pub field: FrameField,
    pub expected: u8,
    pub actual: u8
}

impl Display for MarkerFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Control bits of {} read {:04b}, expected {:04b}", self.field, self.actual, self.expected)
    }
}

/// # VFATFrame
/// One VFAT2 chip readout for one trigger, decoded from 9 capture tokens.
/// The three 16-bit tracking words carry a 4-bit control marker in their top
/// nibble: BC is 1010 + 12 bit counter, EC is 1100 + 8 bit counter + 4 flag
/// bits, ChipID is 1110 + 12 bit chip number. The 128 channel hits live in
/// two 64-bit words. delVT is the threshold-scan analog delta riding along
/// with the frame; crc is carried but not verified here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VFATFrame {
    pub bc: u16,
    pub ec: u16,
    pub bx_exp: u32,
    pub bx_num: u16,
    pub chip_id: u16,
    pub ls_data: u64,
    pub ms_data: u64,
    pub del_vt: f64,
    pub crc: u16
}

impl VFATFrame {

    /// Decode one frame from its 9 tokens, in capture order: BC, EC, bxExp,
    /// bxNum, ChipID, lsData, msData, delVT, crc. All but delVT are bare hex;
    /// delVT is decimal. Control markers are NOT checked here, see
    /// [VFATFrame::marker_faults].
    pub fn from_tokens(tokens: &[&str]) -> Result<VFATFrame, VFATFrameError> {
        if tokens.len() < TOKENS_PER_FRAME {
            return Err(VFATFrameError::Truncated(tokens.len()));
        }

        let mut frame = VFATFrame::default();
        frame.bc = parse_hex_u16(tokens[0])?;
        frame.ec = parse_hex_u16(tokens[1])?;
        frame.bx_exp = parse_hex_u32(tokens[2])?;
        frame.bx_num = parse_hex_u16(tokens[3])?;
        frame.chip_id = parse_hex_u16(tokens[4])?;
        frame.ls_data = parse_hex_u64(tokens[5])?;
        frame.ms_data = parse_hex_u64(tokens[6])?;
        frame.del_vt = parse_f64(tokens[7])?;
        frame.crc = parse_hex_u16(tokens[8])?;

        Ok(frame)
    }

    /// Compare the control nibbles of BC, EC and ChipID against their
    /// expected constants. Every mismatch is reported; none of them stops
    /// the stream.
    pub fn marker_faults(&self) -> Vec<MarkerFault> {
        let mut faults: Vec<MarkerFault> = Vec::new();
        let checks = [
            (FrameField::BunchCrossing, self.bc, EXPECTED_BC_CONTROL),
            (FrameField::EventCounter, self.ec, EXPECTED_EC_CONTROL),
            (FrameField::ChipId, self.chip_id, EXPECTED_CHIPID_CONTROL)
        ];
        for (field, word, expected) in checks {
            let actual = bits::control_nibble(word);
            if actual != expected {
                faults.push(MarkerFault { field, expected, actual });
            }
        }
        faults
    }

    pub fn bc_counter(&self) -> u16 {
        bits::payload12(self.bc)
    }

    pub fn ec_counter(&self) -> u16 {
        bits::ec_counter(self.ec)
    }

    pub fn ec_flags(&self) -> u8 {
        bits::ec_flags(self.ec)
    }

    pub fn chip_id_number(&self) -> u16 {
        bits::payload12(self.chip_id)
    }

    //The reference reader splits this word at the byte boundary, not at
    //the nominal 6+6 bits. Keep that behavior.
    pub fn bx_num_value(&self) -> u8 {
        bits::high_byte(self.bx_num)
    }

    pub fn s_bit(&self) -> u8 {
        bits::low_byte(self.bx_num)
    }

    pub fn channel_hit(&self, channel: usize) -> bool {
        bits::channel_bit(self.ls_data, self.ms_data, channel)
    }

    /// Decoded dump of one frame, for the leading events of a run.
    pub fn describe(&self, event: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Received VFAT data word: event {}", event);
        let _ = writeln!(out, "{:04b} BC     0x{:x}", bits::control_nibble(self.bc), self.bc_counter());
        let _ = writeln!(out, "{:04b} EC     0x{:x}", bits::control_nibble(self.ec), self.ec_counter());
        let _ = writeln!(out, "{:04b} Flags", self.ec_flags());
        let _ = writeln!(out, "{:04b} ChipID 0x{:x}", bits::control_nibble(self.chip_id), self.chip_id_number());
        let _ = writeln!(out, "     bxExp  0x{:04x}", self.bx_exp);
        let _ = writeln!(out, "     bxNum  0x{:02x}", self.bx_num_value());
        let _ = writeln!(out, "     SBit   0x{:02x}", self.s_bit());
        let _ = writeln!(out, " <127:64>:: 0x{:08x}", self.ms_data);
        let _ = writeln!(out, " <63:0>  :: 0x{:08x}", self.ls_data);
        let _ = write!(out, "     crc    0x{:x}", self.crc);
        out
    }
}
