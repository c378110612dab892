use super::constants::*;
use super::vfat_frame::VFATFrame;

/// # GebFrame
/// One physical readout board's aggregate for a batch of triggers. The
/// header packs ZSFlag:24 | ChamID:12 | VFATCount:28, most significant
/// field first. The trailer packs OHcrc:16 | OHwCount:16 | ChamStatus:16,
/// bookkeeping that is carried through unmodified, never recomputed.
#[derive(Debug, Clone, Default)]
pub struct GebFrame {
    pub header: u64,
    pub vfats: Vec<VFATFrame>,
    pub trailer: u64
}

impl GebFrame {

    pub fn new() -> GebFrame {
        GebFrame { header: 0, vfats: Vec::new(), trailer: 0 }
    }

    pub fn zs_flags(&self) -> u32 {
        ((self.header >> ZS_FLAG_SHIFT) & ((1 << ZS_FLAG_WIDTH) - 1)) as u32
    }

    pub fn chamber_id(&self) -> u16 {
        ((self.header >> CHAMBER_ID_SHIFT) & ((1 << CHAMBER_ID_WIDTH) - 1)) as u16
    }

    pub fn vfat_count(&self) -> u32 {
        (self.header & ((1 << VFAT_COUNT_WIDTH) - 1)) as u32
    }

    pub fn board_crc(&self) -> u16 {
        ((self.trailer >> 32) & 0xffff) as u16
    }

    pub fn word_count(&self) -> u16 {
        ((self.trailer >> 16) & 0xffff) as u16
    }

    pub fn board_status(&self) -> u16 {
        (self.trailer & 0xffff) as u16
    }
}

/// # GemFrame
/// The optical-link envelope aggregating several boards. All five 64-bit
/// words (AMC number, level-1 id, bunch crossing id, data length, board id,
/// DAV list, format version, event status, error flags, crc) are opaque at
/// this layer and pass through unmodified. Modeled for link-level captures;
/// single-board runs never build one.
#[derive(Debug, Clone, Default)]
pub struct GemFrame {
    pub header1: u64,
    pub header2: u64,
    pub header3: u64,
    pub gebs: Vec<GebFrame>,
    pub trailer2: u64,
    pub trailer1: u64
}

impl GemFrame {

    pub fn new() -> GemFrame {
        GemFrame { header1: 0, header2: 0, header3: 0, gebs: Vec::new(), trailer2: 0, trailer1: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::pack_field;

    #[test]
    fn header_fields_unpack() {
        let mut geb = GebFrame::new();
        geb.header = pack_field(0x800001, ZS_FLAG_WIDTH, ZS_FLAG_SHIFT).unwrap()
            | pack_field(0xdea, CHAMBER_ID_WIDTH, CHAMBER_ID_SHIFT).unwrap()
            | pack_field(7, VFAT_COUNT_WIDTH, 0).unwrap();
        assert_eq!(geb.zs_flags(), 0x800001);
        assert_eq!(geb.chamber_id(), 0xdea);
        assert_eq!(geb.vfat_count(), 7);
    }

    #[test]
    fn trailer_fields_unpack() {
        let mut geb = GebFrame::new();
        geb.trailer = (0xabcd << 32) | (0x0102 << 16) | 0x0003;
        assert_eq!(geb.board_crc(), 0xabcd);
        assert_eq!(geb.word_count(), 0x0102);
        assert_eq!(geb.board_status(), 0x0003);
    }
}
