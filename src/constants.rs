
//Expected control nibbles in the top 4 bits of the 16-bit tracking words
pub const EXPECTED_BC_CONTROL: u8 = 0b1010;
pub const EXPECTED_EC_CONTROL: u8 = 0b1100;
pub const EXPECTED_CHIPID_CONTROL: u8 = 0b1110;

//Token layout of one captured frame
pub const TOKENS_PER_FRAME: usize = 9;

//GEB header field packing: ZSFlag:24 ChamID:12 VFATCount:28, msb first
pub const ZS_FLAG_WIDTH: u32 = 24;
pub const ZS_FLAG_SHIFT: u32 = 40;
pub const CHAMBER_ID_WIDTH: u32 = 12;
pub const CHAMBER_ID_SHIFT: u32 = 28;
pub const VFAT_COUNT_WIDTH: u32 = 28;

//Electronics constants
pub const NUMBER_OF_CHANNELS: usize = 128;

//Binary record sizes: BC, EC, ChipID, lsData, msData, crc
pub const VFAT_BINARY_SIZE: usize = 2 + 2 + 2 + 8 + 8 + 2;
pub const GEB_WORD_SIZE: usize = 8;
