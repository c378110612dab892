use super::bits::pack_field;
use super::constants::*;
use super::error::EventBuilderError;
use super::geb_frame::GebFrame;
use super::vfat_frame::VFATFrame;

/// # EventBuilder
/// EventBuilder takes decoded VFATFrames and composes them into GebFrames.
/// The board is a sliding window: every batch_size-th event the accumulated
/// window is emitted and the oldest batch_size entries are dropped, it is
/// never cleared outright. The board header is repacked on every append so
/// the emitted frame always carries the current zero-suppression flags,
/// chamber id and VFAT count.
#[derive(Debug)]
pub struct EventBuilder {
    board: GebFrame,
    zs_flags: u64,
    chamber_id: u16,
    batch_size: usize,
    events_seen: usize
}

impl EventBuilder {

    /// Create a new EventBuilder. Configuration is threaded in here, there
    /// is no process-wide state.
    pub fn new(chamber_id: u16, batch_size: usize) -> Self {
        EventBuilder {
            board: GebFrame::new(),
            zs_flags: 0,
            chamber_id,
            batch_size,
            events_seen: 0
        }
    }

    /// Append one frame at the given chip slot on the board. The zs flag for
    /// the slot is OR-accumulated into a field that starts zeroed for the
    /// board's lifetime. Returns Some(board) when the append lands on a
    /// batch boundary: the window is emitted as-is, then its oldest
    /// batch_size entries are dropped.
    pub fn append_frame(&mut self, frame: VFATFrame, chip_position: u32) -> Result<Option<GebFrame>, EventBuilderError> {
        if chip_position >= ZS_FLAG_WIDTH {
            return Err(EventBuilderError::BadChipPosition(chip_position));
        }

        let event_index = self.events_seen;
        self.zs_flags |= 1 << (ZS_FLAG_WIDTH - 1 - chip_position);
        self.board.vfats.push(frame);

        //vfat count is the post-append board size, so the header always
        //matches the vfats the frame actually carries
        self.board.header = self.pack_header(self.board.vfats.len())?;

        self.events_seen += 1;

        if event_index % self.batch_size == 0 && event_index != 0 {
            let emitted = self.board.clone();
            self.board.vfats.drain(0..self.batch_size);
            return Ok(Some(emitted));
        }
        Ok(None)
    }

    /// The window left over at a clean end of stream, its header repacked
    /// for the entries that actually remain after the last drain. Not used
    /// after a truncation, so a malformed tail leaves the builder observable
    /// as the last good event defined it.
    pub fn flush_final(&self) -> Option<GebFrame> {
        if self.board.vfats.is_empty() {
            return None;
        }
        let mut board = self.board.clone();
        match self.pack_header(board.vfats.len()) {
            Ok(word) => {
                board.header = word;
                Some(board)
            }
            Err(_) => None
        }
    }

    fn pack_header(&self, vfat_count: usize) -> Result<u64, EventBuilderError> {
        Ok(pack_field(self.zs_flags, ZS_FLAG_WIDTH, ZS_FLAG_SHIFT)?
            | pack_field(self.chamber_id as u64, CHAMBER_ID_WIDTH, CHAMBER_ID_SHIFT)?
            | pack_field(vfat_count as u64, VFAT_COUNT_WIDTH, 0)?)
    }

    pub fn events_seen(&self) -> usize {
        self.events_seen
    }

    pub fn window_len(&self) -> usize {
        self.board.vfats.len()
    }
}
