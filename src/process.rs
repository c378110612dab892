use super::config::Config;
use super::error::{ProcessorError, ScanFileError};
use super::event_builder::EventBuilder;
use super::frame_writer::FrameWriter;
use super::scan_file::ScanFile;

/// Run one re-write pass: decode the scan stream frame by frame, aggregate
/// into board frames, write every flushed board to the output sink. The
/// pipeline is synchronous and single threaded; the sliding-window flush is
/// order sensitive, so frames are consumed strictly in arrival order.
pub fn process_run(config: &Config) -> Result<(), ProcessorError> {

    let mut scan = ScanFile::new(&config.scan_path)?;
    log::info!("Total scan size: {}", human_bytes::human_bytes(scan.size_bytes() as f64));

    let header = scan.read_header()?;
    log::info!("minTh {} maxTh {} nBins {}", header.min_th, header.max_th, header.bin_count());

    let mut builder = EventBuilder::new(config.chamber_id, config.batch_size);
    let mut writer = FrameWriter::new(&config.out_path, config.output_mode)?;

    let mut boards_written: usize = 0;
    loop {
        let frame = match scan.get_next_frame() {
            Ok(frame) => frame,
            Err(ScanFileError::EndOfFile) => { //Clean end of stream, flush the leftover window
                if let Some(board) = builder.flush_final() {
                    writer.write_board(&board)?;
                    boards_written += 1;
                }
                break;
            }
            Err(ScanFileError::Truncated(n)) => {
                //Fatal to this frame only. No final flush: the builder is
                //left exactly as the last good event defined it.
                log::warn!("Scan stream died mid frame with {} of 9 tokens, stopping here.", n);
                break;
            }
            Err(e) => {
                return Err(ProcessorError::ScanError(e));
            }
        };

        let event = builder.events_seen();

        //Control marker mismatches are diagnostic: report every one of
        //them, then keep the frame.
        for fault in frame.marker_faults() {
            log::warn!("event {}: {}", event, fault);
        }

        if event < config.print_events {
            log::debug!("{}", frame.describe(event));
        }

        let slot = (event % config.batch_size) as u32;
        if let Some(board) = builder.append_frame(frame, slot)? {
            writer.write_board(&board)?;
            boards_written += 1;
        }
    }

    log::info!("The last event is {}", builder.events_seen());
    log::info!("Wrote {} board frames to {}", boards_written, config.out_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_writer::OutputMode;
    use std::io::Write;
    use std::path::PathBuf;

    fn one_frame_tokens(event: usize) -> String {
        format!(
            "a{:03x} c{:02x}0 0000 1f2e edea 8000000000000001 4 {}.5 beef\n",
            event & 0xfff, event & 0xff, event
        )
    }

    fn write_scan(dir: &tempfile::TempDir, n_events: usize) -> PathBuf {
        let path = dir.path().join("scan.dat");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "10 50 2\n").unwrap();
        for event in 0..n_events {
            write!(file, "{}", one_frame_tokens(event)).unwrap();
        }
        path
    }

    fn run_config(dir: &tempfile::TempDir, n_events: usize, mode: OutputMode) -> Config {
        Config {
            scan_path: write_scan(dir, n_events),
            out_path: dir.path().join("rewrite.dat"),
            output_mode: mode,
            batch_size: 3,
            chamber_id: 0xdea,
            print_events: 0
        }
    }

    #[test]
    fn hex_run_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = run_config(&dir, 7, OutputMode::Hex);
        process_run(&config).unwrap();

        let text = std::fs::read_to_string(&config.out_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        //events 0..=6, k=3: boards of 4 flushed at indices 3 and 6, then a
        //final window of 1; each board is 2 framing words + 6 lines per vfat
        assert_eq!(lines.len(), 26 + 26 + 8);

        //first board header: zs flags e00000, chamber dea, 4 vfats
        assert_eq!(lines[0], "e00000dea0000004");
        //its first vfat starts with event 0's BC word
        assert_eq!(lines[1], "a000");
        //and the trailer word is untouched bookkeeping
        assert_eq!(lines[25], "0");
        //the final window holds the one leftover event, header repacked
        assert_eq!(lines[52], "e00000dea0000001");
    }

    #[test]
    fn binary_run_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = run_config(&dir, 7, OutputMode::Binary);
        process_run(&config).unwrap();

        let bytes = std::fs::read(&config.out_path).unwrap();
        //two boards of 4 vfats plus the final window of 1, each framed by
        //8-byte header and trailer words
        assert_eq!(bytes.len(), (16 + 4 * 24) + (16 + 4 * 24) + (16 + 24));
        //first header word, big endian: e00000 | dea | 4
        assert_eq!(&bytes[0..8], &0xe00000dea0000004u64.to_be_bytes());
    }

    #[test]
    fn truncated_tail_stops_without_final_flush() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = run_config(&dir, 2, OutputMode::Hex);
        //append a partial frame to the scan file
        let mut file = std::fs::OpenOptions::new().append(true).open(&config.scan_path).unwrap();
        write!(file, "a003 c030\n").unwrap();
        drop(file);
        config.out_path = dir.path().join("truncated.dat");

        process_run(&config).unwrap();

        //2 whole events, no batch boundary reached, no final flush after
        //the truncation: nothing may be written
        assert!(!config.out_path.exists() || std::fs::read(&config.out_path).unwrap().is_empty());
    }

    #[test]
    fn missing_scan_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            scan_path: dir.path().join("nope.dat"),
            out_path: dir.path().join("rewrite.dat"),
            output_mode: OutputMode::Hex,
            batch_size: 3,
            chamber_id: 0xdea,
            print_events: 0
        };
        assert!(matches!(process_run(&config), Err(ProcessorError::ScanError(_))));
    }
}
