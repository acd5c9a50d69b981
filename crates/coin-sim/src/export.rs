use std::io::{self, Write};

use crate::journal::{FlipJournal, FlipLogEvent, FlipLogEventKind};
use crate::state::SeriesPoint;

pub const SERIES_CSV_HEADER: &str = "flip,amount,outcome\n";

/// Writes the plotted series as CSV: one row per point, the seed row with
/// an empty outcome column.
pub struct SeriesCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> SeriesCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(SERIES_CSV_HEADER.as_bytes())
    }

    pub fn write_header_and_log(
        &mut self,
        flip: u64,
        journal: &mut dyn FlipJournal,
    ) -> io::Result<()> {
        self.write_header()?;
        self.writer.flush()?;
        journal.write(FlipLogEvent::new(flip, FlipLogEventKind::ExportWritten, None));
        Ok(())
    }

    pub fn append_series(&mut self, points: &[SeriesPoint]) -> io::Result<()> {
        for point in points {
            writeln!(
                self.writer,
                "{},{},{}",
                point.index,
                point.amount,
                point.outcome.unwrap_or("")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, io, rc::Rc};

    use crate::coin::{FixedCoin, ScriptedCoin};
    use crate::config::EngineConfig;
    use crate::journal::{FlipJournal, FlipLogEvent, FlipLogEventKind, InMemoryFlipJournal};
    use crate::sim::Simulation;

    use super::{SeriesCsvWriter, SERIES_CSV_HEADER};

    struct TrackingWriter {
        bytes: Vec<u8>,
        flush_called: Rc<Cell<bool>>,
        flush_fails: bool,
    }

    impl TrackingWriter {
        fn new(flush_called: Rc<Cell<bool>>, flush_fails: bool) -> Self {
            Self {
                bytes: Vec::new(),
                flush_called,
                flush_fails,
            }
        }
    }

    impl io::Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flush_called.set(true);
            if self.flush_fails {
                return Err(io::Error::other("flush failed"));
            }
            Ok(())
        }
    }

    struct FlushAssertingJournal {
        flush_called: Rc<Cell<bool>>,
    }

    impl FlipJournal for FlushAssertingJournal {
        fn write(&mut self, _event: FlipLogEvent) {
            assert!(
                self.flush_called.get(),
                "expected writer flush before journaling"
            );
        }
    }

    #[test]
    fn write_header_and_log_flushes_before_journaling() {
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), false);
        let mut csv_writer = SeriesCsvWriter::new(writer);
        let mut journal = FlushAssertingJournal { flush_called };

        csv_writer
            .write_header_and_log(7, &mut journal)
            .expect("header write should flush and journal");
    }

    #[test]
    fn write_header_and_log_propagates_flush_errors() {
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), true);
        let mut csv_writer = SeriesCsvWriter::new(writer);
        let mut journal = InMemoryFlipJournal::new();

        let err = csv_writer
            .write_header_and_log(3, &mut journal)
            .expect_err("flush failure should be returned");

        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(journal.events().len(), 0);
    }

    #[test]
    fn write_header_and_log_records_the_caller_flip_index() {
        let mut output = Vec::new();
        let mut csv_writer = SeriesCsvWriter::new(&mut output);
        let mut journal = InMemoryFlipJournal::new();

        csv_writer
            .write_header_and_log(42, &mut journal)
            .expect("header and log write should succeed");

        assert_eq!(String::from_utf8(output).unwrap(), SERIES_CSV_HEADER);
        assert_eq!(journal.events().len(), 1);
        assert_eq!(journal.events()[0].flip, 42);
        assert_eq!(journal.events()[0].kind, FlipLogEventKind::ExportWritten);
    }

    #[test]
    fn exported_series_matches_golden_win_only_session() {
        let mut sim = Simulation::new(EngineConfig::default()).unwrap();
        let mut coin = FixedCoin(true);
        sim.flip(1.0, &mut coin).unwrap();
        sim.flip(1.0, &mut coin).unwrap();

        let mut output = Vec::new();
        let mut csv_writer = SeriesCsvWriter::new(&mut output);
        csv_writer.write_header().unwrap();
        csv_writer.append_series(&sim.state().series).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("{SERIES_CSV_HEADER}0,100,\n1,200,Heads\n2,400,Heads\n")
        );
    }

    #[test]
    fn exported_series_labels_losses_as_tails() {
        let mut sim = Simulation::new(EngineConfig::default()).unwrap();
        let mut coin = ScriptedCoin::new([false]);
        sim.flip(0.5, &mut coin).unwrap();

        let mut output = Vec::new();
        let mut csv_writer = SeriesCsvWriter::new(&mut output);
        csv_writer.write_header().unwrap();
        csv_writer.append_series(&sim.state().series).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("{SERIES_CSV_HEADER}0,100,\n1,80,Tails\n")
        );
    }
}
