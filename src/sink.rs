use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;

/// A row with a fixed column layout.
pub trait TabularRow {
    fn header() -> &'static [&'static str];
    fn record(&self) -> Vec<String>;
}

/// Scoped CSV writer: the header is written and flushed on open, rows are
/// appended in call order. Dropping the sink flushes whatever is buffered,
/// so an aborted run still leaves the header plus complete rows.
pub struct TabularSink<W: Write> {
    writer: csv::Writer<W>,
    columns: usize,
    rows_written: u64,
}

impl TabularSink<File> {
    pub fn create(path: &Path, header: &[&str]) -> Result<Self, AppError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        Self::from_writer(file, header)
    }

    pub fn create_for<R: TabularRow>(path: &Path) -> Result<Self, AppError> {
        Self::create(path, R::header())
    }
}

impl<W: Write> TabularSink<W> {
    pub fn from_writer(inner: W, header: &[&str]) -> Result<Self, AppError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(header)?;
        writer.flush()?;
        Ok(Self {
            writer,
            columns: header.len(),
            rows_written: 0,
        })
    }

    pub fn write_row<R: TabularRow>(&mut self, row: &R) -> Result<(), AppError> {
        let record = row.record();
        debug_assert_eq!(record.len(), self.columns, "row width must match header");
        self.writer.write_record(&record)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Append every row from the iterator; returns how many were written.
    pub fn write_rows<R, I>(&mut self, rows: I) -> Result<u64, AppError>
    where
        R: TabularRow,
        I: IntoIterator<Item = R>,
    {
        let mut n = 0;
        for row in rows {
            self.write_row(&row)?;
            n += 1;
        }
        Ok(n)
    }

    pub fn flush(&mut self) -> Result<(), AppError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W, AppError> {
        self.writer
            .into_inner()
            .map_err(|e| AppError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, u32);

    impl TabularRow for Pair {
        fn header() -> &'static [&'static str] {
            &["name", "n"]
        }

        fn record(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn header_only_when_no_rows() {
        let sink = TabularSink::from_writer(Vec::new(), Pair::header()).unwrap();
        let bytes = sink.finish().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "name,n\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut sink = TabularSink::from_writer(Vec::new(), Pair::header()).unwrap();
        sink.write_row(&Pair("Roche Holding AG, Genussscheine", 1)).unwrap();
        assert_eq!(sink.rows_written(), 1);
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(out, "name,n\n\"Roche Holding AG, Genussscheine\",1\n");
    }
}
