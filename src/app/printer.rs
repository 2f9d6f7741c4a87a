use crate::domain::model::TableRows;
use crate::utils::error::Result;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
}

/// Writes command output to stdout (or any writer).
pub struct Printer {
    out: Box<dyn Write>,
    format: OutputFormat,
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer").field("format", &self.format).finish()
    }
}

impl Printer {
    pub fn new(out: Box<dyn Write>, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    /// Printer backed by an in-memory buffer, read back through the handle.
    pub fn captured(format: OutputFormat) -> (Self, CapturedOutput) {
        let output = CapturedOutput::default();
        (Self::new(Box::new(output.clone()), format), output)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn display(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// 第一列當表頭
    pub fn print_table(&mut self, rows: &TableRows) -> Result<()> {
        match self.format {
            OutputFormat::Table => self.write_aligned(rows)?,
            OutputFormat::Csv => {
                let mut writer = csv::WriterBuilder::new()
                    .flexible(true)
                    .from_writer(&mut self.out);
                for row in rows {
                    writer.write_record(row)?;
                }
                writer.flush()?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_aligned(&mut self, rows: &TableRows) -> Result<()> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        for (index, row) in rows.iter().enumerate() {
            let line = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", cell, width = *width)
                })
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(self.out, "{}", line.trim_end())?;

            if index == 0 {
                let separator = widths
                    .iter()
                    .map(|width| "-".repeat(*width))
                    .collect::<Vec<_>>()
                    .join("-+-");
                writeln!(self.out, "{}", separator)?;
            }
        }
        Ok(())
    }
}

/// Shared buffer handed out by [`Printer::captured`].
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
