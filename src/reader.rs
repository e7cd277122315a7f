use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;

use crate::header::Header;
use crate::record::{ParserOptions, VcfParser, VcfRecord};

/// Iterates the data lines of a VCF stream.
///
/// The `#` header block is consumed on construction; every following
/// non-blank line is decoded into a [`VcfRecord`]. A line that fails to
/// decode yields an error and iteration can carry on with the next one.
pub struct VcfRecords<R: BufRead> {
    parser: VcfParser,
    /// First data line, read while looking for the end of the header.
    pending: Option<String>,
    line_buf: String,
    line_number: usize,
    inner: R,
}

impl<R: BufRead> VcfRecords<R> {
    pub fn header(&self) -> &Header {
        self.parser.header()
    }

    pub fn parser(&self) -> &VcfParser {
        &self.parser
    }
}

impl VcfRecords<BufReader<Box<dyn Read>>> {
    /// Opens a plain or gzip compressed VCF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let (reader, _format) = niffler::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> VcfRecords<R> {
    pub fn new(reader: R) -> anyhow::Result<Self> {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(mut reader: R, options: ParserOptions) -> anyhow::Result<Self> {
        let mut header = String::new();
        let mut line = String::new();
        let mut line_number = 0;
        let pending = loop {
            line.clear();
            if reader
                .read_line(&mut line)
                .context("failed to read VCF header")?
                == 0
            {
                break None;
            }
            line_number += 1;
            if line.starts_with('#') {
                header.push_str(&line);
            } else if !line.trim().is_empty() {
                break Some(line);
            }
        };
        let parser = VcfParser::with_options(&header, options).context("invalid VCF header")?;

        Ok(Self {
            parser,
            pending,
            line_buf: String::new(),
            line_number,
            inner: reader,
        })
    }

    fn decode(&self, line: &str) -> anyhow::Result<VcfRecord> {
        self.parser
            .parse_line(line)
            .with_context(|| format!("failed to decode line {}", self.line_number))
    }
}

impl<R: BufRead> Iterator for VcfRecords<R> {
    type Item = anyhow::Result<VcfRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.take() {
            return Some(self.decode(&line));
        }
        loop {
            self.line_buf.clear();
            match self.inner.read_line(&mut self.line_buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    if !self.line_buf.trim().is_empty() {
                        return Some(self.decode(&self.line_buf));
                    }
                }
                Err(e) => return Some(Err(e).context("failed to read VCF line")),
            }
        }
    }
}
