//! Markdown assembly of crawl records
//!
//! The document is a `# Root URL:` title followed by one `##` section per
//! record, in the order the records arrive. The streaming assembler and the
//! in-memory [`assemble`] share the same fragment renderers, so both produce
//! identical bytes for identical records.

use crate::results::{CrawlRecord, Document};
use std::io::{self, Write};

/// Renders the document title
pub fn render_header(root_url: &str) -> String {
    format!("# Root URL: {}\n\n", root_url)
}

/// Renders the section for one record
pub fn render_section(record: &CrawlRecord) -> String {
    format!("## {}\n{}\n\n", record.url, record.content)
}

/// Builds a whole document in memory
pub fn assemble<'a, I>(root_url: &str, records: I) -> Document
where
    I: IntoIterator<Item = &'a CrawlRecord>,
{
    let document = records
        .into_iter()
        .fold(render_header(root_url), |mut text, record| {
            text.push_str(&render_section(record));
            text
        });
    Document::from(document)
}

/// Writes a document section by section as records arrive
pub struct DocumentAssembler<W: Write> {
    writer: W,
    sections: usize,
}

impl<W: Write> DocumentAssembler<W> {
    /// Starts a document by writing its title
    pub fn begin(mut writer: W, root_url: &str) -> io::Result<Self> {
        let header = render_header(root_url);
        writer.write_all(header.as_bytes())?;

        Ok(Self {
            writer,
            sections: 0,
        })
    }

    /// Appends the section for one record
    pub fn append(&mut self, record: &CrawlRecord) -> io::Result<()> {
        let section = render_section(record);
        self.writer.write_all(section.as_bytes())?;
        self.sections += 1;
        Ok(())
    }

    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Flushes the document and hands back the writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl DocumentAssembler<Vec<u8>> {
    /// Starts a document held in memory
    pub fn in_memory(root_url: &str) -> Self {
        let header = render_header(root_url);
        Self {
            writer: header.into_bytes(),
            sections: 0,
        }
    }

    pub fn into_document(self) -> Document {
        Document::from_bytes(self.writer)
    }
}
