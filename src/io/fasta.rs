use anyhow::{bail, Result};
use std::io::BufRead;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// 流式 FASTA 读取器，按记录迭代。
/// 忽略空行和以 `;` 开头的注释行，序列中的空白被丢弃。
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    pending_id: Option<String>,
    line_no: usize,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), pending_id: None, line_no: 0 }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        let id = match self.pending_id.take() {
            Some(id) => id,
            None => loop {
                if !self.read_line()? {
                    return Ok(None);
                }
                let t = self.line.trim();
                if t.is_empty() || t.starts_with(';') {
                    continue;
                }
                if !t.starts_with('>') {
                    bail!("line {}: sequence data before the first FASTA header", self.line_no);
                }
                break header_id(t);
            },
        };

        let mut seq = Vec::new();
        while self.read_line()? {
            if self.line.starts_with('>') {
                self.pending_id = Some(header_id(&self.line));
                break;
            }
            if self.line.starts_with(';') {
                continue;
            }
            seq.extend(self.line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
        Ok(Some(FastaRecord { id, seq }))
    }
}

fn header_id(header: &str) -> String {
    header.trim_start_matches('>').split_whitespace().next().unwrap_or("").to_string()
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
