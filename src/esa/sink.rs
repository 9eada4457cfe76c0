use std::io::Write;

use crate::error::EsaError;
use crate::index::encseq::{locate, Contig};

/// 极大对的接收端。返回错误会终止整个遍历。
pub trait PairSink {
    fn emit(&mut self, len: u32, pos1: u32, pos2: u32) -> Result<(), EsaError>;
}

impl<F> PairSink for F
where
    F: FnMut(u32, u32, u32) -> Result<(), EsaError>,
{
    fn emit(&mut self, len: u32, pos1: u32, pos2: u32) -> Result<(), EsaError> {
        self(len, pos1, pos2)
    }
}

/// 一个极大对：两个后缀起点及其最长公共前缀长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxPair {
    pub len: u32,
    pub pos1: u32,
    pub pos2: u32,
}

/// 把所有结果收集到内存
#[derive(Debug, Default)]
pub struct PairCollector {
    pub pairs: Vec<MaxPair>,
}

impl PairCollector {
    /// 按长度降序、位置升序排列
    pub fn sort(&mut self) {
        self.pairs.sort_by(|a, b| {
            b.len
                .cmp(&a.len)
                .then(a.pos1.cmp(&b.pos1))
                .then(a.pos2.cmp(&b.pos2))
        });
    }
}

impl PairSink for PairCollector {
    fn emit(&mut self, len: u32, pos1: u32, pos2: u32) -> Result<(), EsaError> {
        self.pairs.try_reserve(1)?;
        self.pairs.push(MaxPair { len, pos1, pos2 });
        Ok(())
    }
}

/// 以制表符分隔的文本逐行写出极大对。
///
/// 默认输出 `len pos1 pos2`（0-based 文本坐标）；给定 contig 表时输出
/// `len name1 pos1 name2 pos2`，坐标为 contig 内的 1-based 偏移。
pub struct PairWriter<'c, W: Write> {
    out: W,
    contigs: Option<&'c [Contig]>,
    written: u64,
}

impl<'c, W: Write> PairWriter<'c, W> {
    pub fn new(out: W) -> Self {
        Self { out, contigs: None, written: 0 }
    }

    pub fn with_contigs(out: W, contigs: &'c [Contig]) -> Self {
        Self { out, contigs: Some(contigs), written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_pair(&mut self, len: u32, pos1: u32, pos2: u32) -> std::io::Result<()> {
        match self.contigs {
            None => writeln!(self.out, "{}\t{}\t{}", len, pos1, pos2),
            Some(contigs) => {
                let (n1, o1) = contig_coord(contigs, pos1);
                let (n2, o2) = contig_coord(contigs, pos2);
                writeln!(self.out, "{}\t{}\t{}\t{}\t{}", len, n1, o1, n2, o2)
            }
        }
    }
}

// 分隔符上的位置（仅 min_len = 0 时可能出现）记为 `*`、0
fn contig_coord(contigs: &[Contig], pos: u32) -> (&str, u32) {
    match locate(contigs, pos) {
        Some((ci, off)) => (contigs[ci].name.as_str(), off + 1),
        None => ("*", 0),
    }
}

impl<W: Write> PairSink for PairWriter<'_, W> {
    fn emit(&mut self, len: u32, pos1: u32, pos2: u32) -> Result<(), EsaError> {
        self.write_pair(len, pos1, pos2).map_err(EsaError::sink)?;
        self.written += 1;
        Ok(())
    }
}
