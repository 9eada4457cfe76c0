use serde::{Deserialize, Serialize};

use crate::util::dna;

/// 某个位置左侧的上下文：序列起点，或者前一个位置上的编码字符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftContext {
    SequenceStart,
    Symbol(u8),
}

/// 编码序列的只读访问接口。
pub trait SequenceAccess {
    /// 返回 `pos` 左侧紧邻的字符；`pos == 0` 时为 [`LeftContext::SequenceStart`]。
    fn symbol_before(&self, pos: u32) -> LeftContext;

    /// 文本总长度（含分隔符）
    fn total_len(&self) -> u32;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub len: u32,
    pub offset: u32,
}

/// 以字节存储的编码序列。多条记录之间插入 [`dna::SEPARATOR`]，末尾不加。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EncodedSeq {
    codes: Vec<u8>,
    contigs: Vec<Contig>,
}

impl EncodedSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单条序列，contig 名为 `seq`
    pub fn from_seq(seq: &[u8]) -> Self {
        let mut es = Self::new();
        es.push_record("seq", seq);
        es
    }

    pub fn push_record(&mut self, name: &str, seq: &[u8]) {
        if !self.contigs.is_empty() {
            self.codes.push(dna::SEPARATOR);
        }
        let offset = self.codes.len() as u32;
        self.codes.extend(seq.iter().map(|&b| dna::encode(b)));
        self.contigs.push(Contig { name: name.to_string(), len: seq.len() as u32, offset });
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// 将文本位置映射到 (contig_index, contig_offset)。若落在分隔符位置，则返回 None。
    pub fn map_text_pos(&self, pos: u32) -> Option<(usize, u32)> {
        locate(&self.contigs, pos)
    }
}

/// 在按偏移升序排列的 contig 表中二分查找 `pos`
pub fn locate(contigs: &[Contig], pos: u32) -> Option<(usize, u32)> {
    let idx = contigs.partition_point(|c| c.offset + c.len <= pos);
    let c = contigs.get(idx)?;
    if pos < c.offset {
        return None;
    }
    Some((idx, pos - c.offset))
}

impl SequenceAccess for EncodedSeq {
    #[inline]
    fn symbol_before(&self, pos: u32) -> LeftContext {
        if pos == 0 {
            LeftContext::SequenceStart
        } else {
            LeftContext::Symbol(self.codes[pos as usize - 1])
        }
    }

    fn total_len(&self) -> u32 {
        self.codes.len() as u32
    }
}
