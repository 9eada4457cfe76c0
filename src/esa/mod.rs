pub mod dfs;
pub mod maxpairs;
pub mod sink;

use std::io::Write;

pub use dfs::{depth_first_esa, DfsStats, DfsVisitor, SuffixLcp, SuffixLcpSource};
pub use maxpairs::{enumerate_maximal_pairs, MaxPairsStats};
pub use sink::{MaxPair, PairCollector, PairSink, PairWriter};

use crate::error::EsaError;
use crate::index::esa::EnhancedSuffixArray;
use crate::util::dna;

#[derive(Debug, Clone, Copy)]
pub struct MaxPairsOpt {
    /// 最短匹配长度
    pub min_len: u32,
    /// 以 contig 名称 + 1-based 偏移输出
    pub contig_coords: bool,
}

impl Default for MaxPairsOpt {
    fn default() -> Self {
        Self { min_len: 20, contig_coords: false }
    }
}

/// 在 DNA 索引上枚举极大对并逐行写入 `out`
pub fn write_maxpairs<W: Write>(
    esa: &EnhancedSuffixArray,
    out: W,
    opt: MaxPairsOpt,
) -> Result<MaxPairsStats, EsaError> {
    let mut writer = if opt.contig_coords {
        PairWriter::with_contigs(out, esa.contigs())
    } else {
        PairWriter::new(out)
    };
    let stats = enumerate_maximal_pairs(&mut esa.reader(), &esa.seq, dna::ALPHABET_SIZE, opt.min_len, &mut writer)?;
    writer.finish().map_err(EsaError::sink)?;
    Ok(stats)
}
