use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::encseq::{Contig, EncodedSeq};
use super::{lcp, sa};
use crate::error::EsaError;
use crate::esa::dfs::{SuffixLcp, SuffixLcpSource};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 增强后缀数组：编码文本 + 完整 SA + LCP。
#[derive(Debug, Serialize, Deserialize)]
pub struct EnhancedSuffixArray {
    pub seq: EncodedSeq,
    pub sa: Vec<u32>,
    /// lcp[r] = 排名 r-1 与 r 的后缀的最长公共前缀（不跨越特殊字符）
    pub lcp: Vec<u32>,
    pub meta: IndexMeta,
}

impl EnhancedSuffixArray {
    pub fn build(seq: EncodedSeq) -> Self {
        let sa = sa::build_sa(seq.codes());
        let lcp = lcp::build_lcp(seq.codes(), &sa);
        Self { seq, sa, lcp, meta: IndexMeta::default() }
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    pub fn contigs(&self) -> &[Contig] {
        self.seq.contigs()
    }

    pub fn max_lcp(&self) -> u32 {
        self.lcp.iter().copied().max().unwrap_or(0)
    }

    /// 按排名顺序读出 (suffix, lcp)
    pub fn reader(&self) -> EsaReader<'_> {
        EsaReader { sa: &self.sa, lcp: &self.lcp, next: 0 }
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let esa: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        let n = esa.seq.len();
        if esa.sa.len() != n || esa.lcp.len() != n {
            bail!(
                "index '{}' is inconsistent: text={}, sa={}, lcp={}",
                path,
                n,
                esa.sa.len(),
                esa.lcp.len()
            );
        }
        Ok(esa)
    }
}

/// 顺序读取增强后缀数组的游标
pub struct EsaReader<'a> {
    sa: &'a [u32],
    lcp: &'a [u32],
    next: usize,
}

impl SuffixLcpSource for EsaReader<'_> {
    fn next_entry(&mut self) -> Result<Option<SuffixLcp>, EsaError> {
        let r = self.next;
        let Some(&suffix) = self.sa.get(r) else {
            return Ok(None);
        };
        let lcp = *self
            .lcp
            .get(r)
            .ok_or_else(|| EsaError::CorruptSource(format!("lcp table ends before rank {}", r)))?;
        self.next += 1;
        Ok(Some(SuffixLcp { suffix, lcp }))
    }
}
