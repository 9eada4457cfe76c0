//! 极大重复对枚举。
//!
//! 对长度至少为 `min_len` 的每一对左极大匹配 `(i, j)`，在它们的最低公共祖先
//! lcp 区间处恰好输出一次。每个节点按左侧字符把已访问的叶子分桶，桶以
//! `(start, len)` 的形式指向共享的位置表；子节点的位置总是紧贴在父节点已有位置
//! 之后追加，所以合并子节点只需要累加长度。

use log::debug;

use super::dfs::{depth_first_esa, DfsVisitor, SuffixLcpSource};
use super::sink::PairSink;
use crate::error::EsaError;
use crate::index::encseq::{LeftContext, SequenceAccess};

/// 位置表中的一段 `[start, start + len)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ListRange {
    start: usize,
    len: usize,
}

impl ListRange {
    fn end(self) -> usize {
        self.start + self.len
    }
}

/// 左侧字符的分类：字母表内的字符，或者唯一（序列起点、通配符、分隔符）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeftClass {
    Symbol(u8),
    Unique,
}

/// 节点下所有已处理位置的公共左侧字符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommonChar {
    Uniform(u8),
    Unique,
    LeftDiverse,
}

impl CommonChar {
    /// 唯一位置与任何位置（包括另一个唯一位置）都视为左分歧
    fn merged(self, other: CommonChar) -> CommonChar {
        match (self, other) {
            (CommonChar::Uniform(a), CommonChar::Uniform(b)) if a == b => self,
            _ => CommonChar::LeftDiverse,
        }
    }
}

impl From<LeftClass> for CommonChar {
    fn from(class: LeftClass) -> Self {
        match class {
            LeftClass::Symbol(c) => CommonChar::Uniform(c),
            LeftClass::Unique => CommonChar::Unique,
        }
    }
}

/// lcp 区间树中一个存活节点的状态
#[derive(Debug)]
pub struct NodeInfo {
    common: CommonChar,
    unique: ListRange,
    buckets: Vec<ListRange>,
}

impl NodeInfo {
    fn new(alphabet_size: u8) -> Self {
        Self {
            common: CommonChar::Unique,
            unique: ListRange::default(),
            buckets: vec![ListRange::default(); alphabet_size as usize],
        }
    }

    /// 所有范围从位置表当前末尾开始
    fn open_at(&mut self, arena: &PosArena) {
        self.unique = ListRange { start: arena.unique.len(), len: 0 };
        for (r, list) in self.buckets.iter_mut().zip(&arena.lists) {
            *r = ListRange { start: list.len(), len: 0 };
        }
    }

    fn absorb(&mut self, son: &NodeInfo) {
        debug_assert!(self.buckets.iter().zip(&son.buckets).all(|(f, s)| f.end() == s.start || s.len == 0));
        for (f, s) in self.buckets.iter_mut().zip(&son.buckets) {
            f.len += s.len;
        }
        self.unique.len += son.unique.len;
    }
}

/// 每个字符一张只追加的位置表，外加一张唯一位置表
struct PosArena {
    lists: Vec<Vec<u32>>,
    unique: Vec<u32>,
    clear: bool,
}

impl PosArena {
    fn new(alphabet_size: u8) -> Self {
        Self { lists: vec![Vec::new(); alphabet_size as usize], unique: Vec::new(), clear: true }
    }

    /// 仅截断长度；已经为空时什么都不做
    fn reset(&mut self) {
        if !self.clear {
            for list in &mut self.lists {
                list.clear();
            }
            self.unique.clear();
            self.clear = true;
        }
    }

    fn push(&mut self, node: &mut NodeInfo, class: LeftClass, pos: u32) -> Result<(), EsaError> {
        let (list, range) = match class {
            LeftClass::Symbol(c) => (&mut self.lists[c as usize], &mut node.buckets[c as usize]),
            LeftClass::Unique => (&mut self.unique, &mut node.unique),
        };
        list.try_reserve(1)?;
        list.push(pos);
        range.len += 1;
        Ok(())
    }

    fn bucket(&self, c: usize, node: &NodeInfo) -> &[u32] {
        let r = node.buckets[c];
        &self.lists[c][r.start..r.end()]
    }

    fn uniques(&self, node: &NodeInfo) -> &[u32] {
        &self.unique[node.unique.start..node.unique.end()]
    }
}

struct PairOut<'k, K: ?Sized> {
    sink: &'k mut K,
    pairs: u64,
}

impl<K: PairSink + ?Sized> PairOut<'_, K> {
    /// 统一按 `pos1 < pos2` 输出
    fn pair(&mut self, len: u32, a: u32, b: u32) -> Result<(), EsaError> {
        let (pos1, pos2) = if a < b { (a, b) } else { (b, a) };
        self.sink.emit(len, pos1, pos2)?;
        self.pairs += 1;
        Ok(())
    }

    fn one_to_many(&mut self, len: u32, p: u32, others: &[u32]) -> Result<(), EsaError> {
        for &q in others {
            self.pair(len, p, q)?;
        }
        Ok(())
    }

    fn cross(&mut self, len: u32, xs: &[u32], ys: &[u32]) -> Result<(), EsaError> {
        if ys.is_empty() {
            return Ok(());
        }
        for &x in xs {
            self.one_to_many(len, x, ys)?;
        }
        Ok(())
    }
}

/// 极大对枚举的全局状态，作为 [`DfsVisitor`] 驱动
struct MaxPairs<'a, A: ?Sized, K: ?Sized> {
    alphabet_size: u8,
    min_len: u32,
    seq: &'a A,
    arena: PosArena,
    out: PairOut<'a, K>,
    spare: Vec<NodeInfo>,
}

impl<'a, A, K> MaxPairs<'a, A, K>
where
    A: SequenceAccess + ?Sized,
    K: PairSink + ?Sized,
{
    fn new(seq: &'a A, alphabet_size: u8, min_len: u32, sink: &'a mut K) -> Self {
        Self {
            alphabet_size,
            min_len,
            seq,
            arena: PosArena::new(alphabet_size),
            out: PairOut { sink, pairs: 0 },
            spare: Vec::new(),
        }
    }

    fn left_class(&self, pos: u32) -> Result<LeftClass, EsaError> {
        if pos >= self.seq.total_len() {
            return Err(EsaError::CorruptSource(format!(
                "suffix {} beyond text length {}",
                pos,
                self.seq.total_len()
            )));
        }
        Ok(match self.seq.symbol_before(pos) {
            LeftContext::Symbol(c) if c < self.alphabet_size => LeftClass::Symbol(c),
            LeftContext::Symbol(_) | LeftContext::SequenceStart => LeftClass::Unique,
        })
    }
}

impl<A, K> DfsVisitor for MaxPairs<'_, A, K>
where
    A: SequenceAccess + ?Sized,
    K: PairSink + ?Sized,
{
    type Node = NodeInfo;

    fn on_node_enter(&mut self) -> Result<NodeInfo, EsaError> {
        Ok(self.spare.pop().unwrap_or_else(|| NodeInfo::new(self.alphabet_size)))
    }

    fn on_leaf(
        &mut self,
        first_child: bool,
        father_depth: u32,
        father: &mut NodeInfo,
        leaf: u32,
    ) -> Result<(), EsaError> {
        if father_depth < self.min_len {
            self.arena.reset();
            return Ok(());
        }
        let class = self.left_class(leaf)?;
        self.arena.clear = false;
        if first_child {
            father.common = class.into();
            father.open_at(&self.arena);
            return self.arena.push(father, class, leaf);
        }

        father.common = father.common.merged(class.into());
        if father.common == CommonChar::LeftDiverse {
            for c in 0..self.alphabet_size {
                if class != LeftClass::Symbol(c) {
                    self.out.one_to_many(father_depth, leaf, self.arena.bucket(c as usize, father))?;
                }
            }
            self.out.one_to_many(father_depth, leaf, self.arena.uniques(father))?;
        }
        self.arena.push(father, class, leaf)
    }

    fn on_branch(
        &mut self,
        first_child: bool,
        father_depth: u32,
        father: &mut NodeInfo,
        son: &mut NodeInfo,
    ) -> Result<(), EsaError> {
        if father_depth < self.min_len {
            self.arena.reset();
            return Ok(());
        }
        self.arena.clear = false;
        if first_child {
            // 父节点直接接管第一个子节点的状态
            std::mem::swap(father, son);
            return Ok(());
        }

        father.common = father.common.merged(son.common);
        if father.common == CommonChar::LeftDiverse {
            let sigma = self.alphabet_size as usize;
            let son_unique = self.arena.uniques(son);
            for cf in 0..sigma {
                let fs = self.arena.bucket(cf, father);
                if fs.is_empty() {
                    continue;
                }
                for cs in (0..sigma).filter(|&cs| cs != cf) {
                    self.out.cross(father_depth, fs, self.arena.bucket(cs, son))?;
                }
                self.out.cross(father_depth, fs, son_unique)?;
            }
            let father_unique = self.arena.uniques(father);
            for cs in 0..sigma {
                self.out.cross(father_depth, father_unique, self.arena.bucket(cs, son))?;
            }
            self.out.cross(father_depth, father_unique, son_unique)?;
        }
        father.absorb(son);
        Ok(())
    }

    fn on_node_exit(&mut self, node: NodeInfo) -> Result<(), EsaError> {
        self.spare.push(node);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxPairsStats {
    pub pairs: u64,
    pub leaves: u64,
    pub internal_nodes: u64,
}

/// 枚举所有长度至少为 `min_len` 的左极大重复对。
///
/// 每个无序对只输出一次，形式为 `(len, pos1, pos2)` 且 `pos1 < pos2`，`len` 为两后缀
/// 真实的最长公共前缀。序列起点以及编码不小于 `alphabet_size` 的左侧字符（通配符、
/// 分隔符）与任何位置都视为左分歧。sink 或数据源出错时立即返回该错误。
pub fn enumerate_maximal_pairs<S, A, K>(
    source: &mut S,
    seq: &A,
    alphabet_size: u8,
    min_len: u32,
    sink: &mut K,
) -> Result<MaxPairsStats, EsaError>
where
    S: SuffixLcpSource + ?Sized,
    A: SequenceAccess + ?Sized,
    K: PairSink + ?Sized,
{
    let mut state = MaxPairs::new(seq, alphabet_size, min_len, sink);
    let dfs = depth_first_esa(source, &mut state)?;
    let stats = MaxPairsStats {
        pairs: state.out.pairs,
        leaves: dfs.leaves,
        internal_nodes: dfs.internal_nodes,
    };
    debug!("maxpairs (min_len={}): {} pairs", min_len, stats.pairs);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esa::sink::PairCollector;
    use crate::index::encseq::EncodedSeq;
    use crate::index::esa::EnhancedSuffixArray;
    use crate::util::dna;

    type Triple = (u32, u32, u32);

    fn left_of(codes: &[u8], i: usize) -> Option<u8> {
        if i == 0 || dna::is_special(codes[i - 1]) {
            None
        } else {
            Some(codes[i - 1])
        }
    }

    fn naive_pairs(seq: &EncodedSeq, min_len: u32) -> Vec<Triple> {
        let codes = seq.codes();
        let n = codes.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                let mut h = 0;
                while j + h < n && codes[i + h] == codes[j + h] && !dna::is_special(codes[i + h]) {
                    h += 1;
                }
                let diverse = match (left_of(codes, i), left_of(codes, j)) {
                    (Some(a), Some(b)) => a != b,
                    _ => true,
                };
                if h as u32 >= min_len && diverse {
                    out.push((h as u32, i as u32, j as u32));
                }
            }
        }
        out.sort_unstable();
        out
    }

    fn run(seq: &EncodedSeq, min_len: u32) -> Vec<Triple> {
        let esa = EnhancedSuffixArray::build(seq.clone());
        let mut sink = PairCollector::default();
        let stats =
            enumerate_maximal_pairs(&mut esa.reader(), &esa.seq, dna::ALPHABET_SIZE, min_len, &mut sink).unwrap();
        assert_eq!(stats.pairs as usize, sink.pairs.len());
        assert_eq!(stats.leaves as usize, seq.len());
        let mut got: Vec<Triple> = sink.pairs.iter().map(|p| (p.len, p.pos1, p.pos2)).collect();
        got.sort_unstable();
        got
    }

    fn assert_matches_naive(seq: &EncodedSeq, min_len: u32) {
        let got = run(seq, min_len);
        let mut dedup = got.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), got.len(), "duplicate pairs for min_len={}", min_len);
        assert_eq!(got, naive_pairs(seq, min_len), "min_len={} codes={:?}", min_len, seq.codes());
    }

    fn random_dna(len: usize, seed: u32, alphabet: &[u8]) -> Vec<u8> {
        let mut x = seed;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                alphabet[(x >> 16) as usize % alphabet.len()]
            })
            .collect()
    }

    #[test]
    fn banana_left_maximal_pairs() {
        // b→C, a→A, n→G
        let seq = EncodedSeq::from_seq(b"CAGAGA");
        assert_eq!(run(&seq, 1), vec![(1, 1, 5), (3, 1, 3)]);
        assert_eq!(run(&seq, 2), vec![(3, 1, 3)]);
        assert!(run(&seq, 4).is_empty());
    }

    #[test]
    fn banana_every_threshold_matches_naive() {
        let seq = EncodedSeq::from_seq(b"CAGAGA");
        for min_len in 0..=7 {
            assert_matches_naive(&seq, min_len);
        }
    }

    #[test]
    fn distinct_symbols_have_no_pairs() {
        let seq = EncodedSeq::from_seq(b"ACGT");
        assert!(run(&seq, 1).is_empty());
    }

    #[test]
    fn threshold_above_longest_repeat_is_empty() {
        let seq = EncodedSeq::from_seq(&random_dna(300, 7, b"ACGT"));
        let esa = EnhancedSuffixArray::build(seq.clone());
        assert!(!run(&seq, esa.max_lcp()).is_empty());
        assert!(run(&seq, esa.max_lcp() + 1).is_empty());
    }

    #[test]
    fn tandem_repeat_matches_naive() {
        let seq = EncodedSeq::from_seq(b"ACGACGACGACGTTACGACG");
        for min_len in 0..=12 {
            assert_matches_naive(&seq, min_len);
        }
    }

    #[test]
    fn random_sequences_match_naive() {
        for seed in 1..=12u32 {
            let seq = EncodedSeq::from_seq(&random_dna(40 + seed as usize * 7, seed, b"ACGT"));
            for min_len in [0, 1, 2, 3, 5, 8] {
                assert_matches_naive(&seq, min_len);
            }
        }
    }

    #[test]
    fn wildcards_and_contigs_match_naive() {
        for seed in 1..=6u32 {
            let mut seq = EncodedSeq::new();
            seq.push_record("a", &random_dna(50, seed, b"ACGTACGTACGTN"));
            seq.push_record("b", &random_dna(30, seed + 100, b"AC"));
            seq.push_record("c", &random_dna(25, seed + 200, b"ACGTN"));
            for min_len in [0, 1, 2, 4, 6] {
                assert_matches_naive(&seq, min_len);
            }
        }
    }

    #[test]
    fn sequence_start_and_separator_are_mutually_diverse() {
        let mut seq = EncodedSeq::new();
        seq.push_record("a", b"ACGT");
        seq.push_record("b", b"ACGT");
        // 位置 0 左侧为序列起点，位置 5 左侧为分隔符
        assert_eq!(run(&seq, 4), vec![(4, 0, 5)]);
    }

    #[test]
    fn positions_after_wildcards_are_mutually_diverse() {
        let seq = EncodedSeq::from_seq(b"TNACGTNACGT");
        assert_eq!(run(&seq, 4), vec![(4, 2, 7)]);
    }

    #[test]
    fn pairs_are_ordered_and_depth_is_at_least_min_len() {
        let seq = EncodedSeq::from_seq(&random_dna(200, 42, b"ACGT"));
        for (len, p1, p2) in run(&seq, 3) {
            assert!(p1 < p2);
            assert!(len >= 3);
        }
    }

    #[test]
    fn failing_sink_stops_immediately() {
        let seq = EncodedSeq::from_seq(b"CAGAGA");
        let esa = EnhancedSuffixArray::build(seq);
        let mut calls = 0;
        let mut sink = |_: u32, _: u32, _: u32| -> Result<(), EsaError> {
            calls += 1;
            Err(EsaError::sink("disk full"))
        };
        let err = enumerate_maximal_pairs(&mut esa.reader(), &esa.seq, dna::ALPHABET_SIZE, 1, &mut sink).unwrap_err();
        assert!(matches!(err, EsaError::Sink(_)));
        assert_eq!(err.to_string(), "pair sink failed: disk full");
        assert_eq!(calls, 1);
    }

    #[test]
    fn out_of_range_suffix_is_corrupt() {
        use crate::esa::dfs::SuffixLcp;

        struct Bad(Vec<SuffixLcp>);
        impl SuffixLcpSource for Bad {
            fn next_entry(&mut self) -> Result<Option<SuffixLcp>, EsaError> {
                Ok(self.0.pop())
            }
        }

        let seq = EncodedSeq::from_seq(b"AA");
        let mut src = Bad(vec![SuffixLcp { suffix: 9, lcp: 1 }, SuffixLcp { suffix: 1, lcp: 0 }]);
        let mut sink = PairCollector::default();
        let err = enumerate_maximal_pairs(&mut src, &seq, dna::ALPHABET_SIZE, 1, &mut sink).unwrap_err();
        assert!(matches!(err, EsaError::CorruptSource(_)));
    }
}
