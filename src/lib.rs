//! # repfind-rust
//!
//! 基于增强后缀数组（ESA）的极大重复对查找。
//!
//! 本 crate 包括：
//!
//! - **遍历引擎**：在后缀数组 + LCP 隐含的 lcp 区间树上做深度优先遍历，通过
//!   [`esa::DfsVisitor`] 回调通知每个节点的进入、叶子边、分支边与退出
//! - **极大对枚举**：找出所有长度不小于给定阈值的左极大重复对，每对恰好输出一次
//! - **索引构建**：编码序列、后缀数组、LCP 数组，以及索引文件的读写
//!
//! ## 快速示例
//!
//! ```rust
//! use repfind_rust::esa::{enumerate_maximal_pairs, PairCollector};
//! use repfind_rust::index::encseq::EncodedSeq;
//! use repfind_rust::index::esa::EnhancedSuffixArray;
//! use repfind_rust::util::dna;
//!
//! let esa = EnhancedSuffixArray::build(EncodedSeq::from_seq(b"ACGTTACGTAACGT"));
//! let mut pairs = PairCollector::default();
//! enumerate_maximal_pairs(&mut esa.reader(), &esa.seq, dna::ALPHABET_SIZE, 4, &mut pairs)?;
//! // ACGT 出现三次，两两之间左侧字符都不同
//! assert_eq!(pairs.pairs.len(), 3);
//! assert!(pairs.pairs.iter().all(|p| p.len == 4));
//! # Ok::<(), repfind_rust::error::EsaError>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`esa`] — 遍历引擎、极大对枚举、结果输出
//! - [`index`] — 编码序列、后缀数组、LCP、索引文件
//! - [`io`] — FASTA 解析
//! - [`util`] — DNA 编码
//! - [`error`] — 错误类型

pub mod error;
pub mod esa;
pub mod index;
pub mod io;
pub mod util;
