pub mod encseq;
pub mod esa;
pub mod lcp;
pub mod sa;
