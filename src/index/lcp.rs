use crate::util::dna;

/// Kasai 算法计算 LCP 数组：`lcp[r]` 为排名 `r-1` 与 `r` 两个后缀的最长公共前缀，`lcp[0] = 0`。
///
/// 公共前缀在通配符和分隔符处截断（特殊字符与任何字符都不相等，包括它自己），
/// 因此匹配永远不会跨越 contig 边界。
pub fn build_lcp(text: &[u8], sa: &[u32]) -> Vec<u32> {
    let n = text.len();
    debug_assert_eq!(n, sa.len());
    let mut rank = vec![0u32; n];
    for (r, &p) in sa.iter().enumerate() {
        rank[p as usize] = r as u32;
    }

    let mut lcp = vec![0u32; n];
    let mut h = 0usize;
    for i in 0..n {
        let r = rank[i] as usize;
        if r == 0 {
            h = 0;
            continue;
        }
        let j = sa[r - 1] as usize;
        while i + h < n && j + h < n && text[i + h] == text[j + h] && !dna::is_special(text[i + h]) {
            h += 1;
        }
        lcp[r] = h as u32;
        h = h.saturating_sub(1);
    }
    lcp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;

    fn common_prefix(text: &[u8], a: usize, b: usize) -> u32 {
        let mut h = 0;
        while a + h < text.len() && b + h < text.len() && text[a + h] == text[b + h] && !dna::is_special(text[a + h]) {
            h += 1;
        }
        h as u32
    }

    fn check(text: &[u8]) {
        let sa = build_sa(text);
        let lcp = build_lcp(text, &sa);
        assert_eq!(lcp.first().copied().unwrap_or(0), 0);
        for r in 1..sa.len() {
            assert_eq!(lcp[r], common_prefix(text, sa[r - 1] as usize, sa[r] as usize), "rank {} of {:?}", r, text);
        }
    }

    #[test]
    fn lcp_banana() {
        let text = [1u8, 0, 2, 0, 2, 0];
        let sa = build_sa(&text);
        assert_eq!(build_lcp(&text, &sa), vec![0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn lcp_stops_at_special_symbols() {
        // A C N A C N A C | A C
        let text = [0u8, 1, 4, 0, 1, 4, 0, 1, 5, 0, 1];
        check(&text);
        let sa = build_sa(&text);
        let lcp = build_lcp(&text, &sa);
        assert!(lcp.iter().all(|&l| l <= 2));
    }

    #[test]
    fn lcp_matches_naive_on_random_texts() {
        let mut x: u32 = 99;
        for len in 1..=60 {
            let text: Vec<u8> = (0..len)
                .map(|_| {
                    x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    ((x >> 16) % 6) as u8
                })
                .collect();
            check(&text);
        }
    }
}
