/// 构建后缀数组（前缀倍增，O(n log² n)）。
/// 输入为编码后的文本（0..=3 为 ACGT，4 为通配符，5 为分隔符），不需要结尾哨兵：
/// 较短的后缀在前缀相同时排在前面。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = text.iter().map(|&b| b as u32 + 1).collect();
    let mut next_rank: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    loop {
        sa.sort_unstable_by_key(|&i| pair_key(&rank, i, k));

        next_rank[sa[0] as usize] = 1;
        for w in 1..n {
            let prev = pair_key(&rank, sa[w - 1], k);
            let curr = pair_key(&rank, sa[w], k);
            next_rank[sa[w] as usize] = next_rank[sa[w - 1] as usize] + u32::from(curr != prev);
        }
        std::mem::swap(&mut rank, &mut next_rank);

        if rank[sa[n - 1] as usize] as usize == n || k >= n {
            break;
        }
        k <<= 1;
    }

    sa
}

// 越过文本末尾的 rank 视为 0，小于任何真实字符
#[inline]
fn pair_key(rank: &[u32], i: u32, k: usize) -> (u32, u32) {
    let i = i as usize;
    let second = rank.get(i + k).copied().unwrap_or(0);
    (rank[i], second)
}
