/// 真实字母表大小：{0:A, 1:C, 2:G, 3:T}
pub const ALPHABET_SIZE: u8 = 4;
/// 通配符（N 以及其他 IUPAC 模糊碱基）
pub const WILDCARD: u8 = 4;
/// contig 之间的分隔符
pub const SEPARATOR: u8 = 5;

#[inline]
pub fn encode(b: u8) -> u8 {
    match b.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' | b'U' => 3,
        _ => WILDCARD,
    }
}

#[inline]
pub fn decode(code: u8) -> u8 {
    match code {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        3 => b'T',
        SEPARATOR => b'|',
        _ => b'N',
    }
}

/// 通配符与分隔符永远不参与匹配
#[inline]
pub fn is_special(code: u8) -> bool {
    code >= ALPHABET_SIZE
}

pub fn encode_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| encode(b)).collect()
}

pub fn decode_seq(codes: &[u8]) -> Vec<u8> {
    codes.iter().map(|&c| decode(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_maps_iupac_to_wildcard() {
        assert_eq!(encode_seq(b"acgtuNRy"), vec![0, 1, 2, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn decode_inverts_encode_on_acgt() {
        let codes = encode_seq(b"GATTACA");
        assert_eq!(decode_seq(&codes), b"GATTACA");
        assert_eq!(decode(SEPARATOR), b'|');
    }

    #[test]
    fn special_codes() {
        assert!(!is_special(3));
        assert!(is_special(WILDCARD));
        assert!(is_special(SEPARATOR));
    }
}
