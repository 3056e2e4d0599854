//! Address normalization to the graph store's vertex-id format

/// Width of a normalized address: the graph space is created with
/// `vid_type = FIXED_STRING(64)`, so every vertex id must be exactly
/// 64 lower-case hex characters.
pub const VID_LEN: usize = 64;

/// Normalize a raw Sui address into vertex-id form: strip the `0x`
/// prefix, lower-case, and left-pad with zeros to [`VID_LEN`] characters.
///
/// All lookups and comparisons in the pipeline operate on this form.
pub fn normalize_address(raw: &str) -> String {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw).to_ascii_lowercase();
    if stripped.len() >= VID_LEN {
        return stripped;
    }
    let mut padded = String::with_capacity(VID_LEN);
    for _ in 0..(VID_LEN - stripped.len()) {
        padded.push('0');
    }
    padded.push_str(&stripped);
    padded
}

/// Check that a normalized address is a well-formed vertex id
pub fn is_valid_vid(addr: &str) -> bool {
    hex::decode(addr)
        .map(|bytes| bytes.len() == VID_LEN / 2)
        .unwrap_or(false)
}

/// Restore the `0x` prefix for RPC calls that expect the chain's native form
pub fn to_rpc_address(vid: &str) -> String {
    if vid.starts_with("0x") {
        vid.to_string()
    } else {
        format!("0x{}", vid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_prefix_and_pads() {
        let vid = normalize_address("0xAbC1");
        assert_eq!(vid.len(), VID_LEN);
        assert!(vid.ends_with("abc1"));
        assert!(vid.starts_with("0000"));
    }

    #[test]
    fn test_normalize_full_width_address_unchanged() {
        let raw = "a".repeat(VID_LEN);
        assert_eq!(normalize_address(&raw), raw);
    }

    #[test]
    fn test_vid_validation() {
        assert!(is_valid_vid(&normalize_address("0x2")));
        assert!(!is_valid_vid("not-hex"));
        assert!(!is_valid_vid("abcd"));
    }
}
