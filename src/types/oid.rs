//! OBJECT IDENTIFIER (universal tag 6) and RELATIVE-OID (universal tag 13).
//!
//! Both share the base-128 continuation-bit arc encoding (`spec.md` §4.2's
//! "ObjectId parsing algorithm"); OBJECT IDENTIFIER additionally folds its
//! first two arcs into one encoded sub-identifier.

/// Maximum value of the first arc (`X.690` constrains it to `{0, 1, 2}`).
pub const MAX_FIRST_ARC: u32 = 2;
/// Maximum value of the second arc when the first arc is `0` or `1`.
pub const MAX_SECOND_ARC_WHEN_FIRST_UNDER_2: u32 = 39;

/// Validates that `arcs` can be folded into an OBJECT IDENTIFIER's first
/// sub-identifier, without encoding anything.
pub fn validate_arcs(arcs: &[u32]) -> Result<(), String> {
    if arcs.len() < 2 {
        return Err("OBJECT IDENTIFIER requires at least two arcs".into());
    }
    let (first, second) = (arcs[0], arcs[1]);
    if first > MAX_FIRST_ARC {
        return Err(format!("first arc must be 0, 1, or 2, got {first}"));
    }
    if first < 2 && second > MAX_SECOND_ARC_WHEN_FIRST_UNDER_2 {
        return Err(format!(
            "second arc must be <= 39 when the first arc is 0 or 1, got {second}"
        ));
    }
    Ok(())
}

/// Encodes an OBJECT IDENTIFIER's arcs to content octets.
///
/// Fails if `arcs` has fewer than two components, or the first two arcs
/// violate `a <= 2 && (a < 2 => b <= 39)`.
pub fn encode(arcs: &[u32]) -> Result<Vec<u8>, String> {
    validate_arcs(arcs)?;
    let (first, second) = (arcs[0], arcs[1]);

    let mut out = Vec::new();
    encode_arc(40 * first + second, &mut out);
    for &arc in &arcs[2..] {
        encode_arc(arc, &mut out);
    }
    Ok(out)
}

/// Encodes a RELATIVE-OID's arcs to content octets: each arc is emitted
/// independently, with no first-two-arc folding.
pub fn encode_relative(arcs: &[u32]) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    for &arc in arcs {
        encode_arc(arc, &mut out);
    }
    Ok(out)
}

fn encode_arc(mut value: u32, out: &mut Vec<u8>) {
    let mut stack = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value != 0 {
        stack.push(((value & 0x7f) as u8) | 0x80);
        value >>= 7;
    }
    out.extend(stack.into_iter().rev());
}

/// Decodes RELATIVE-OID content octets into their arcs (no folding
/// undone).
pub fn decode_relative(content: &[u8]) -> Result<Vec<u32>, String> {
    decode_arcs(content)
}

/// Decodes OBJECT IDENTIFIER content octets into its full arc sequence,
/// splitting the first decoded sub-identifier back into two arcs via
/// `a = min(first / 40, 2)`, `b = first - 40 * a`.
pub fn decode(content: &[u8]) -> Result<Vec<u32>, String> {
    let mut arcs = decode_arcs(content)?;
    if arcs.is_empty() {
        return Err("OBJECT IDENTIFIER content must not be empty".into());
    }
    let first_subidentifier = arcs.remove(0);
    let first = core::cmp::min(first_subidentifier / 40, MAX_FIRST_ARC);
    let second = first_subidentifier - 40 * first;
    arcs.insert(0, second);
    arcs.insert(0, first);
    Ok(arcs)
}

fn decode_arcs(content: &[u8]) -> Result<Vec<u32>, String> {
    let mut arcs = Vec::new();
    let mut current: u32 = 0;
    let mut started = false;
    for &byte in content {
        started = true;
        current = current
            .checked_shl(7)
            .and_then(|v| v.checked_add((byte & 0x7f) as u32))
            .ok_or("OBJECT IDENTIFIER arc overflowed 32 bits")?;
        if byte & 0x80 == 0 {
            arcs.push(current);
            current = 0;
            started = false;
        }
    }
    if started {
        return Err("truncated OBJECT IDENTIFIER arc (missing terminating octet)".into());
    }
    Ok(arcs)
}

/// Parses a dotted-decimal string (`"1.2.840.113549"`) into arcs.
pub fn parse_dotted(s: &str) -> Result<Vec<u32>, String> {
    s.split('.')
        .map(|part| part.parse::<u32>().map_err(|e| e.to_string()))
        .collect()
}

/// Formats arcs as a dotted-decimal string.
pub fn to_dotted(arcs: &[u32]) -> String {
    arcs.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spec_scenario() {
        // "2.999.3" -> 88 37 03
        let arcs = parse_dotted("2.999.3").unwrap();
        assert_eq!(encode(&arcs).unwrap(), vec![0x88, 0x37, 0x03]);
    }

    #[test]
    fn round_trips_boundary_arcs() {
        for dotted in ["0.0", "0.39", "1.0", "1.39", "2.0", "2.999.3", "1.2.840.113549.1.1.11"] {
            let arcs = parse_dotted(dotted).unwrap();
            let encoded = encode(&arcs).unwrap();
            assert_eq!(decode(&encoded).unwrap(), arcs);
        }
    }

    #[test]
    fn relative_oid_does_not_fold() {
        let arcs = vec![8571u32, 3, 2];
        let encoded = encode_relative(&arcs).unwrap();
        assert_eq!(decode_relative(&encoded).unwrap(), arcs);
    }

    #[test]
    fn rejects_out_of_range_first_arc() {
        assert!(encode(&[3, 0]).is_err());
        assert!(validate_arcs(&[3, 0]).is_err());
    }

    #[test]
    fn rejects_out_of_range_second_arc() {
        assert!(encode(&[1, 40]).is_err());
        assert!(validate_arcs(&[1, 40]).is_err());
    }
}
