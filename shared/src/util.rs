/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random base-36 suffix length of element ids.
const ID_SUFFIX_LEN: usize = 7;

/// Generate a canvas element id: `<prefix>_<millis>_<base36 suffix>`.
///
/// Layout:
///   - prefix: the element type tag (`text`, `table`, ...)
///   - millis: creation time in UTC milliseconds
///   - suffix: 7 random base-36 chars (~78 billion values per ms)
///
/// Ids are never sequence numbers: elements built in different editor
/// sessions are merged by id, so two sessions must not mint the same value.
pub fn element_id(prefix: &str) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, now_millis(), suffix)
}
