use nanoid::nanoid;

/// Alphabet for worker identifiers (no ambiguous glyphs).
const WORKER_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const WORKER_ID_LENGTH: usize = 20;

/// Generates the opaque id assigned to a worker at creation.
pub fn generate_worker_id() -> String {
    nanoid!(WORKER_ID_LENGTH, WORKER_ID_ALPHABET)
}
