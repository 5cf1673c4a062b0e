use fastrand::Rng;

/// `count` consecutive addresses starting at `start`, `step` bytes apart, wrapping at 2^32
pub fn strided_trace(start: u32, step: u32, count: usize) -> Vec<u32> {
    let mut address = start;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(address);
        address = address.wrapping_add(step);
    }
    out
}

/// A byte-by-byte walk over `count` addresses from `start`
pub fn sequential_trace(start: u32, count: usize) -> Vec<u32> {
    strided_trace(start, 1, count)
}

/// `count` addresses drawn uniformly below `bound`, reproducible for a given seed
pub fn random_trace(seed: u64, bound: u32, count: usize) -> Vec<u32> {
    let mut rng = Rng::with_seed(seed);
    (0..count).map(|_| rng.u32(..bound)).collect()
}

/// Repeats a pattern of addresses `times` times, useful for building loops that thrash a set
pub fn repeat_trace(pattern: &[u32], times: usize) -> Vec<u32> {
    pattern.iter().copied().cycle().take(pattern.len() * times).collect()
}
