use proptest::prelude::*;
use shardshare::rs::{decode, encode, EncodingConfig};

fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_of_encode_recovers_original_data(
        k in 1usize..6,
        m in 1usize..4,
        shard_size in 16usize..128,
        len in 0usize..600,
        seed in any::<u64>(),
    ) {
        let config = EncodingConfig::new(k, m, shard_size).unwrap();
        let data = pseudo_random_bytes(len, seed);
        let shards = encode(&data, &config).unwrap();
        let result = decode(shards).unwrap();
        prop_assert_eq!(data, result.data);
    }

    #[test]
    fn any_k_of_n_shards_reconstruct_regardless_of_order(
        k in 2usize..6,
        m in 1usize..4,
        len in 1usize..400,
        seed in any::<u64>(),
        drop_seed in any::<u64>(),
    ) {
        let config = EncodingConfig::new(k, m, 64).unwrap();
        let data = pseudo_random_bytes(len, seed);
        let mut shards = encode(&data, &config).unwrap();

        // Deterministically shuffle, then keep exactly k of them.
        let mut rng_state = drop_seed;
        for i in (1..shards.len()).rev() {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (rng_state >> 33) as usize % (i + 1);
            shards.swap(i, j);
        }
        shards.truncate(k);

        let result = decode(shards).unwrap();
        prop_assert_eq!(data, result.data);
    }
}

#[test]
fn mds_property_holds_for_small_configs() {
    // Any k of the k + m shards must reconstruct: exhaustively check every
    // k-subset for small (k, m) pairs.
    for k in 1..=4usize {
        for m in 1..=3usize {
            let config = EncodingConfig::new(k, m, 32).unwrap();
            let data = pseudo_random_bytes(96, (k * 100 + m) as u64);
            let shards = encode(&data, &config).unwrap();
            let n = shards.len();
            for subset in combinations(0..n, k) {
                let chosen: Vec<_> = subset.iter().map(|&i| shards[i].clone()).collect();
                let result = decode(chosen).unwrap();
                assert_eq!(data, result.data, "k={k} m={m} subset={subset:?}");
            }
        }
    }
}

fn combinations(range: std::ops::Range<usize>, k: usize) -> Vec<Vec<usize>> {
    let items: Vec<usize> = range.collect();
    let mut out = Vec::new();
    let mut current = Vec::new();
    fn go(items: &[usize], k: usize, start: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..items.len() {
            current.push(items[i]);
            go(items, k, i + 1, current, out);
            current.pop();
        }
    }
    go(&items, k, 0, &mut current, &mut out);
    out
}
