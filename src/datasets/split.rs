use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` with a seeded generator and split them into `(train, test)`.
///
/// The test split holds `ceil(test_size * n)` items, so a single item is never lost to rounding.
/// `test_size` is clamped to `[0, 1]`. The same seed always produces the same split.
pub fn train_test_split<T>(mut items: Vec<T>, test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let total = items.len();
    let test_len = ((total as f64) * test_size.clamp(0.0, 1.0)).ceil() as usize;
    let test_len = test_len.min(total);

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let train = items.split_off(test_len);

    log::debug!(
        "Dataset split: {} training, {} test",
        train.len(),
        items.len()
    );

    (train, items)
}
