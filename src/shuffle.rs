use rand::Rng;

/// Fisher-Yates: walk from the last index down, swapping each slot with a
/// uniformly chosen slot at or below it.
pub fn shuffle<T>(rng: &mut impl Rng, items: &mut [T])
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Picks `count` entries without replacement. Callers check `count` against
/// the catalog size first.
pub fn pick_random<T: Clone>(rng: &mut impl Rng, catalog: &[T], count: usize) -> Vec<T>
{
    let mut pool = catalog.to_vec();
    let mut picks = Vec::with_capacity(count);
    for _ in 0..count.min(catalog.len()) {
        let index = rng.gen_range(0..pool.len());
        picks.push(pool.remove(index));
    }
    picks
}

/// Draws from the whole catalog and retries whenever the draw repeats an
/// earlier pick.
pub fn draw_distinct<T: Clone + PartialEq>(
    rng: &mut impl Rng,
    catalog: &[T],
    count: usize,
) -> Vec<T>
{
    let mut picks: Vec<T> = Vec::with_capacity(count);
    if catalog.len() < count {
        return picks;
    }
    while picks.len() < count {
        let candidate = &catalog[rng.gen_range(0..catalog.len())];
        if !picks.contains(candidate) {
            picks.push(candidate.clone());
        }
    }
    picks
}
