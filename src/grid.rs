use crate::algorithm::Algorithm;
use crate::color::cell_color;
use crate::render::PixelCanvas;
use rand::Rng;
use std::time::{Duration, Instant};

pub(crate) const GRID_W: u32 = 48;
pub(crate) const GRID_H: u32 = 40;
/// Raster pixels per cell edge.
pub(crate) const PIXEL: u32 = 1;

pub(crate) const RANDOM_SEED_MAX: i64 = 999_999;

pub(crate) fn new_canvas() -> PixelCanvas {
    PixelCanvas::new(GRID_W * PIXEL, GRID_H * PIXEL)
}

#[derive(Clone, Debug)]
pub(crate) struct GenerationRun {
    pub(crate) seed: i64,
    pub(crate) algorithm: &'static str,
    pub(crate) modulus: i64,
    /// Row-major, `GRID_W * GRID_H` entries.
    pub(crate) values: Vec<i64>,
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) final_value: i64,
    pub(crate) elapsed: Duration,
}

impl GenerationRun {
    pub(crate) fn iterations(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

// Timing is excluded from equality.
impl PartialEq for GenerationRun {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.algorithm == other.algorithm
            && self.modulus == other.modulus
            && self.values == other.values
            && self.min == other.min
            && self.max == other.max
            && self.final_value == other.final_value
    }
}

impl Eq for GenerationRun {}

/// Fills the grid from `seed` in row-major order and paints every cell.
pub(crate) fn generate(canvas: &mut PixelCanvas, seed: i64, algo: &Algorithm) -> GenerationRun {
    let start = Instant::now();

    let mut values = Vec::with_capacity((GRID_W * GRID_H) as usize);
    let mut state = seed;
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    let mut modulus = algo.kind.modulus();

    for row in 0..GRID_H {
        for col in 0..GRID_W {
            let step = algo.step(state);
            state = step.value;
            modulus = step.modulus;
            min = min.min(step.value);
            max = max.max(step.value);
            values.push(step.value);

            let color = cell_color(step.value, step.modulus, algo.color);
            canvas.fill_block(col * PIXEL, row * PIXEL, PIXEL, color);
        }
    }

    GenerationRun {
        seed,
        algorithm: algo.name,
        modulus,
        values,
        min,
        max,
        final_value: state,
        elapsed: start.elapsed(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SeedInput {
    Parsed(i64),
    Substituted(i64),
}

impl SeedInput {
    pub(crate) fn seed(self) -> i64 {
        match self {
            SeedInput::Parsed(s) | SeedInput::Substituted(s) => s,
        }
    }
}

pub(crate) fn random_seed<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(0..=RANDOM_SEED_MAX)
}

/// Any decimal integer (optionally signed) that fits in an `i64` is used as
/// is. Everything else is replaced by a random seed.
pub(crate) fn resolve_seed<R: Rng>(text: &str, rng: &mut R) -> SeedInput {
    match text.trim().parse::<i64>() {
        Ok(seed) => SeedInput::Parsed(seed),
        Err(_) => SeedInput::Substituted(random_seed(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Registry;
    use crate::color::Rgb;
    use rand::{rngs::StdRng, SeedableRng};

    impl GenerationRun {
        fn value_at(&self, x: u32, y: u32) -> Option<i64> {
            if x < GRID_W && y < GRID_H {
                self.values.get((y * GRID_W + x) as usize).copied()
            } else {
                None
            }
        }
    }

    fn run(seed: i64, name: &str) -> GenerationRun {
        let reg = Registry::builtin();
        let mut canvas = new_canvas();
        generate(&mut canvas, seed, reg.get(name).unwrap())
    }

    #[test]
    fn grid_is_full_and_row_major() {
        let r = run(1, "Linear Congruential");
        assert_eq!(r.iterations(), (GRID_W * GRID_H) as usize);
        assert_eq!(r.value_at(0, 0), Some(58_598));
        // second cell continues the same sequence
        let expected = (58_598 * 9301 + 49_297) % 233_280;
        assert_eq!(r.value_at(1, 0), Some(expected));
        assert_eq!(r.value_at(0, 1), Some(r.values[GRID_W as usize]));
        assert_eq!(r.value_at(GRID_W, 0), None);
    }

    #[test]
    fn final_value_is_the_last_cell() {
        for name in Registry::builtin().names() {
            let r = run(42, name);
            assert_eq!(Some(r.final_value), r.value_at(GRID_W - 1, GRID_H - 1), "{name}");
        }
    }

    #[test]
    fn every_pixel_is_overwritten() {
        let reg = Registry::builtin();
        let algo = reg.get("Xorshift").unwrap();
        let mut canvas = new_canvas();
        let marker = Rgb::new(1, 2, 3);
        canvas.clear(marker);
        let r = generate(&mut canvas, 7, algo);
        assert!(canvas.px.iter().all(|p| *p != marker));

        let corner = canvas.pixel(GRID_W * PIXEL - 1, GRID_H * PIXEL - 1).unwrap();
        assert_eq!(corner, cell_color(r.final_value, r.modulus, algo.color));
    }

    #[test]
    fn equality_ignores_elapsed_time() {
        let a = run(9, "Park-Miller");
        let mut b = run(9, "Park-Miller");
        b.elapsed = a.elapsed + Duration::from_millis(5);
        assert_eq!(a, b);
        assert_ne!(a, run(10, "Park-Miller"));
    }

    #[test]
    fn zero_seed_is_a_fixed_point_for_multiplicative_generators() {
        let r = run(0, "Park-Miller");
        assert_eq!((r.min, r.max, r.final_value), (0, 0, 0));
        let r = run(0, "Xorshift");
        assert_eq!(r.max, 0);
    }

    #[test]
    fn numeric_seed_text_is_parsed() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve_seed("12345", &mut rng), SeedInput::Parsed(12_345));
        assert_eq!(resolve_seed("  0 ", &mut rng), SeedInput::Parsed(0));
        assert_eq!(resolve_seed("-5", &mut rng), SeedInput::Parsed(-5));
        assert_eq!(resolve_seed("+5", &mut rng), SeedInput::Parsed(5));
        assert_eq!(
            resolve_seed("5000000000", &mut rng),
            SeedInput::Parsed(5_000_000_000)
        );
    }

    #[test]
    fn negative_seed_paints_clamped_cells() {
        let r = run(-100, "Linear Congruential");
        assert_eq!(r.seed, -100);
        assert_eq!(r.values[0], -180_963);
        assert!(r.min < 0);

        let reg = Registry::builtin();
        let mut canvas = new_canvas();
        generate(&mut canvas, -100, reg.get("Linear Congruential").unwrap());
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn invalid_seed_text_is_substituted_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for text in ["", "   ", "abc", "12a", "--5", "1.5", "1e6", "99999999999999999999"] {
            match resolve_seed(text, &mut rng) {
                SeedInput::Substituted(s) => assert!(s <= RANDOM_SEED_MAX, "{text:?} -> {s}"),
                other => panic!("{text:?} should be substituted, got {other:?}"),
            }
        }
    }

    #[test]
    fn substituted_seed_replays_deterministically() {
        let mut rng = StdRng::seed_from_u64(99);
        let seed = resolve_seed("", &mut rng).seed();
        let first = run(seed, "Multiply-with-Carry");
        let replay = run(seed, "Multiply-with-Carry");
        assert_eq!(first, replay);
        assert_eq!(first.seed, seed);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn runs_are_deterministic(seed: i64, idx in 0usize..4) {
                let reg = Registry::builtin();
                let algo = reg.by_index(idx).unwrap();
                let a = generate(&mut new_canvas(), seed, algo);
                let b = generate(&mut new_canvas(), seed, algo);
                prop_assert_eq!(&a.values, &b.values);
                prop_assert_eq!((a.min, a.max, a.final_value), (b.min, b.max, b.final_value));
            }

            #[test]
            fn min_and_max_bound_every_value(seed: i64, idx in 0usize..4) {
                let reg = Registry::builtin();
                let r = generate(&mut new_canvas(), seed, reg.by_index(idx).unwrap());
                prop_assert!(r.values.iter().all(|v| r.min <= *v && *v <= r.max));
                prop_assert!(r.values.contains(&r.min) && r.values.contains(&r.max));
                prop_assert_eq!(r.final_value, *r.values.last().unwrap());
            }

            #[test]
            fn random_seeds_stay_in_range(s: u64) {
                let mut rng = StdRng::seed_from_u64(s);
                prop_assert!(random_seed(&mut rng) <= RANDOM_SEED_MAX);
            }
        }
    }
}
