use crate::color::Rgb;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum AlgorithmError {
    #[error("unknown algorithm {0:?}")]
    NotFound(String),
    #[error("algorithm {0:?} is already registered")]
    Duplicate(&'static str),
    #[error("invalid display color {0:?} (expected #rrggbb)")]
    InvalidColor(String),
}

/// One PRNG output: the value doubles as the next state.
///
/// State is signed. `%` truncates toward zero, so a negative seed keeps the
/// LCG and Park-Miller sequences negative; Xorshift and MWC only look at the
/// low 32 bits and always come out non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) value: i64,
    pub(crate) modulus: i64,
}

const LCG_MODULUS: i64 = 233_280;
const PARK_MILLER_MODULUS: i64 = 2_147_483_647;
const MWC_MULTIPLIER: u64 = 4_294_957_665;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    LinearCongruential,
    ParkMiller,
    Xorshift,
    MultiplyWithCarry,
}

impl Kind {
    pub(crate) fn modulus(self) -> i64 {
        match self {
            Kind::LinearCongruential => LCG_MODULUS,
            Kind::ParkMiller => PARK_MILLER_MODULUS,
            Kind::Xorshift | Kind::MultiplyWithCarry => u32::MAX as i64,
        }
    }

    pub(crate) fn step(self, state: i64) -> Step {
        let s = state as i128;
        let value = match self {
            Kind::LinearCongruential => ((s * 9301 + 49_297) % LCG_MODULUS as i128) as i64,
            Kind::ParkMiller => ((s * 16_807) % PARK_MILLER_MODULUS as i128) as i64,
            Kind::Xorshift => {
                // Signed 32-bit view: the middle shift is arithmetic.
                let mut x = state as i32;
                x ^= x.wrapping_shl(13);
                x ^= x >> 17;
                x ^= x.wrapping_shl(5);
                x as u32 as i64
            }
            Kind::MultiplyWithCarry => MWC_MULTIPLIER.wrapping_mul(state as u64) as u32 as i64,
        };
        Step {
            value,
            modulus: self.modulus(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Algorithm {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) color: Rgb,
    pub(crate) kind: Kind,
}

impl Algorithm {
    pub(crate) fn step(&self, state: i64) -> Step {
        self.kind.step(state)
    }
}

/// Insertion-ordered set of algorithms; the first entry is the default.
#[derive(Clone, Debug, Default)]
pub(crate) struct Registry {
    entries: Vec<Algorithm>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn builtin() -> Self {
        let mut reg = Self::new();
        let builtins = [
            (
                "Linear Congruential",
                "(x*9301 + 49297) mod 233280",
                "#ff6b6b",
                Kind::LinearCongruential,
            ),
            (
                "Park-Miller",
                "(x*16807) mod 2^31-1",
                "#4ecdc4",
                Kind::ParkMiller,
            ),
            (
                "Xorshift",
                "shift/xor 13, 17, 5 on 32 bits",
                "#ffe66d",
                Kind::Xorshift,
            ),
            (
                "Multiply-with-Carry",
                "low 32 bits of 4294957665*x",
                "#a78bfa",
                Kind::MultiplyWithCarry,
            ),
        ];
        for (name, description, color, kind) in builtins {
            if let Err(e) = reg.register(name, description, color, kind) {
                unreachable!("builtin registry is well-formed: {e}");
            }
        }
        reg
    }

    pub(crate) fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        color_hex: &str,
        kind: Kind,
    ) -> Result<(), AlgorithmError> {
        if self.entries.iter().any(|a| a.name == name) {
            return Err(AlgorithmError::Duplicate(name));
        }
        let color = Rgb::from_hex(color_hex)?;
        self.entries.push(Algorithm {
            name,
            description,
            color,
            kind,
        });
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Result<&Algorithm, AlgorithmError> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| AlgorithmError::NotFound(name.to_string()))
    }

    /// Lenient lookup for user-typed names (`xorshift`, `park-miller`).
    pub(crate) fn find_ignore_case(&self, name: &str) -> Result<&Algorithm, AlgorithmError> {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AlgorithmError::NotFound(name.to_string()))
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|a| a.name == name)
    }

    pub(crate) fn first(&self) -> Option<&Algorithm> {
        self.entries.first()
    }

    pub(crate) fn by_index(&self, i: usize) -> Option<&Algorithm> {
        self.entries.get(i)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Algorithm> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|a| a.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_value(name: &str, seed: i64) -> i64 {
        Registry::builtin().get(name).unwrap().step(seed).value
    }

    #[test]
    fn first_values_for_seed_one_are_pinned() {
        assert_eq!(first_value("Linear Congruential", 1), 58_598);
        assert_eq!(first_value("Park-Miller", 1), 16_807);
        assert_eq!(first_value("Xorshift", 1), 270_369);
        assert_eq!(first_value("Multiply-with-Carry", 1), 4_294_957_665);
    }

    #[test]
    fn negative_seeds_follow_truncating_remainder() {
        assert_eq!(first_value("Linear Congruential", -100), -180_963);
        assert_eq!(first_value("Park-Miller", -1), -16_807);
        assert_eq!(first_value("Xorshift", -1), 253_983);
        assert_eq!(first_value("Multiply-with-Carry", -1), 9_631);
    }

    #[test]
    fn wide_seeds_do_not_overflow() {
        let lcg = Kind::LinearCongruential.step(i64::MAX);
        assert_eq!(
            lcg.value as i128,
            (i64::MAX as i128 * 9301 + 49_297) % 233_280
        );
        let pm = Kind::ParkMiller.step(i64::MIN);
        assert!(pm.value <= 0 && pm.value > -pm.modulus);
        // only the low 32 bits reach the shift/xor steps
        assert_eq!(
            Kind::Xorshift.step(5_000_000_000),
            Kind::Xorshift.step(5_000_000_000 & 0xFFFF_FFFF)
        );
    }

    #[test]
    fn xorshift_middle_shift_is_arithmetic() {
        // A logical shift would yield 0x8008_4000 for this state.
        assert_eq!(Kind::Xorshift.step(0x8000_0000).value, 0x8007_C000);
    }

    #[test]
    fn mwc_keeps_low_32_bits_of_the_64_bit_product() {
        let seed = 123_456i64;
        let wide = (4_294_957_665u128 * seed as u128) % (1u128 << 64);
        assert_eq!(
            Kind::MultiplyWithCarry.step(seed).value,
            (wide & 0xFFFF_FFFF) as i64
        );
    }

    #[test]
    fn park_miller_does_not_overflow_on_large_states() {
        let step = Kind::ParkMiller.step(u32::MAX as i64);
        assert_eq!(step.value, (u32::MAX as i64 * 16_807) % 2_147_483_647);
        assert!(step.value < step.modulus);
    }

    #[test]
    fn moduli_match_each_algorithm() {
        let reg = Registry::builtin();
        let moduli: Vec<i64> = reg.iter().map(|a| a.kind.modulus()).collect();
        assert_eq!(moduli, vec![233_280, 2_147_483_647, 4_294_967_295, 4_294_967_295]);
    }

    #[test]
    fn first_registered_is_the_default() {
        let reg = Registry::builtin();
        assert_eq!(reg.first().unwrap().name, "Linear Congruential");
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.position("Xorshift"), Some(2));
        assert_eq!(reg.by_index(3).unwrap().name, "Multiply-with-Carry");
        assert!(Registry::new().first().is_none());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let reg = Registry::builtin();
        assert_eq!(
            reg.get("Mersenne Twister").unwrap_err(),
            AlgorithmError::NotFound("Mersenne Twister".into())
        );
        // exact lookup is case-sensitive, the lenient one is not
        assert!(reg.get("xorshift").is_err());
        assert_eq!(reg.find_ignore_case(" xorshift ").unwrap().name, "Xorshift");
    }

    #[test]
    fn register_rejects_duplicates_and_bad_colors() {
        let mut reg = Registry::new();
        reg.register("A", "first", "#000000", Kind::Xorshift).unwrap();
        assert_eq!(
            reg.register("A", "again", "#ffffff", Kind::ParkMiller),
            Err(AlgorithmError::Duplicate("A"))
        );
        assert!(matches!(
            reg.register("B", "bad", "red", Kind::ParkMiller),
            Err(AlgorithmError::InvalidColor(_))
        ));
        assert_eq!(reg.names(), vec!["A"]);
    }
}
