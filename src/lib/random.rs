//! Uniform random doubles and the direction samplers used for diffuse scattering.
//!
//! Nothing here owns a generator: every function takes the [Rng] to draw from, so rendering
//! workers keep their own stream and tests can use a fixed seed. [SamplerConfig] builds those
//! streams.

use crate::vector::Vec3;

use std::env::{self, VarError};

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Environment variable read by [SamplerConfig::from_env].
pub const SEED_VAR: &str = "RAYCORE_SEED";

/// Candidates with a smaller squared length are rejected, normalizing them is unstable.
const MIN_CANDIDATE_LEN_SQ: f64 = 1e-160;

#[derive(Debug, PartialEq, thiserror::Error)]
/// [SamplerConfig] error
pub enum Error {
    #[error("Invalid RAYCORE_SEED value `{0}`, expected an unsigned integer")]
    /// The seed is not a `u64`.
    InvalidSeed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
/// How rendering workers seed their generators.
pub struct SamplerConfig {
    /// Fixed seed for reproducible renders, entropy when unset.
    pub seed: Option<u64>,
}

impl SamplerConfig {
    /// Reproducible configuration.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Read the seed from [SEED_VAR], falling back to entropy when it is unset.
    pub fn from_env() -> Result<Self, Error> {
        match env::var(SEED_VAR) {
            Ok(value) => Self::parse(&value),
            Err(VarError::NotPresent) => {
                log::debug!("{SEED_VAR} unset, seeding samplers from entropy");
                Ok(Self::default())
            }
            Err(VarError::NotUnicode(value)) => {
                let value = value.to_string_lossy().into_owned();
                log::warn!("Rejecting non-unicode {SEED_VAR} value {value:?}");
                Err(Error::InvalidSeed(value))
            }
        }
    }

    fn parse(value: &str) -> Result<Self, Error> {
        match value.trim().parse() {
            Ok(seed) => {
                log::debug!("Seeding samplers with {seed}");
                Ok(Self::seeded(seed))
            }
            Err(_) => {
                log::warn!("Rejecting {SEED_VAR} value {value:?}");
                Err(Error::InvalidSeed(value.to_string()))
            }
        }
    }

    /// Generator for a single-threaded caller.
    pub fn rng(&self) -> StdRng {
        self.worker_rng(0)
    }

    /// Independent generator for the rendering worker with index `worker`.
    ///
    /// With a seed, the stream only depends on the `(seed, worker)` pair.
    pub fn worker_rng(&self, worker: u64) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mut bytes = <StdRng as SeedableRng>::Seed::default();
                bytes[..8].copy_from_slice(&seed.to_le_bytes());
                bytes[8..16].copy_from_slice(&worker.to_le_bytes());
                StdRng::from_seed(bytes)
            }
            None => StdRng::from_entropy(),
        }
    }
}

#[inline]
/// Uniform double in `[0, 1)`.
pub fn random_double<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen()
}

#[inline]
/// Uniform double in `[min, max)`. No check is made that `min < max`.
pub fn random_double_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + (max - min) * random_double(rng)
}

/// Direction uniformly distributed on the unit sphere.
///
/// Rejection sampling from the `[-1, 1)` cube: about half of the candidates land in the unit
/// ball, so the loop runs roughly twice on average.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::random_range(rng, -1., 1.);
        let len_sq = candidate.length_squared();
        if MIN_CANDIDATE_LEN_SQ < len_sq && len_sq <= 1. {
            return candidate / len_sq.sqrt();
        }
    }
}

/// Direction uniformly distributed on the hemisphere around `normal`.
///
/// A sphere sample with a non-positive dot product with `normal` is flipped.
pub fn random_on_hemisphere<R: Rng + ?Sized>(rng: &mut R, normal: &Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0. {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}

#[cfg(test)]
mod test {
    use float_eq::assert_float_eq;

    use super::*;

    const SAMPLES: usize = 10_000;

    #[test]
    fn doubles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..SAMPLES {
            assert!((0. ..1.).contains(&random_double(&mut rng)));
            assert!((-3. ..-1.).contains(&random_double_range(&mut rng, -3., -1.)));
        }
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..SAMPLES {
            let v = random_unit_vector(&mut rng);
            assert_float_eq!(v.length(), 1., abs <= 1e-12, "{v:?} is not unit length");
        }
    }

    #[test]
    fn unit_vectors_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);

        let mean = (0..SAMPLES)
            .map(|_| random_unit_vector(&mut rng))
            .sum::<Vec3>()
            / SAMPLES as f64;

        // Each component has a standard deviation of 1/sqrt(3), so the sample mean should sit
        // well within 0.05 of zero.
        assert_float_eq!(mean.inner, [0.; 3], abs_all <= 0.05, "Biased mean {mean:?}");
    }

    #[test]
    fn hemisphere_follows_normal() {
        let mut rng = StdRng::seed_from_u64(4);

        for normal in [
            Vec3::new(0., 0., 1.),
            Vec3::new(-1., 0., 0.),
            Vec3::new(0.3, -0.4, 0.5),
        ] {
            for _ in 0..1_000 {
                let v = random_on_hemisphere(&mut rng, &normal);
                assert!(v.dot(&normal) >= 0., "{v:?} is opposite to {normal:?}");
            }
        }
    }

    #[test]
    fn seeded_workers_are_reproducible() {
        let config = SamplerConfig::seeded(42);

        let first: Vec<Vec3> = (0..8)
            .map(|_| random_unit_vector(&mut config.worker_rng(3)))
            .collect();
        let mut rng = config.worker_rng(3);
        let again = random_unit_vector(&mut rng);

        assert!(first.iter().all(|v| *v == again));
        assert_ne!(
            random_unit_vector(&mut config.worker_rng(3)),
            random_unit_vector(&mut config.worker_rng(4))
        );
    }

    #[test]
    fn neighbouring_seeds_do_not_share_worker_streams() {
        let shifted = random_unit_vector(&mut SamplerConfig::seeded(42).worker_rng(1));
        let next_seed = random_unit_vector(&mut SamplerConfig::seeded(43).worker_rng(0));

        assert_ne!(shifted, next_seed);
        assert_ne!(
            random_double(&mut SamplerConfig::seeded(0).worker_rng(1)),
            random_double(&mut SamplerConfig::seeded(1).worker_rng(0))
        );
    }

    #[test]
    fn single_threaded_rng_is_reproducible() {
        let config = SamplerConfig::seeded(7);

        assert_eq!(
            random_double(&mut config.rng()),
            random_double(&mut config.rng())
        );
        assert_eq!(
            random_double(&mut config.rng()),
            random_double(&mut config.worker_rng(0))
        );
    }

    #[test]
    fn config_from_env() {
        // The only test touching SEED_VAR.
        env::remove_var(SEED_VAR);
        assert_eq!(SamplerConfig::from_env(), Ok(SamplerConfig::default()));

        env::set_var(SEED_VAR, "99");
        assert_eq!(SamplerConfig::from_env(), Ok(SamplerConfig::seeded(99)));

        env::set_var(SEED_VAR, "ninety-nine");
        assert_eq!(
            SamplerConfig::from_env(),
            Err(Error::InvalidSeed("ninety-nine".to_string()))
        );

        #[cfg(unix)]
        {
            use std::{ffi::OsString, os::unix::ffi::OsStringExt};

            env::set_var(SEED_VAR, OsString::from_vec(vec![b'4', 0xff, b'2']));
            assert!(matches!(
                SamplerConfig::from_env(),
                Err(Error::InvalidSeed(_))
            ));
        }

        env::remove_var(SEED_VAR);
    }

    #[test]
    fn parse_seed() {
        assert_eq!(SamplerConfig::parse(" 1234\n"), Ok(SamplerConfig::seeded(1234)));
        assert_eq!(
            SamplerConfig::parse("-5"),
            Err(Error::InvalidSeed("-5".to_string()))
        );
        assert_eq!(SamplerConfig::default().seed, None);
    }
}
