//! Когерентный шум
//!
//! Основной вариант — решёточный value noise: хэш в узлах целочисленной
//! решётки и косинусная интерполяция между ними. Альтернативный вариант
//! (`NoiseKind::OpenSimplex`) использует `fastnoise-lite` и меняет все
//! результаты генерации для тех же сидов.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};

/// Наибольшее число октав: следующие октавы уже мельче одной клетки
pub const MAX_NOISE_OCTAVES: u32 = 16;

/// Алгоритм шума для базового прохода и формы озёр
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Решёточный value noise с косинусной интерполяцией
    #[default]
    Value,
    /// OpenSimplex2 из `fastnoise-lite`
    OpenSimplex,
}

/// Value noise, полностью определяемый сидом
#[derive(Debug, Clone, Copy)]
pub struct ValueNoise {
    seed: u32,
}

impl ValueNoise {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        // Сворачиваем 64 бита в 32, чтобы старшие биты сида тоже влияли на хэш
        Self {
            seed: (seed ^ (seed >> 32)) as u32,
        }
    }

    /// Хэш узла решётки в `[0, 1)`
    #[must_use]
    pub fn lattice(&self, ix: i64, iy: i64) -> f64 {
        let mut h = self.seed.wrapping_mul(1_274_126_177)
            ^ (ix as u32).wrapping_mul(374_761_393)
            ^ (iy as u32).wrapping_mul(668_265_263);
        h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
        h ^= h >> 16;
        f64::from(h) / 4_294_967_296.0
    }

    /// Значение шума в `[-1, 1]`
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let ix = x0 as i64;
        let iy = y0 as i64;

        let fx = cosine_fade(x - x0);
        let fy = cosine_fade(y - y0);

        let top = lerp(self.lattice(ix, iy), self.lattice(ix + 1, iy), fx);
        let bottom = lerp(self.lattice(ix, iy + 1), self.lattice(ix + 1, iy + 1), fx);

        lerp(top, bottom, fy) * 2.0 - 1.0
    }

    /// Фрактальная сумма октав: каждая следующая октава вдвое слабее и вдвое
    /// чаще. Результат нормирован обратно в `[-1, 1]`.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let octaves = octaves.max(1);
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;
        for _ in 0..octaves {
            sum += self.sample(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        sum / norm
    }
}

fn cosine_fade(t: f64) -> f64 {
    (1.0 - (t * std::f64::consts::PI).cos()) * 0.5
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Поле шума, которое генератор передаёт проходам
pub enum NoiseField {
    Value { noise: ValueNoise, octaves: u32 },
    OpenSimplex(Box<FastNoiseLite>),
}

impl NoiseField {
    /// Число октав приводится к `1..=MAX_NOISE_OCTAVES`
    #[must_use]
    pub fn new(kind: NoiseKind, seed: u64, octaves: u32) -> Self {
        let octaves = octaves.clamp(1, MAX_NOISE_OCTAVES);
        match kind {
            NoiseKind::Value => NoiseField::Value {
                noise: ValueNoise::new(seed),
                octaves,
            },
            NoiseKind::OpenSimplex => {
                let mut noise = FastNoiseLite::new();
                noise.set_seed(Some(seed as i32));
                noise.set_noise_type(Some(NoiseType::OpenSimplex2));
                // Масштаб координат задают вызывающие проходы
                noise.set_frequency(Some(1.0));
                if octaves > 1 {
                    noise.set_fractal_type(Some(FractalType::FBm));
                    noise.set_fractal_octaves(i32::try_from(octaves).ok());
                }
                NoiseField::OpenSimplex(Box::new(noise))
            }
        }
    }

    /// Значение в `[-1, 1]`
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        match self {
            NoiseField::Value { noise, octaves } => noise.fractal(x, y, *octaves),
            NoiseField::OpenSimplex(noise) => {
                f64::from(noise.get_noise_2d(x as f32, y as f32)).clamp(-1.0, 1.0)
            }
        }
    }

    /// Значение, нормированное в `[0, 1]`
    #[must_use]
    pub fn sample_normalized(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y) * 0.5 + 0.5
    }
}
