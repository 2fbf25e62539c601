//! Metrics Ticker values
//!
//! Seven independent electrical readings, each regenerated as
//! `baseline + (u - 0.5) * width` with `u` uniform in `[0, 1)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Baseline, jitter width and display precision of one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub baseline: f64,
    pub width: f64,
    pub decimals: usize,
}

impl Band {
    const fn new(baseline: f64, width: f64, decimals: usize) -> Self {
        Self {
            baseline,
            width,
            decimals,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.baseline + (rng.gen::<f64>() - 0.5) * self.width
    }

    /// Inclusive lower and exclusive upper bound of generated values
    pub fn bounds(&self) -> (f64, f64) {
        let half = self.width / 2.0;
        (self.baseline - half, self.baseline + half)
    }
}

/// The seven displayed readings, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    Voltage,
    Current,
    ActivePower,
    ReactivePower,
    PhasorMagnitude,
    PhasorPhase,
    Frequency,
}

impl Reading {
    pub const ALL: [Reading; 7] = [
        Reading::Voltage,
        Reading::Current,
        Reading::ActivePower,
        Reading::ReactivePower,
        Reading::PhasorMagnitude,
        Reading::PhasorPhase,
        Reading::Frequency,
    ];

    pub fn band(&self) -> Band {
        match self {
            Reading::Voltage => Band::new(230.0, 5.0, 1),
            Reading::Current => Band::new(15.0, 2.0, 1),
            Reading::ActivePower => Band::new(3.5, 0.5, 1),
            Reading::ReactivePower => Band::new(0.8, 0.3, 1),
            Reading::PhasorMagnitude => Band::new(1.02, 0.05, 2),
            Reading::PhasorPhase => Band::new(-5.2, 2.0, 1),
            Reading::Frequency => Band::new(50.0, 0.1, 2),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reading::Voltage => "Voltage",
            Reading::Current => "Current",
            Reading::ActivePower => "Active Power",
            Reading::ReactivePower => "Reactive Power",
            Reading::PhasorMagnitude => "PMU Magnitude",
            Reading::PhasorPhase => "PMU Phase",
            Reading::Frequency => "Frequency",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Reading::Voltage => "V",
            Reading::Current => "A",
            Reading::ActivePower => "kW",
            Reading::ReactivePower => "kVAR",
            Reading::PhasorMagnitude => "p.u.",
            Reading::PhasorPhase => "°",
            Reading::Frequency => "Hz",
        }
    }
}

/// One tick's worth of readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub voltage: f64,
    pub current: f64,
    pub active_power: f64,
    pub reactive_power: f64,
    pub phasor_magnitude: f64,
    pub phasor_phase: f64,
    pub frequency: f64,
}

impl MetricSample {
    /// Every reading exactly at its baseline
    pub fn baseline() -> Self {
        Self::from_fn(|r| r.band().baseline)
    }

    /// Draw a fresh, uncorrelated sample
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_fn(|r| r.band().sample(rng))
    }

    fn from_fn(mut f: impl FnMut(Reading) -> f64) -> Self {
        Self {
            voltage: f(Reading::Voltage),
            current: f(Reading::Current),
            active_power: f(Reading::ActivePower),
            reactive_power: f(Reading::ReactivePower),
            phasor_magnitude: f(Reading::PhasorMagnitude),
            phasor_phase: f(Reading::PhasorPhase),
            frequency: f(Reading::Frequency),
        }
    }

    pub fn get(&self, reading: Reading) -> f64 {
        match reading {
            Reading::Voltage => self.voltage,
            Reading::Current => self.current,
            Reading::ActivePower => self.active_power,
            Reading::ReactivePower => self.reactive_power,
            Reading::PhasorMagnitude => self.phasor_magnitude,
            Reading::PhasorPhase => self.phasor_phase,
            Reading::Frequency => self.frequency,
        }
    }

    /// Display text for each slot, in display order
    pub fn formatted(&self) -> [String; 7] {
        Reading::ALL.map(|r| format!("{:.*}", r.band().decimals, self.get(r)))
    }

    pub fn readouts(&self) -> Vec<Readout> {
        Reading::ALL
            .iter()
            .zip(self.formatted())
            .map(|(reading, text)| Readout {
                reading: *reading,
                label: reading.label().to_string(),
                value: self.get(*reading),
                text,
                unit: reading.unit().to_string(),
            })
            .collect()
    }
}

impl Default for MetricSample {
    fn default() -> Self {
        Self::baseline()
    }
}

/// A reading as displayed on a metric card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub reading: Reading,
    pub label: String,
    pub value: f64,
    pub text: String,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..10_000 {
            let sample = MetricSample::generate(&mut rng);
            assert!((227.5..=232.5).contains(&sample.voltage));
            assert!((49.95..=50.05).contains(&sample.frequency));

            for reading in Reading::ALL {
                let (lo, hi) = reading.band().bounds();
                let v = sample.get(reading);
                assert!(v >= lo && v <= hi, "{:?} = {} outside [{}, {}]", reading, v, lo, hi);
            }
        }
    }

    #[test]
    fn test_formatting_precision() {
        let sample = MetricSample {
            voltage: 229.96,
            current: 15.04,
            active_power: 3.449,
            reactive_power: 0.81,
            phasor_magnitude: 1.0234,
            phasor_phase: -5.26,
            frequency: 49.987,
        };

        assert_eq!(
            sample.formatted(),
            ["230.0", "15.0", "3.4", "0.8", "1.02", "-5.3", "49.99"].map(String::from)
        );
    }

    #[test]
    fn test_baseline() {
        let sample = MetricSample::baseline();
        assert_eq!(sample.voltage, 230.0);
        assert_eq!(sample.phasor_phase, -5.2);
        assert_eq!(sample.readouts().len(), 7);
        assert_eq!(sample.readouts()[6].unit, "Hz");
    }
}
