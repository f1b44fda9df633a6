use rand::Rng;
use serde::{Deserialize, Serialize};

/// Payload the sensor sends to `POST /data`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temp: f64,
    pub hum: f64,
}

/// Drifts temperature and humidity slowly, like a real room would.
#[derive(Debug, Clone)]
pub struct Sensor {
    temp: f64,
    hum: f64,
}

impl Sensor {
    pub fn new(temp: f64, hum: f64) -> Self {
        Self { temp, hum }
    }

    pub fn sample(&mut self, rng: &mut impl Rng) -> Reading {
        self.temp = (self.temp + rng.gen_range(-0.3..0.3)).clamp(-20.0, 45.0);
        self.hum = (self.hum + rng.gen_range(-1.0..1.0)).clamp(0.0, 100.0);

        Reading {
            temp: round1(self.temp),
            hum: round1(self.hum),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
