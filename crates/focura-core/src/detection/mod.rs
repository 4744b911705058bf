//! Posture and phone detection.
//!
//! Inference is mocked: providers answer with randomized or scripted
//! readings. [`server`] exposes a provider over HTTP and [`client`] calls
//! such a server.

pub mod client;
pub mod server;

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use client::DetectionClient;
pub use server::{bind, router, serve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureReading {
    pub posture: Posture,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneReading {
    pub phone_detected: bool,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

pub const POSTURE_CONFIDENCE: f64 = 0.85;
pub const PHONE_DETECTED_CONFIDENCE: f64 = 0.92;
pub const PHONE_CLEAR_CONFIDENCE: f64 = 0.87;

/// Produces a reading for a captured frame.
pub trait DetectionProvider: Send + Sync {
    fn posture(&self, image: &[u8]) -> PostureReading;
    fn phone(&self, image: &[u8]) -> PhoneReading;
}

fn phone_reading(detected: bool) -> PhoneReading {
    PhoneReading {
        phone_detected: detected,
        confidence: if detected {
            PHONE_DETECTED_CONFIDENCE
        } else {
            PHONE_CLEAR_CONFIDENCE
        },
        timestamp: Utc::now(),
    }
}

fn posture_reading(posture: Posture) -> PostureReading {
    PostureReading {
        posture,
        confidence: POSTURE_CONFIDENCE,
        timestamp: Utc::now(),
    }
}

/// Coin-flip detector: good posture 70% of the time, phone seen 30%.
#[derive(Debug)]
pub struct RandomDetector {
    rng: Mutex<StdRng>,
}

impl RandomDetector {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn roll(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen::<f64>()
    }
}

impl DetectionProvider for RandomDetector {
    fn posture(&self, _image: &[u8]) -> PostureReading {
        let posture = if self.roll() > 0.3 {
            Posture::Good
        } else {
            Posture::Bad
        };
        posture_reading(posture)
    }

    fn phone(&self, _image: &[u8]) -> PhoneReading {
        phone_reading(self.roll() > 0.7)
    }
}

/// Replays queued results in order, then falls back to good posture and
/// no phone.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    postures: Mutex<VecDeque<Posture>>,
    phones: Mutex<VecDeque<bool>>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_postures(self, postures: impl IntoIterator<Item = Posture>) -> Self {
        self.postures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(postures);
        self
    }

    pub fn with_phones(self, phones: impl IntoIterator<Item = bool>) -> Self {
        self.phones
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(phones);
        self
    }
}

impl DetectionProvider for ScriptedDetector {
    fn posture(&self, _image: &[u8]) -> PostureReading {
        let next = self
            .postures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        posture_reading(next.unwrap_or(Posture::Good))
    }

    fn phone(&self, _image: &[u8]) -> PhoneReading {
        let next = self
            .phones
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        phone_reading(next.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_detector_is_reproducible() {
        let a = RandomDetector::seeded(7);
        let b = RandomDetector::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.posture(b"").posture, b.posture(b"").posture);
            assert_eq!(a.phone(b"").phone_detected, b.phone(b"").phone_detected);
        }
    }

    #[test]
    fn random_detector_confidences() {
        let detector = RandomDetector::seeded(1);
        for _ in 0..50 {
            assert_eq!(detector.posture(b"img").confidence, POSTURE_CONFIDENCE);
            let phone = detector.phone(b"img");
            let expected = if phone.phone_detected { 0.92 } else { 0.87 };
            assert_eq!(phone.confidence, expected);
        }
    }

    #[test]
    fn random_detector_mostly_good_posture() {
        let detector = RandomDetector::seeded(42);
        let good = (0..1000)
            .filter(|_| detector.posture(b"").posture == Posture::Good)
            .count();
        assert!((600..800).contains(&good), "good = {good}");
    }

    #[test]
    fn scripted_detector_replays_then_falls_back() {
        let detector = ScriptedDetector::new()
            .with_postures([Posture::Bad, Posture::Bad])
            .with_phones([true]);
        assert_eq!(detector.posture(b"").posture, Posture::Bad);
        assert_eq!(detector.posture(b"").posture, Posture::Bad);
        assert_eq!(detector.posture(b"").posture, Posture::Good);
        assert!(detector.phone(b"").phone_detected);
        assert!(!detector.phone(b"").phone_detected);
    }

    #[test]
    fn phone_reading_uses_camel_case() {
        let json = serde_json::to_value(phone_reading(true)).unwrap();
        assert_eq!(json["phoneDetected"], true);
        assert!(json.get("timestamp").is_some());
    }
}
