//! Particle burst layer
//!
//! Cosmetic floating symbols triggered by session events. Every particle is
//! time-bounded: it is created with a fixed animation duration and the sweep
//! removes it exactly once when that duration elapses, so the field never
//! grows without bound.

use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Money,
    Zzz,
}

impl ParticleKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            ParticleKind::Money => "$",
            ParticleKind::Zzz => "z",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub id: Uuid,
    pub kind: ParticleKind,
    /// Horizontal position as a percentage of the screen width, in [10, 90)
    pub x: f32,
    /// Horizontal drift over the full animation, in points
    pub drift: f32,
    /// Total rotation over the full animation, in degrees
    pub spin: f32,
    /// Animation length in seconds
    pub duration: f64,
    /// Spawn timestamp on the UI clock
    pub spawned_at: f64,
}

impl Particle {
    /// Animation progress in [0, 1] at `now`
    pub fn progress(&self, now: f64) -> f32 {
        (((now - self.spawned_at) / self.duration).clamp(0.0, 1.0)) as f32
    }

    pub fn expired(&self, now: f64) -> bool {
        now - self.spawned_at >= self.duration
    }
}

/// Stateless-per-event burst generator with time-driven cleanup
#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles of one kind at randomized positions
    pub fn burst(&mut self, kind: ParticleKind, count: usize, now: f64) {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            self.particles.push(Particle {
                id: Uuid::new_v4(),
                kind,
                x: rng.gen_range(10.0..90.0),
                drift: rng.gen_range(-200.0..200.0),
                spin: rng.gen_range(-360.0..360.0),
                duration: rng.gen_range(2.5..4.5),
                spawned_at: now,
            });
        }
    }

    /// Remove expired particles; returns the ids removed (each id exactly once)
    pub fn sweep(&mut self, now: f64) -> Vec<Uuid> {
        let mut removed = Vec::new();
        self.particles.retain(|particle| {
            if particle.expired(now) {
                removed.push(particle.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_burst_spawns_in_bounds() {
        let mut field = ParticleField::new();
        field.burst(ParticleKind::Money, 50, 0.0);

        assert_eq!(field.len(), 50);
        for particle in field.iter() {
            assert!(particle.x >= 10.0 && particle.x < 90.0);
            assert!(particle.duration >= 2.5 && particle.duration < 4.5);
        }
    }

    #[test]
    fn test_every_particle_removed_exactly_once() {
        let mut field = ParticleField::new();
        field.burst(ParticleKind::Money, 20, 0.0);
        field.burst(ParticleKind::Zzz, 20, 0.0);

        let spawned: HashSet<Uuid> = field.iter().map(|p| p.id).collect();
        assert_eq!(spawned.len(), 40);

        let mut removed = HashSet::new();
        // Sweep repeatedly across the whole lifetime window.
        for step in 0..60 {
            let now = step as f64 * 0.1;
            for id in field.sweep(now) {
                assert!(removed.insert(id), "particle removed twice");
            }
        }

        assert!(field.is_empty());
        assert_eq!(removed, spawned);
    }

    #[test]
    fn test_sweep_keeps_live_particles() {
        let mut field = ParticleField::new();
        field.burst(ParticleKind::Zzz, 5, 10.0);

        assert!(field.sweep(10.5).is_empty());
        assert_eq!(field.len(), 5);
    }

    #[test]
    fn test_progress_clamps() {
        let mut field = ParticleField::new();
        field.burst(ParticleKind::Money, 1, 100.0);
        let particle = field.iter().next().unwrap();

        assert_eq!(particle.progress(99.0), 0.0);
        assert_eq!(particle.progress(1000.0), 1.0);
        assert!(particle.progress(100.0 + particle.duration / 2.0) > 0.4);
    }
}
