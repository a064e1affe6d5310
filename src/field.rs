//! The particle field: an owned batch of particles sized to the drawing surface.
//!
//! `ParticleField` holds all mutable animation state. An external driver calls
//! [`ParticleField::update`] once per display refresh and forwards resize and
//! visibility notifications to [`ParticleField::resize`],
//! [`ParticleField::pause`] and [`ParticleField::resume`]. Nothing in here
//! touches the DOM, so it runs (and is tested) natively as well as in wasm.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::renderer::Surface;
use rand::Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A line between two particles, `a < b`, indices into [`ParticleField::particles`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f64,
}

/// Snapshot of the field handed out to JavaScript.
#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub particle_count: u32,
    /// Links drawn during the most recent frame.
    pub link_count: u32,
    pub frames: u32,
    pub running: bool,
    pub width: u32,
    pub height: u32,
}

pub struct ParticleField {
    width: u32,
    height: u32,
    config: FieldConfig,
    particles: Vec<Particle>,
    links: Vec<Link>,
    running: bool,
    frames: u32,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        config: FieldConfig,
        rng: &mut R,
    ) -> ParticleField {
        let mut field = ParticleField {
            width,
            height,
            config,
            particles: Vec::new(),
            links: Vec::new(),
            running: true,
            frames: 0,
        };
        field.regenerate(rng);
        field
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Links drawn during the most recent frame.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_small_screen(&self) -> bool {
        self.config.is_small_screen(self.width)
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            particle_count: self.particles.len() as u32,
            link_count: self.links.len() as u32,
            frames: self.frames,
            running: self.running,
            width: self.width,
            height: self.height,
        }
    }

    /// Throws away every particle and builds a fresh batch for the new size.
    /// The density class is re-evaluated, so crossing the small-screen width
    /// changes the particle count as well.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: u32, height: u32, rng: &mut R) {
        self.width = width;
        self.height = height;
        self.regenerate(rng);
    }

    /// Stops updates. Positions stay where they are until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Returns true when the field was paused, i.e. the caller has to schedule
    /// a frame again. A field that is already running is left alone.
    pub fn resume(&mut self) -> bool {
        let was_paused = !self.running;
        self.running = true;
        was_paused
    }

    /// One animation frame: clear, move and draw every particle, then link
    /// close pairs. Does nothing while paused.
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if !self.running {
            return;
        }
        let (width, height) = (f64::from(self.width), f64::from(self.height));
        let accent = self.config.accent;

        surface.clear(width, height);
        for particle in &mut self.particles {
            particle.advance(width, height);
            surface.fill_circle(particle.pos(), particle.radius(), accent, particle.opacity());
        }

        self.collect_links();
        for link in &self.links {
            surface.stroke_line(
                self.particles[link.a].pos(),
                self.particles[link.b].pos(),
                self.config.link_width,
                accent,
                link.opacity,
            );
        }

        self.frames = self.frames.wrapping_add(1);
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.config.particle_count(self.width, self.height);
        let (width, height) = (f64::from(self.width), f64::from(self.height));
        self.particles = (0..count)
            .map(|_| Particle::random(rng, width, height))
            .collect();
        self.links.clear();
    }

    // Plain O(n^2) pass over all pairs. The divisor already bounds n for each
    // device class, small screens skip the pass entirely.
    fn collect_links(&mut self) {
        self.links.clear();
        if self.is_small_screen() {
            return;
        }
        for (a, first) in self.particles.iter().enumerate() {
            for (offset, second) in self.particles[a + 1..].iter().enumerate() {
                let distance = vecmath::vec2_len(vecmath::vec2_sub(first.pos(), second.pos()));
                if let Some(opacity) = link_opacity(distance, &self.config) {
                    self.links.push(Link {
                        a,
                        b: a + 1 + offset,
                        opacity,
                    });
                }
            }
        }
    }
}

/// Opacity of a link between particles `distance` apart, None when they are
/// too far apart to be linked.
pub fn link_opacity(distance: f64, config: &FieldConfig) -> Option<f64> {
    if distance < config.link_distance {
        Some((config.link_opacity * (1.0 - distance / config.link_distance)).max(0.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear(f64, f64),
        Circle([f64; 2], f64, f64),
        Line([f64; 2], [f64; 2], f64, f64),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn circles(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Circle(..)))
                .count()
        }

        fn lines(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Line(..)))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, width: f64, height: f64) {
            self.calls.push(Call::Clear(width, height));
        }

        fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, opacity: f64) {
            assert_eq!(color, Color::ACCENT);
            self.calls.push(Call::Circle(center, radius, opacity));
        }

        fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], width: f64, color: Color, opacity: f64) {
            assert_eq!(color, Color::ACCENT);
            self.calls.push(Call::Line(from, to, width, opacity));
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn field_with(width: u32, height: u32, particles: Vec<Particle>) -> ParticleField {
        let mut field = ParticleField::new(width, height, FieldConfig::default(), &mut rng());
        field.particles = particles;
        field
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 2.0, 0.5)
    }

    #[test]
    fn initial_count_follows_surface_area() {
        let field = ParticleField::new(1536, 800, FieldConfig::default(), &mut rng());
        assert_eq!(field.particles().len(), 81);
        assert!(field.is_running());

        let field = ParticleField::new(600, 800, FieldConfig::default(), &mut rng());
        assert_eq!(field.particles().len(), 16);
    }

    #[test]
    fn resize_regenerates_the_whole_batch() {
        let mut rng = rng();
        let mut field = ParticleField::new(1536, 800, FieldConfig::default(), &mut rng);
        let before = field.particles().to_vec();

        field.resize(600, 800, &mut rng);
        assert_eq!(field.width(), 600);
        assert_eq!(field.particles().len(), 16);
        for particle in field.particles() {
            assert!(before
                .iter()
                .all(|old| old.vel() != particle.vel() || old.opacity() != particle.opacity()));
        }

        field.resize(1920, 1080, &mut rng);
        assert_eq!(field.particles().len(), 138);
    }

    #[test]
    fn resize_keeps_running_state() {
        let mut rng = rng();
        let mut field = ParticleField::new(1536, 800, FieldConfig::default(), &mut rng);
        field.pause();
        field.resize(1024, 768, &mut rng);
        assert!(!field.is_running());
    }

    #[test]
    fn update_clears_then_draws_every_particle() {
        let mut field = ParticleField::new(1536, 800, FieldConfig::default(), &mut rng());
        let mut surface = RecordingSurface::default();
        field.update(&mut surface);

        assert_eq!(surface.calls[0], Call::Clear(1536.0, 800.0));
        assert_eq!(surface.circles(), 81);
        assert_eq!(surface.lines(), field.links().len());
        assert_eq!(field.stats().frames, 1);
    }

    #[test]
    fn update_moves_particles_by_their_velocity() {
        let mut field = field_with(1000, 1000, vec![Particle::new([10.0, 10.0], [0.25, -0.25], 1.5, 0.3)]);
        field.update(&mut RecordingSurface::default());
        assert_eq!(field.particles()[0].pos(), [10.25, 9.75]);
    }

    #[test]
    fn close_pair_is_linked_at_full_opacity() {
        let mut field = field_with(1000, 1000, vec![still(100.0, 100.0), still(100.0, 100.0)]);
        let mut surface = RecordingSurface::default();
        field.update(&mut surface);

        assert_eq!(field.links(), &[Link { a: 0, b: 1, opacity: 0.15 }]);
        assert!(surface
            .calls
            .contains(&Call::Line([100.0, 100.0], [100.0, 100.0], 1.0, 0.15)));
    }

    #[test]
    fn pair_at_threshold_is_not_linked() {
        let mut field = field_with(1000, 1000, vec![still(100.0, 100.0), still(220.0, 100.0)]);
        field.update(&mut RecordingSurface::default());
        assert!(field.links().is_empty());

        let mut field = field_with(1000, 1000, vec![still(100.0, 100.0), still(219.0, 100.0)]);
        field.update(&mut RecordingSurface::default());
        assert_eq!(field.links().len(), 1);
        assert!(field.links()[0].opacity > 0.0 && field.links()[0].opacity < 0.01);
    }

    #[test]
    fn small_screen_draws_no_links() {
        let mut field = field_with(767, 1000, vec![still(100.0, 100.0), still(101.0, 100.0)]);
        let mut surface = RecordingSurface::default();
        field.update(&mut surface);
        assert_eq!(surface.lines(), 0);
        assert_eq!(surface.circles(), 2);
        assert_eq!(field.stats().link_count, 0);
    }

    #[test]
    fn links_cover_every_close_unordered_pair_once() {
        let mut field = field_with(
            1000,
            1000,
            vec![still(0.0, 0.0), still(50.0, 0.0), still(100.0, 0.0), still(500.0, 500.0)],
        );
        field.update(&mut RecordingSurface::default());
        let pairs: Vec<(usize, usize)> = field.links().iter().map(|l| (l.a, l.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn paused_field_is_frozen_and_resumes_in_place() {
        let mut field = field_with(1000, 1000, vec![Particle::new([10.0, 10.0], [0.25, 0.0], 1.0, 0.5)]);
        let mut surface = RecordingSurface::default();
        field.update(&mut surface);
        field.pause();
        assert!(!field.is_running());

        for _ in 0..10 {
            field.update(&mut surface);
        }
        assert_eq!(field.particles()[0].pos(), [10.25, 10.0]);
        assert_eq!(field.stats().frames, 1);

        assert!(field.resume());
        assert!(!field.resume());
        field.update(&mut surface);
        assert_eq!(field.particles()[0].pos(), [10.5, 10.0]);
    }

    #[test]
    fn link_opacity_fades_linearly() {
        let config = FieldConfig::default();
        assert_eq!(link_opacity(0.0, &config), Some(0.15));
        assert_eq!(link_opacity(60.0, &config), Some(0.075));
        assert_eq!(link_opacity(120.0, &config), None);
        assert_eq!(link_opacity(500.0, &config), None);
        let near = link_opacity(119.999, &config).expect("linked");
        assert!(near > 0.0 && near < 1e-5);
    }

    #[test]
    fn stats_reflect_field_state() {
        let mut field = ParticleField::new(600, 800, FieldConfig::default(), &mut rng());
        field.pause();
        let stats = field.stats();
        assert_eq!(
            stats,
            FieldStats {
                particle_count: 16,
                link_count: 0,
                frames: 0,
                running: false,
                width: 600,
                height: 800,
            }
        );
        let json = serde_json::to_string(&stats).expect("serialize");
        assert!(json.contains("\"particle_count\":16"));
    }
}
