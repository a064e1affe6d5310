// Single drifting point of the background. Radius, velocity and opacity are fixed
// when the particle is created, only the position moves.

use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pos: [f64; 2],
    vel: [f64; 2],
    radius: f64,
    opacity: f64,
}

impl Particle {
    pub const MIN_RADIUS: f64 = 1.0;
    pub const MAX_RADIUS: f64 = 3.0;
    pub const MAX_SPEED: f64 = 0.25;
    pub const MIN_OPACITY: f64 = 0.2;
    pub const MAX_OPACITY: f64 = 0.7;

    pub fn new(pos: [f64; 2], vel: [f64; 2], radius: f64, opacity: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            opacity,
        }
    }

    // Uniformly placed somewhere on a width x height surface
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Particle {
        let pos_x = rng.gen::<f64>() * width;
        let pos_y = rng.gen::<f64>() * height;
        let vel_x = rng.gen_range(-Particle::MAX_SPEED, Particle::MAX_SPEED);
        let vel_y = rng.gen_range(-Particle::MAX_SPEED, Particle::MAX_SPEED);
        let radius = rng.gen_range(Particle::MIN_RADIUS, Particle::MAX_RADIUS);
        let opacity = rng.gen_range(Particle::MIN_OPACITY, Particle::MAX_OPACITY);
        Particle::new([pos_x, pos_y], [vel_x, vel_y], radius, opacity)
    }

    pub fn pos(&self) -> [f64; 2] {
        self.pos
    }

    pub fn vel(&self) -> [f64; 2] {
        self.vel
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    // Moves one step along the velocity. Leaving an edge re-enters at the opposite
    // one, so the result always lies in [0, width) x [0, height).
    pub fn advance(&mut self, width: f64, height: f64) {
        self.pos[0] = wrap(self.pos[0] + self.vel[0], width);
        self.pos[1] = wrap(self.pos[1] + self.vel[1], height);
    }
}

fn wrap(value: f64, bound: f64) -> f64 {
    if bound <= 0.0 {
        return 0.0;
    }
    // rem_euclid can round up to exactly `bound` for tiny negative values
    let wrapped = value.rem_euclid(bound);
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}
