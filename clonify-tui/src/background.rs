//! Animated backdrop drawn behind the panels while no result is shown.
//!
//! All coordinates are braille dots (two per cell horizontally, four
//! vertically) with the origin at the top left. The simulation is stepped once
//! per UI tick and is fully determined by its seed, the viewport and the
//! pointer positions fed to it.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (r, g, b) of indigo, violet, teal and pink.
pub const PALETTE: [(u8, u8, u8); 4] = [(99, 102, 241), (139, 92, 246), (6, 214, 160), (247, 37, 133)];

/// Dots of viewport area per particle.
const AREA_PER_PARTICLE: f64 = 500.0;
const POINTER_RADIUS: f64 = 40.0;
const SHAPE_POINTER_RADIUS: f64 = 50.0;
const PUSH_STRENGTH: f64 = 2.0;
const PULSE_STEP: f64 = 0.02;
const CONNECTION_ALPHA: f64 = 0.2;
pub const TRAIL_LEN: usize = 8;
const TRAIL_EASE: f64 = 0.1;
pub const WAVE_LAYERS: usize = 3;
const WAVE_STEP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub max_particles: usize,
    pub shapes: usize,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_particles: 150,
            shapes: 8,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub current_size: f64,
    pub opacity: f64,
    pub color: usize,
    pub phase: f64,
    pub connect_dist: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub color: usize,
}

impl Shape {
    /// Outline vertices after rotation. Empty for circles.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        let s = self.size;
        let local: &[(f64, f64)] = match self.kind {
            ShapeKind::Circle => return Vec::new(),
            ShapeKind::Triangle => &[(0.0, -s), (-s * 0.866, s * 0.5), (s * 0.866, s * 0.5)],
            ShapeKind::Square => &[
                (-s / 2.0, -s / 2.0),
                (s / 2.0, -s / 2.0),
                (s / 2.0, s / 2.0),
                (-s / 2.0, s / 2.0),
            ],
        };
        let (sin, cos) = self.rotation.sin_cos();
        local
            .iter()
            .map(|&(lx, ly)| (self.x + lx * cos - ly * sin, self.y + lx * sin + ly * cos))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

/// A line between two nearby particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub opacity: f64,
}

pub struct Scene {
    width: f64,
    height: f64,
    time: f64,
    pointer: Option<(f64, f64)>,
    particles: Vec<Particle>,
    shapes: Vec<Shape>,
    trail: Vec<TrailPoint>,
}

fn signed(rng: &mut StdRng, half_range: f64) -> f64 {
    rng.gen_range(-half_range..=half_range)
}

impl Scene {
    pub fn new(width: f64, height: f64, cfg: SceneConfig) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let mut rng = StdRng::seed_from_u64(cfg.seed);

        let count = ((width * height / AREA_PER_PARTICLE) as usize)
            .min(cfg.max_particles)
            .max(1);
        let particles = (0..count)
            .map(|_| {
                let size = rng.gen_range(1.0..3.0);
                Particle {
                    x: rng.gen_range(0.0..=width),
                    y: rng.gen_range(0.0..=height),
                    vx: signed(&mut rng, 0.25),
                    vy: signed(&mut rng, 0.25),
                    size,
                    current_size: size,
                    opacity: rng.gen_range(0.2..0.7),
                    color: rng.gen_range(0..PALETTE.len()),
                    phase: rng.gen_range(0.0..TAU),
                    connect_dist: rng.gen_range(20.0..45.0),
                }
            })
            .collect();

        let shapes = (0..cfg.shapes)
            .map(|_| Shape {
                kind: match rng.gen_range(0..3) {
                    0 => ShapeKind::Circle,
                    1 => ShapeKind::Triangle,
                    _ => ShapeKind::Square,
                },
                x: rng.gen_range(0.0..=width),
                y: rng.gen_range(0.0..=height),
                vx: signed(&mut rng, 0.075),
                vy: signed(&mut rng, 0.075),
                size: rng.gen_range(5.0..12.5),
                opacity: rng.gen_range(0.05..0.15),
                rotation: rng.gen_range(0.0..TAU),
                rotation_speed: signed(&mut rng, 0.005),
                color: rng.gen_range(0..PALETTE.len()),
            })
            .collect();

        let trail = (0..TRAIL_LEN)
            .map(|i| TrailPoint {
                x: 0.0,
                y: 0.0,
                opacity: 1.0 - i as f64 / TRAIL_LEN as f64,
            })
            .collect();

        Self {
            width,
            height,
            time: 0.0,
            pointer: None,
            particles,
            shapes,
            trail,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn trail(&self) -> &[TrailPoint] {
        &self.trail
    }

    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        let x = x.clamp(0.0, self.width);
        let y = y.clamp(0.0, self.height);
        if self.pointer.is_none() {
            // Start the trail under the pointer instead of sweeping in from the corner.
            for p in &mut self.trail {
                p.x = x;
                p.y = y;
            }
        }
        self.pointer = Some((x, y));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Change the viewport. The population is kept; everything is clamped
    /// back inside.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        for p in &mut self.particles {
            p.x = p.x.clamp(0.0, self.width);
            p.y = p.y.clamp(0.0, self.height);
        }
        for s in &mut self.shapes {
            s.x = s.x.clamp(-s.size, self.width + s.size);
            s.y = s.y.clamp(-s.size, self.height + s.size);
        }
        for t in &mut self.trail {
            t.x = t.x.clamp(0.0, self.width);
            t.y = t.y.clamp(0.0, self.height);
        }
        if let Some((x, y)) = self.pointer {
            self.pointer = Some((x.clamp(0.0, self.width), y.clamp(0.0, self.height)));
        }
    }

    /// Advance one frame. `dt` is the elapsed time in seconds and only drives
    /// the waves; motion is per frame.
    pub fn step(&mut self, dt: f64) {
        self.time += dt;
        self.step_particles();
        self.step_shapes();
        self.step_trail();
    }

    fn step_particles(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            if p.x <= 0.0 || p.x >= w {
                p.vx = -p.vx;
            }
            if p.y <= 0.0 || p.y >= h {
                p.vy = -p.vy;
            }

            if let Some((px, py)) = self.pointer {
                let dx = px - p.x;
                let dy = py - p.y;
                let d = (dx * dx + dy * dy).sqrt();
                if d > 0.0 && d < POINTER_RADIUS {
                    let force = (POINTER_RADIUS - d) / POINTER_RADIUS;
                    p.x -= dx / d * force * PUSH_STRENGTH;
                    p.y -= dy / d * force * PUSH_STRENGTH;
                }
            }
            p.x = p.x.clamp(0.0, w);
            p.y = p.y.clamp(0.0, h);

            p.phase += PULSE_STEP;
            p.current_size = p.size + p.phase.sin() * 0.5;
        }
    }

    fn step_shapes(&mut self) {
        let (w, h) = (self.width, self.height);
        for s in &mut self.shapes {
            s.x += s.vx;
            s.y += s.vy;
            s.rotation += s.rotation_speed;
            if s.x <= -s.size || s.x >= w + s.size {
                s.vx = -s.vx;
            }
            if s.y <= -s.size || s.y >= h + s.size {
                s.vy = -s.vy;
            }

            let near = self.pointer.and_then(|(px, py)| {
                let d = ((px - s.x).powi(2) + (py - s.y).powi(2)).sqrt();
                (d < SHAPE_POINTER_RADIUS).then_some(d)
            });
            s.opacity = match near {
                Some(d) => {
                    let force = (SHAPE_POINTER_RADIUS - d) / SHAPE_POINTER_RADIUS;
                    (s.opacity + force * 0.1).min(0.3)
                }
                None => (s.opacity - 0.005).max(0.05),
            };
        }
    }

    fn step_trail(&mut self) {
        let Some(mut target) = self.pointer else {
            return;
        };
        for p in &mut self.trail {
            p.x += (target.0 - p.x) * TRAIL_EASE;
            p.y += (target.1 - p.y) * TRAIL_EASE;
            target = (p.x, p.y);
        }
    }

    /// Pairs `i < j` closer than particle `i`'s connection distance.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                if d < a.connect_dist {
                    out.push(Connection {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        opacity: (1.0 - d / a.connect_dist) * CONNECTION_ALPHA,
                    });
                }
            }
        }
        out
    }

    /// Sample points of wave `layer` (0..WAVE_LAYERS) across the viewport.
    pub fn wave(&self, layer: usize) -> Vec<(f64, f64)> {
        let h = self.height;
        let t = self.time;
        let i = layer as f64;
        (0..=self.width as usize)
            .step_by(WAVE_STEP)
            .map(|x| {
                let x = x as f64;
                let y = h * 0.5
                    + (x * 0.04 + t * 2.0 + i * PI * 0.5).sin() * h * 0.2
                    + (x * 0.02 + t * 1.5 + i * PI * 0.3).sin() * h * 0.1;
                (x, y)
            })
            .collect()
    }
}

/// Scale `rgb` toward black by `opacity`, keeping a floor so faint elements
/// stay visible on dark terminals.
pub fn fade((r, g, b): (u8, u8, u8), opacity: f64) -> (u8, u8, u8) {
    let k = 0.25 + 0.75 * opacity.clamp(0.0, 1.0);
    let f = |c: u8| (c as f64 * k).round() as u8;
    (f(r), f(g), f(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(w: f64, h: f64) -> Scene {
        Scene::new(w, h, SceneConfig { seed: 7, ..Default::default() })
    }

    #[test]
    fn population_scales_with_area_and_is_capped() {
        assert_eq!(scene(100.0, 50.0).particles().len(), 10);
        assert_eq!(scene(1000.0, 1000.0).particles().len(), 150);
        assert_eq!(scene(2.0, 2.0).particles().len(), 1);
        let capped = Scene::new(1000.0, 1000.0, SceneConfig { max_particles: 12, shapes: 3, seed: 1 });
        assert_eq!(capped.particles().len(), 12);
        assert_eq!(capped.shapes().len(), 3);
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = scene(160.0, 96.0);
        let mut b = scene(160.0, 96.0);
        for _ in 0..50 {
            a.step(0.04);
            b.step(0.04);
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.shapes(), b.shapes());
    }

    #[test]
    fn initial_values_stay_in_their_ranges() {
        let s = scene(400.0, 200.0);
        for p in s.particles() {
            assert!((1.0..3.0).contains(&p.size));
            assert!((0.2..0.7).contains(&p.opacity));
            assert!((20.0..45.0).contains(&p.connect_dist));
            assert!(p.vx.abs() <= 0.25 && p.vy.abs() <= 0.25);
        }
        for sh in s.shapes() {
            assert!((5.0..12.5).contains(&sh.size));
            assert!((0.05..0.15).contains(&sh.opacity));
        }
    }

    #[test]
    fn particles_stay_inside_viewport() {
        let mut s = scene(120.0, 80.0);
        s.set_pointer(60.0, 40.0);
        for _ in 0..2_000 {
            s.step(0.04);
        }
        for p in s.particles() {
            assert!((0.0..=120.0).contains(&p.x), "x={}", p.x);
            assert!((0.0..=80.0).contains(&p.y), "y={}", p.y);
        }
    }

    #[test]
    fn pointer_pushes_nearby_particle_away() {
        let mut s = scene(200.0, 200.0);
        s.particles[0] = Particle {
            x: 100.0,
            y: 100.0,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            current_size: 2.0,
            opacity: 0.5,
            color: 0,
            phase: 0.0,
            connect_dist: 30.0,
        };
        s.set_pointer(110.0, 100.0);
        s.step(0.04);
        // d = 10, force = 0.75, pushed 1.5 dots to the left.
        assert!((s.particles()[0].x - 98.5).abs() < 1e-9);
        assert!((s.particles()[0].y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn edge_bounce_negates_velocity() {
        let mut s = scene(100.0, 100.0);
        s.particles[0].x = 99.9;
        s.particles[0].vx = 0.2;
        s.step(0.04);
        assert!(s.particles()[0].vx < 0.0);
    }

    #[test]
    fn connections_follow_distance_rule() {
        let mut s = Scene::new(200.0, 200.0, SceneConfig { max_particles: 3, shapes: 0, seed: 3 });
        s.particles.truncate(2);
        s.particles[0].x = 10.0;
        s.particles[0].y = 10.0;
        s.particles[0].connect_dist = 40.0;
        s.particles[1].x = 30.0;
        s.particles[1].y = 10.0;
        let c = s.connections();
        assert_eq!(c.len(), 1);
        assert!((c[0].opacity - 0.1).abs() < 1e-9);

        s.particles[1].x = 60.0;
        assert!(s.connections().is_empty());
    }

    #[test]
    fn shape_opacity_rises_near_pointer_and_decays_away() {
        let mut s = scene(200.0, 200.0);
        s.shapes[0].x = 50.0;
        s.shapes[0].y = 50.0;
        s.shapes[0].vx = 0.0;
        s.shapes[0].vy = 0.0;
        s.shapes[0].opacity = 0.1;
        s.set_pointer(50.0, 50.0);
        for _ in 0..10 {
            s.step(0.04);
        }
        assert!((s.shapes()[0].opacity - 0.3).abs() < 1e-9);

        s.set_pointer(199.0, 199.0);
        for _ in 0..200 {
            s.step(0.04);
        }
        assert!((s.shapes()[0].opacity - 0.05).abs() < 1e-9);
    }

    #[test]
    fn trail_eases_toward_pointer_in_chain() {
        let mut s = scene(100.0, 100.0);
        s.set_pointer(10.0, 10.0);
        s.set_pointer(20.0, 10.0);
        s.step(0.04);
        let t = s.trail();
        assert!((t[0].x - 11.0).abs() < 1e-9);
        assert!((t[1].x - 10.1).abs() < 1e-9);
        assert_eq!(t.len(), TRAIL_LEN);
        assert!((t[4].opacity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn resize_keeps_population_and_clamps() {
        let mut s = scene(400.0, 400.0);
        let n = s.particles().len();
        s.resize(50.0, 20.0);
        assert_eq!(s.particles().len(), n);
        assert!(s.particles().iter().all(|p| p.x <= 50.0 && p.y <= 20.0));
        assert!(
            s.shapes()
                .iter()
                .all(|sh| sh.x <= 50.0 + sh.size && sh.y <= 20.0 + sh.size)
        );
    }

    #[test]
    fn wave_is_sampled_every_two_dots() {
        let s = scene(10.0, 40.0);
        let pts = s.wave(0);
        let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        // At t = 0 and x = 0 the first layer sits on the midline.
        assert!((pts[0].1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fade_darkens_but_keeps_a_floor() {
        assert_eq!(fade((200, 100, 0), 1.0), (200, 100, 0));
        assert_eq!(fade((200, 100, 0), 0.0), (50, 25, 0));
    }
}
