// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Uniform-edge-length layout.
//!
//! Nodes are particles in a velocity-Verlet style simulation with four forces:
//! - link: springs every consecutive pair toward a fixed pixel distance
//! - many-body: weak inverse-distance repulsion between all pairs
//! - collide: keeps circles plus half their labels from overlapping
//! - center: translates the whole layout so its mean sits at the surface centre
//!
//! The simulation runs a fixed number of ticks synchronously; nothing here depends on wall-clock
//! time. Real-world distances are ignored on purpose: every leg ends up the same length on screen.

use rand::rngs::StdRng;
use rand::Rng;

use super::node::NodePosition;
use super::surface::{Point, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct UniformConfig {
    /// Target pixel length of every leg when the mode is toggled on.
    pub link_distance: f64,
    /// Target pixel length used when the route first loads in uniform mode.
    pub initial_link_distance: f64,
    pub ticks: usize,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    pub collide_strength: f64,
    pub center_strength: f64,
    /// Fraction of velocity removed every tick.
    pub velocity_decay: f64,
    /// Alpha reached after `ticks` steps; sets the cooling rate.
    pub alpha_min: f64,
}

impl Default for UniformConfig {
    fn default() -> Self {
        Self {
            link_distance: 320.0,
            initial_link_distance: 250.0,
            ticks: 300,
            charge_strength: -30.0,
            collide_strength: 1.0,
            center_strength: 1.0,
            velocity_decay: 0.4,
            alpha_min: 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformReport {
    pub ticks: usize,
    pub final_alpha: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
}

impl Particle {
    /// Keeps the particle inside the padded area. Velocity on a blocked axis is dropped so the
    /// springs settle against the wall instead of pushing through it.
    fn confine(&mut self, surface: &Surface) {
        let x = self.x.clamp(surface.min_x(), surface.max_x());
        if x != self.x {
            self.x = x;
            self.vx = 0.0;
        }
        let y = self.y.clamp(surface.min_y(), surface.max_y());
        if y != self.y {
            self.y = y;
            self.vy = 0.0;
        }
    }
}

struct Link {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

struct Simulation<'a> {
    particles: Vec<Particle>,
    links: Vec<Link>,
    config: &'a UniformConfig,
    distance: f64,
    surface: &'a Surface,
    rng: &'a mut StdRng,
}

impl<'a> Simulation<'a> {
    fn new(
        nodes: &[NodePosition],
        config: &'a UniformConfig,
        distance: f64,
        surface: &'a Surface,
        rng: &'a mut StdRng,
    ) -> Self {
        let particles = nodes
            .iter()
            .map(|node| Particle {
                x: node.x,
                y: node.y,
                vx: 0.0,
                vy: 0.0,
                radius: node.collision_radius(),
            })
            .collect::<Vec<_>>();

        // Path degree: 1 at the ends, 2 inside.
        let degree = |idx: usize| -> f64 {
            let last = particles.len() - 1;
            if particles.len() < 2 {
                0.0
            } else if idx == 0 || idx == last {
                1.0
            } else {
                2.0
            }
        };
        let links = (1..particles.len())
            .map(|target| {
                let source = target - 1;
                let (ds, dt) = (degree(source), degree(target));
                Link { source, target, strength: 1.0 / ds.min(dt), bias: ds / (ds + dt) }
            })
            .collect();

        Self { particles, links, config, distance, surface, rng }
    }

    fn jiggle(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * 1e-6
    }

    fn apply_links(&mut self, alpha: f64) {
        for idx in 0..self.links.len() {
            let Link { source, target, strength, bias } = self.links[idx];
            let (s, t) = (self.particles[source], self.particles[target]);

            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }
            let l = x.hypot(y);
            let k = (l - self.distance) / l * alpha * strength;
            x *= k;
            y *= k;

            let t = &mut self.particles[target];
            t.vx -= x * bias;
            t.vy -= y * bias;
            let s = &mut self.particles[source];
            s.vx += x * (1.0 - bias);
            s.vy += y * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self, alpha: f64) {
        let n = self.particles.len();
        for i in 0..n {
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.particles[j].x - self.particles[i].x;
                let mut y = self.particles[j].y - self.particles[i].y;
                if x == 0.0 {
                    x = self.jiggle();
                }
                if y == 0.0 {
                    y = self.jiggle();
                }
                let mut l = x * x + y * y;
                if l < 1.0 {
                    l = l.sqrt();
                }
                let w = self.config.charge_strength * alpha / l;
                dvx += x * w;
                dvy += y * w;
            }
            self.particles[i].vx += dvx;
            self.particles[i].vy += dvy;
        }
    }

    fn apply_collide(&mut self) {
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (self.particles[i], self.particles[j]);
                let r = a.radius + b.radius;
                let mut x = a.x + a.vx - b.x - b.vx;
                let mut y = a.y + a.vy - b.y - b.vy;
                let mut l = x * x + y * y;
                if l >= r * r {
                    continue;
                }
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                let l = l.sqrt();
                let k = (r - l) / l * self.config.collide_strength;
                x *= k;
                y *= k;

                let (ra, rb) = (a.radius * a.radius, b.radius * b.radius);
                let w = if ra + rb > 0.0 { rb / (ra + rb) } else { 0.5 };
                let a = &mut self.particles[i];
                a.vx += x * w;
                a.vy += y * w;
                let b = &mut self.particles[j];
                b.vx -= x * (1.0 - w);
                b.vy -= y * (1.0 - w);
            }
        }
    }

    fn apply_center(&mut self) {
        let n = self.particles.len() as f64;
        let (sx, sy) = self.particles.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        let center = self.surface.center();
        let dx = (center.x - sx / n) * self.config.center_strength;
        let dy = (center.y - sy / n) * self.config.center_strength;
        for p in &mut self.particles {
            p.x += dx;
            p.y += dy;
        }
    }

    fn tick(&mut self, alpha: f64) {
        self.apply_links(alpha);
        self.apply_charge(alpha);
        self.apply_collide();
        self.apply_center();

        let keep = 1.0 - self.config.velocity_decay;
        for p in &mut self.particles {
            p.vx *= keep;
            p.vy *= keep;
            p.x += p.vx;
            p.y += p.vy;
            p.confine(self.surface);
        }
    }
}

/// Runs the simulation from the nodes' current positions and writes the settled, clamped
/// positions back.
pub fn simulate(
    nodes: &mut [NodePosition],
    surface: &Surface,
    config: &UniformConfig,
    link_distance: f64,
    rng: &mut StdRng,
) -> UniformReport {
    if nodes.is_empty() {
        return UniformReport::default();
    }

    let alpha_decay = if config.ticks == 0 {
        0.0
    } else {
        1.0 - config.alpha_min.powf(1.0 / config.ticks as f64)
    };
    let mut alpha = 1.0;

    let mut sim = Simulation::new(nodes, config, link_distance, surface, rng);
    for _ in 0..config.ticks {
        alpha += (0.0 - alpha) * alpha_decay;
        sim.tick(alpha);
    }

    for (node, p) in nodes.iter_mut().zip(&sim.particles) {
        node.set_point(surface.clamp(Point::new(p.x, p.y)));
    }

    log::debug!(
        "uniform layout settled {} nodes after {} ticks (alpha {alpha:.5}, link {link_distance}px)",
        nodes.len(),
        config.ticks
    );
    UniformReport { ticks: config.ticks, final_alpha: alpha }
}
