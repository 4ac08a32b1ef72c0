//! Velocity-based force simulation.
//!
//! Each tick cools `alpha`, accumulates velocity from the active forces and
//! moves every free node by its damped velocity. Pinned nodes take part in
//! every force calculation but never move.

use std::{collections::HashMap, f32::consts::PI};

use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng};

use meridian_core::Point;

use crate::config::ForceOptions;

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.6;
const COLLISION_STRENGTH: f32 = 0.7;
const JITTER_SEED: u64 = 0x6d65_7269_6469_616e;

/// Radius of the first seed position on the phyllotaxis spiral.
const SEED_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    /// Share of the correction applied to the target.
    bias: f32,
    strength: f32,
}

/// Pull of every free node toward the center of its cluster.
#[derive(Debug, Clone)]
pub struct ClusterPull {
    /// Cluster center per node.
    pub centers: Vec<Point>,
    pub strength: f32,
}

#[derive(Debug)]
pub struct Simulation {
    positions: Vec<Point>,
    velocities: Vec<Point>,
    pinned: Vec<bool>,
    links: Vec<Link>,
    center: Point,
    options: ForceOptions,
    clusters: Option<ClusterPull>,
    alpha: f32,
    alpha_decay: f32,
    rng: StdRng,
}

impl Simulation {
    /// Creates a simulation over `positions`.
    ///
    /// Free nodes at a non-finite position, and free nodes sharing their exact
    /// position with another free node, are seeded on a phyllotaxis spiral
    /// around the area center. Every other free node starts where it is.
    pub fn new(
        mut positions: Vec<Point>,
        pinned: Vec<bool>,
        edges: impl IntoIterator<Item = (usize, usize)>,
        options: &ForceOptions,
    ) -> Self {
        let center = Point::new(options.width / 2.0, options.height / 2.0);
        seed_positions(&mut positions, &pinned, center);

        let edges: Vec<(usize, usize)> = edges.into_iter().collect();
        let mut counts = vec![0usize; positions.len()];
        for &(s, t) in &edges {
            counts[s] += 1;
            counts[t] += 1;
        }

        let link_strength = options.link_strength.clamp(0.0, 1.0);
        let links = edges
            .iter()
            .map(|&(source, target)| {
                let (cs, ct) = (counts[source] as f32, counts[target] as f32);
                Link {
                    source,
                    target,
                    bias: cs / (cs + ct),
                    strength: link_strength / cs.min(ct),
                }
            })
            .collect();

        let iterations = options.iterations.max(1) as f32;
        let node_count = positions.len();

        Self {
            positions,
            velocities: vec![Point::default(); node_count],
            pinned,
            links,
            center,
            options: options.clone(),
            clusters: None,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / iterations),
            rng: StdRng::seed_from_u64(JITTER_SEED),
        }
    }

    /// Adds a pull toward per-node cluster centers.
    pub fn with_clusters(mut self, clusters: ClusterPull) -> Self {
        debug_assert_eq!(clusters.centers.len(), self.positions.len());
        self.clusters = Some(clusters);
        self
    }

    /// Runs the configured number of ticks and returns the final positions.
    pub fn run(mut self) -> Vec<Point> {
        for tick in 0..self.options.iterations {
            self.tick();
            if tick % 50 == 0 {
                trace!(tick, alpha = self.alpha; "Force simulation progress");
            }
        }
        self.positions
    }

    fn tick(&mut self) {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;

        self.apply_charge();
        self.apply_links();
        self.apply_centering();
        self.apply_clusters();
        self.apply_collisions();

        for i in 0..self.positions.len() {
            if self.pinned[i] {
                self.velocities[i] = Point::default();
                continue;
            }

            let velocity = self.velocities[i].scale(VELOCITY_DECAY);
            let next = self.positions[i].add_point(velocity);
            if next.is_finite() && velocity.is_finite() {
                self.velocities[i] = velocity;
                self.positions[i] = next;
            } else {
                self.velocities[i] = Point::default();
            }
        }
    }

    /// Pairwise repulsion scaled by `alpha / d²`.
    fn apply_charge(&mut self) {
        let strength = self.options.charge_strength;
        if strength == 0.0 {
            return;
        }

        let n = self.positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.separation(i, j);
                let mut distance_sq = delta.x() * delta.x() + delta.y() * delta.y();
                // Soften the singularity for nodes closer than one unit
                if distance_sq < 1.0 {
                    distance_sq = distance_sq.sqrt().max(f32::EPSILON);
                }

                let push = delta.scale(strength * self.alpha / distance_sq);
                self.velocities[i] = self.velocities[i].add_point(push);
                self.velocities[j] = self.velocities[j].sub_point(push);
            }
        }
    }

    /// Springs toward `link_distance`, split between endpoints by degree.
    fn apply_links(&mut self) {
        for k in 0..self.links.len() {
            let link = self.links[k];
            let source = self.positions[link.source].add_point(self.velocities[link.source]);
            let target = self.positions[link.target].add_point(self.velocities[link.target]);

            let mut delta = target.sub_point(source);
            if delta.is_zero() {
                delta = self.jitter();
            }
            let length = delta.hypot();
            let correction = delta
                .scale((length - self.options.link_distance) / length * self.alpha * link.strength);

            self.velocities[link.target] =
                self.velocities[link.target].sub_point(correction.scale(link.bias));
            self.velocities[link.source] =
                self.velocities[link.source].add_point(correction.scale(1.0 - link.bias));
        }
    }

    fn apply_centering(&mut self) {
        let factor = self.options.center_strength.clamp(0.0, 1.0) * self.alpha;
        if factor == 0.0 {
            return;
        }
        for (position, velocity) in self.positions.iter().zip(self.velocities.iter_mut()) {
            *velocity = velocity.add_point(self.center.sub_point(*position).scale(factor));
        }
    }

    fn apply_clusters(&mut self) {
        let Some(clusters) = &self.clusters else {
            return;
        };
        let factor = clusters.strength * self.alpha;
        for i in 0..self.positions.len() {
            let pull = clusters.centers[i].sub_point(self.positions[i]).scale(factor);
            self.velocities[i] = self.velocities[i].add_point(pull);
        }
    }

    /// Pushes apart nodes closer than `collision_radius`, half to each side.
    fn apply_collisions(&mut self) {
        let radius = self.options.collision_radius;
        if radius <= 0.0 {
            return;
        }

        let n = self.positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let next_i = self.positions[i].add_point(self.velocities[i]);
                let next_j = self.positions[j].add_point(self.velocities[j]);
                let mut delta = next_i.sub_point(next_j);
                if delta.is_zero() {
                    delta = self.jitter();
                }
                let distance = delta.hypot();
                if distance >= radius {
                    continue;
                }

                let push = delta.scale((radius - distance) / distance * COLLISION_STRENGTH * 0.5);
                self.velocities[i] = self.velocities[i].add_point(push);
                self.velocities[j] = self.velocities[j].sub_point(push);
            }
        }
    }

    /// Vector from node `j` to node `i`, jittered when the two coincide.
    fn separation(&mut self, i: usize, j: usize) -> Point {
        let delta = self.positions[j].sub_point(self.positions[i]);
        if delta.is_zero() { self.jitter() } else { delta }
    }

    fn jitter(&mut self) -> Point {
        Point::new(
            self.rng.random_range(-0.5..0.5) * 1e-3,
            self.rng.random_range(-0.5..0.5) * 1e-3,
        )
    }
}

fn seed_positions(positions: &mut [Point], pinned: &[bool], center: Point) {
    let mut occupancy: HashMap<(u32, u32), usize> = HashMap::new();
    for (position, &pinned) in positions.iter().zip(pinned) {
        if !pinned && position.is_finite() {
            *occupancy.entry(position_bits(*position)).or_default() += 1;
        }
    }

    let golden_angle = PI * (3.0 - 5f32.sqrt());
    let mut seeded = 0usize;
    for (position, &pinned) in positions.iter_mut().zip(pinned) {
        let shared = occupancy
            .get(&position_bits(*position))
            .is_some_and(|&count| count > 1);
        if pinned || (position.is_finite() && !shared) {
            continue;
        }
        let radius = SEED_RADIUS * (0.5 + seeded as f32).sqrt();
        let angle = seeded as f32 * golden_angle;
        *position = center.polar_offset(radius, angle);
        seeded += 1;
    }
}

/// Hashable form of a position; `-0.0` and `0.0` map to the same key.
fn position_bits(position: Point) -> (u32, u32) {
    ((position.x() + 0.0).to_bits(), (position.y() + 0.0).to_bits())
}
