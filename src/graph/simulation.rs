use super::data::{ForceGraph, GraphNodeKind};
use petgraph::graph::NodeIndex;

pub const CENTER_FORCE: f64 = 0.002;
pub const COLLISION_FORCE: f64 = 0.8;
pub const LINK_FORCE: f64 = 0.08;
pub const REPULSION_FORCE: f64 = 800.0;
pub const DAMPING: f64 = 0.85;
pub const ALPHA: f64 = 0.5;
pub const MIN_DISTANCE: f64 = 5.0;
pub const COOLING_FACTOR: f64 = 0.995;
pub const MIN_TEMPERATURE: f64 = 0.1;
pub const REHEAT_TEMPERATURE: f64 = 0.5;

const COLLISION_PADDING: f64 = 10.0;
const EDGE_MARGIN: f64 = 50.0;
const EDGE_PUSH: f64 = 0.5;

/// Rest length of a link, by the kinds at its ends.
fn target_distance(source: GraphNodeKind, target: GraphNodeKind) -> f64 {
    match (source, target) {
        (GraphNodeKind::Root, _) => 160.0,
        (GraphNodeKind::Folder, GraphNodeKind::File) => 70.0,
        _ => 80.0,
    }
}

/// Physics state carried between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    temperature: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self { temperature: 1.0 }
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Temperature has reached its floor.
    pub fn is_cooled(&self) -> bool {
        self.temperature <= MIN_TEMPERATURE
    }

    pub fn reheat(&mut self) {
        self.temperature = REHEAT_TEMPERATURE;
    }

    /// Advance the layout by one step.
    ///
    /// `held` is a node under the pointer: it exerts forces but is neither
    /// pushed nor integrated, like a fixed node.
    pub fn step(&mut self, graph: &mut ForceGraph, held: Option<NodeIndex>) {
        let settings = *graph.settings();
        let (cx, cy) = settings.center();

        // Forces depend only on positions, so accumulate velocities against a
        // frozen copy and write back once.
        let mut bodies: Vec<Body> = graph
            .nodes()
            .map(|(idx, n)| Body {
                x: n.x,
                y: n.y,
                vx: n.vx,
                vy: n.vy,
                radius: n.radius,
                kind: n.kind,
                pinned: n.fixed || Some(idx) == held,
                fixed: n.fixed,
            })
            .collect();
        let count = bodies.len();

        for i in 0..count {
            if bodies[i].pinned {
                continue;
            }

            bodies[i].vx += (cx - bodies[i].x) * CENTER_FORCE;
            bodies[i].vy += (cy - bodies[i].y) * CENTER_FORCE;

            for j in 0..count {
                if i == j {
                    continue;
                }
                let dx = bodies[i].x - bodies[j].x;
                let dy = bodies[i].y - bodies[j].y;
                let dist_sq = dx * dx + dy * dy;
                let dist = dist_sq.sqrt();
                if dist < MIN_DISTANCE {
                    continue;
                }
                let force = REPULSION_FORCE / dist_sq;
                bodies[i].vx += dx / dist * force;
                bodies[i].vy += dy / dist * force;
            }

            for j in (i + 1)..count {
                let dx = bodies[i].x - bodies[j].x;
                let dy = bodies[i].y - bodies[j].y;
                let dist = dx.hypot(dy);
                let min_dist = bodies[i].radius + bodies[j].radius + COLLISION_PADDING;
                if dist >= min_dist || dist <= 0.0 {
                    continue;
                }
                let force = (min_dist - dist) * COLLISION_FORCE;
                let fx = dx / dist * force * 0.5;
                let fy = dy / dist * force * 0.5;
                bodies[i].vx += fx;
                bodies[i].vy += fy;
                if !bodies[j].pinned {
                    bodies[j].vx -= fx;
                    bodies[j].vy -= fy;
                }
            }
        }

        let links: Vec<(usize, usize, f64)> = graph
            .links()
            .map(|(s, t, strength)| (s.index(), t.index(), strength))
            .collect();
        for (s, t, strength) in links {
            if bodies[s].fixed || bodies[t].fixed {
                continue;
            }
            let dx = bodies[t].x - bodies[s].x;
            let dy = bodies[t].y - bodies[s].y;
            let mut dist = dx.hypot(dy);
            if dist == 0.0 {
                dist = 1.0;
            }
            let force = (dist - target_distance(bodies[s].kind, bodies[t].kind))
                * LINK_FORCE
                * strength;
            let fx = dx / dist * force;
            let fy = dy / dist * force;
            if !bodies[s].pinned {
                bodies[s].vx += fx;
                bodies[s].vy += fy;
            }
            if !bodies[t].pinned {
                bodies[t].vx -= fx;
                bodies[t].vy -= fy;
            }
        }

        let (max_x, max_y) = (settings.width - EDGE_MARGIN, settings.height - EDGE_MARGIN);
        for (i, body) in bodies.iter_mut().enumerate() {
            let node = graph.node_mut(NodeIndex::new(i));
            if body.pinned {
                continue;
            }

            body.vx *= DAMPING;
            body.vy *= DAMPING;
            node.x = body.x + body.vx * ALPHA * self.temperature;
            node.y = body.y + body.vy * ALPHA * self.temperature;

            if node.x < EDGE_MARGIN {
                body.vx += EDGE_PUSH;
            }
            if node.x > max_x {
                body.vx -= EDGE_PUSH;
            }
            if node.y < EDGE_MARGIN {
                body.vy += EDGE_PUSH;
            }
            if node.y > max_y {
                body.vy -= EDGE_PUSH;
            }
            node.vx = body.vx;
            node.vy = body.vy;
        }

        self.temperature = (self.temperature * COOLING_FACTOR).max(MIN_TEMPERATURE);
    }
}

struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    kind: GraphNodeKind,
    pinned: bool,
    fixed: bool,
}
