use super::data::{ForceGraph, GraphData, GraphSettings};
use super::simulation::Simulation;
use super::viewport::{ClickAction, Tooltip, Viewport};
use crate::model::{FileEntry, RepoId};
use petgraph::graph::NodeIndex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    Simulating,
    /// Temperature sits at its floor; steps continue at minimum strength.
    Cooled,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pointer {
    Idle,
    Dragging(NodeIndex),
    Panning { last_x: f64, last_y: f64 },
}

/// Interactive force-directed view of a repository's files.
///
/// The host drives the engine: `start` builds the layout, `tick` advances it
/// once per frame while the view is visible, and `stop` tears it down for
/// good. Pointer events arrive in screen coordinates.
pub struct GraphEngine {
    repo: RepoId,
    branch: String,
    files: Vec<FileEntry>,
    settings: GraphSettings,
    rng: fastrand::Rng,
    state: EngineState,
    graph: Option<ForceGraph>,
    simulation: Simulation,
    viewport: Viewport,
    pointer: Pointer,
    hover: Option<NodeIndex>,
    steps: u64,
}

impl GraphEngine {
    pub fn new(
        repo: RepoId,
        branch: impl Into<String>,
        files: Vec<FileEntry>,
        settings: GraphSettings,
    ) -> Self {
        Self {
            repo,
            branch: branch.into(),
            files,
            settings,
            rng: fastrand::Rng::new(),
            state: EngineState::Uninitialized,
            graph: None,
            simulation: Simulation::new(),
            viewport: Viewport::default(),
            pointer: Pointer::Idle,
            hover: None,
            steps: 0,
        }
    }

    /// Use a fixed seed for the initial scatter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, EngineState::Simulating | EngineState::Cooled)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn temperature(&self) -> f64 {
        self.simulation.temperature()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn graph(&self) -> Option<&ForceGraph> {
        self.graph.as_ref()
    }

    pub fn hovered(&self) -> Option<NodeIndex> {
        self.hover
    }

    /// Build the layout and begin simulating. No-op unless uninitialized.
    pub fn start(&mut self) {
        if self.state != EngineState::Uninitialized {
            return;
        }
        let graph = ForceGraph::build(&self.files, self.settings, &mut self.rng);
        tracing::info!(
            repo = %self.repo,
            nodes = graph.node_count(),
            "graph simulation started"
        );
        self.graph = Some(graph);
        self.state = EngineState::Simulating;
    }

    /// Advance one frame. Hidden frames are skipped without losing state.
    /// Returns whether a step ran.
    pub fn tick(&mut self, visible: bool) -> bool {
        if !self.is_running() || !visible {
            return false;
        }
        let Some(graph) = self.graph.as_mut() else {
            return false;
        };

        let held = match self.pointer {
            Pointer::Dragging(idx) => Some(idx),
            _ => None,
        };
        self.simulation.step(graph, held);
        self.steps += 1;

        if self.state == EngineState::Simulating && self.simulation.is_cooled() {
            tracing::debug!(steps = self.steps, "graph cooled");
            self.state = EngineState::Cooled;
        }
        true
    }

    /// Run up to `steps` visible frames.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            if !self.tick(true) {
                break;
            }
        }
    }

    /// Tear down. Later ticks and pointer events do nothing.
    pub fn stop(&mut self) {
        if self.state == EngineState::TornDown {
            return;
        }
        tracing::debug!(repo = %self.repo, steps = self.steps, "graph simulation stopped");
        self.state = EngineState::TornDown;
        self.pointer = Pointer::Idle;
        self.hover = None;
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.graph.as_ref().map_or(0.0, ForceGraph::kinetic_energy)
    }

    pub fn snapshot(&self) -> Option<GraphData> {
        self.graph
            .as_ref()
            .map(|g| GraphData::from_graph(g, self.steps, self.simulation.temperature()))
    }

    fn reheat(&mut self) {
        self.simulation.reheat();
        if self.state == EngineState::Cooled {
            self.state = EngineState::Simulating;
        }
    }

    fn node_at_screen(&self, x: f64, y: f64) -> Option<NodeIndex> {
        let (wx, wy) = self.viewport.screen_to_world(x, y);
        self.graph.as_ref()?.node_at(wx, wy)
    }

    /// Grab the node under the pointer, or start panning.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !self.is_running() {
            return;
        }
        self.pointer = match self.node_at_screen(x, y) {
            Some(idx) => Pointer::Dragging(idx),
            None => Pointer::Panning {
                last_x: x,
                last_y: y,
            },
        };
        self.reheat();
    }

    /// Move the dragged node, pan, or update the hover target. Returns the
    /// tooltip of the hovered node, if any.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        if !self.is_running() {
            return None;
        }
        match self.pointer {
            Pointer::Dragging(idx) => {
                let (wx, wy) = self.viewport.screen_to_world(x, y);
                let graph = self.graph.as_mut()?;
                let node = graph.node_mut(idx);
                node.x = wx;
                node.y = wy;
                node.vx = 0.0;
                node.vy = 0.0;
                None
            }
            Pointer::Panning { last_x, last_y } => {
                self.viewport.pan_by(x - last_x, y - last_y);
                self.pointer = Pointer::Panning {
                    last_x: x,
                    last_y: y,
                };
                None
            }
            Pointer::Idle => {
                self.hover = self.node_at_screen(x, y);
                let graph = self.graph.as_ref()?;
                self.hover.map(|idx| Tooltip::for_node(graph, idx))
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer = Pointer::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = Pointer::Idle;
        self.hover = None;
    }

    /// Act on the hovered node: files open on the host, folders and the root
    /// are brought to the middle of the canvas.
    pub fn click(&mut self) -> Option<ClickAction> {
        if !self.is_running() {
            return None;
        }
        let node = self.graph.as_ref()?.node(self.hover?);
        let action = ClickAction::for_node(node, &self.repo, &self.branch);
        if let ClickAction::Recenter { x, y } = action {
            self.viewport
                .focus(x, y, self.settings.width, self.settings.height);
        }
        Some(action)
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        if self.is_running() {
            self.viewport.zoom_at(x, y, delta_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GraphEngine {
        let files = vec![
            FileEntry::new("src/main.rs", 6000),
            FileEntry::new("src/lib.rs", 3000),
            FileEntry::new("README.md", 1000),
        ];
        GraphEngine::new(
            RepoId::new("octo", "demo"),
            "main",
            files,
            GraphSettings::default(),
        )
        .with_seed(9)
    }

    fn screen_of(engine: &GraphEngine, id: &str) -> (f64, f64) {
        let graph = engine.graph().unwrap();
        let node = graph.node(graph.find(id).unwrap());
        engine.viewport().world_to_screen(node.x, node.y)
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = engine();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(!engine.tick(true));

        engine.start();
        assert_eq!(engine.state(), EngineState::Simulating);
        assert!(engine.tick(true));
        assert!(!engine.tick(false));
        assert_eq!(engine.steps(), 1);

        engine.run(600);
        assert_eq!(engine.state(), EngineState::Cooled);
        assert!(engine.kinetic_energy() > 0.0);

        engine.stop();
        let before = engine.snapshot().unwrap();
        assert!(!engine.tick(true));
        engine.run(10);
        assert_eq!(engine.steps(), before.metadata.steps);
        assert_eq!(engine.state(), EngineState::TornDown);

        // restarting a torn-down engine is not possible
        engine.start();
        assert_eq!(engine.state(), EngineState::TornDown);
    }

    #[test]
    fn test_hidden_ticks_pause_without_reset() {
        let mut engine = engine();
        engine.start();
        engine.run(5);
        let temperature = engine.temperature();
        for _ in 0..20 {
            engine.tick(false);
        }
        assert_eq!(engine.temperature(), temperature);
        assert_eq!(engine.steps(), 5);
        engine.tick(true);
        assert_eq!(engine.steps(), 6);
    }

    #[test]
    fn test_drag_moves_node_and_reheats() {
        let mut engine = engine();
        engine.start();
        engine.run(600);
        assert_eq!(engine.state(), EngineState::Cooled);

        let (sx, sy) = screen_of(&engine, "src");
        engine.pointer_down(sx, sy);
        assert_eq!(engine.state(), EngineState::Simulating);
        assert_eq!(engine.temperature(), 0.5);

        engine.pointer_move(40.0, 60.0);
        engine.tick(true);
        let graph = engine.graph().unwrap();
        let src = graph.node(graph.find("src").unwrap());
        assert_eq!((src.x, src.y), (40.0, 60.0));

        engine.pointer_up();
        engine.tick(true);
        let graph = engine.graph().unwrap();
        let src = graph.node(graph.find("src").unwrap());
        assert_ne!((src.x, src.y), (40.0, 60.0));
    }

    #[test]
    fn test_pan_on_empty_space() {
        let mut engine = engine();
        engine.start();
        engine.pointer_down(1.0, 1.0);
        engine.pointer_move(11.0, 21.0);
        engine.pointer_up();
        assert_eq!(engine.viewport().translate_x, 10.0);
        assert_eq!(engine.viewport().translate_y, 20.0);
    }

    #[test]
    fn test_hover_and_click() {
        let mut engine = engine();
        engine.start();

        let (sx, sy) = screen_of(&engine, "src/main.rs");
        let tip = engine.pointer_move(sx, sy).unwrap();
        assert_eq!(tip.name, "main.rs");
        assert_eq!(
            engine.click(),
            Some(ClickAction::OpenUrl {
                url: "https://github.com/octo/demo/blob/main/src/main.rs".into()
            })
        );

        let (sx, sy) = screen_of(&engine, "root");
        let tip = engine.pointer_move(sx, sy).unwrap();
        assert_eq!(tip.detail, "4 items");
        assert!(matches!(engine.click(), Some(ClickAction::Recenter { .. })));
        assert_eq!(engine.viewport().scale, 1.5);

        engine.pointer_leave();
        assert!(engine.click().is_none());
    }

    #[test]
    fn test_events_ignored_after_stop() {
        let mut engine = engine();
        engine.start();
        engine.stop();
        engine.wheel(0.0, 0.0, -1.0);
        engine.pointer_down(1.0, 1.0);
        engine.pointer_move(50.0, 50.0);
        assert_eq!(*engine.viewport(), Viewport::default());
        assert!(engine.click().is_none());
    }
}
