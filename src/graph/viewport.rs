use super::data::{ForceGraph, GraphNode, GraphNodeKind};
use crate::model::RepoId;
use petgraph::graph::NodeIndex;
use serde::Serialize;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.5;
pub const FOCUS_SCALE: f64 = 1.5;

/// Pan and zoom of the canvas. World coordinates map to the screen as
/// `(world + translate) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale - self.translate_x, y / self.scale - self.translate_y)
    }

    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x + self.translate_x) * self.scale,
            (y + self.translate_y) * self.scale,
        )
    }

    /// Zoom by one wheel notch, keeping the world point under the cursor in
    /// place. Scrolling down (`delta_y > 0`) zooms out.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, delta_y: f64) {
        let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);

        self.translate_x += screen_x / new_scale - screen_x / self.scale;
        self.translate_y += screen_y / new_scale - screen_y / self.scale;
        self.scale = new_scale;
    }

    /// Shift by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx / self.scale;
        self.translate_y += dy / self.scale;
    }

    /// Put a world point at the middle of a `width`×`height` canvas.
    pub fn focus(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.scale = FOCUS_SCALE;
        self.translate_x = width / 2.0 / self.scale - x;
        self.translate_y = height / 2.0 / self.scale - y;
    }
}

/// Hover text for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub detail: String,
}

impl Tooltip {
    pub fn for_node(graph: &ForceGraph, idx: NodeIndex) -> Self {
        let node = graph.node(idx);
        let detail = match node.kind {
            GraphNodeKind::File => format!(
                "{}\n{} KB",
                node.path.as_deref().unwrap_or(&node.id),
                (node.size.unwrap_or(0) as f64 / 1024.0).round()
            ),
            GraphNodeKind::Folder => format!("{} files", node.file_count.unwrap_or(0)),
            GraphNodeKind::Root => format!("{} items", graph.node_count().saturating_sub(1)),
        };
        Self {
            name: node.name.clone(),
            detail,
        }
    }
}

/// What a click on a node asks the host to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl { url: String },
    Recenter { x: f64, y: f64 },
}

impl ClickAction {
    pub fn for_node(node: &GraphNode, repo: &RepoId, branch: &str) -> Self {
        match (node.kind, node.path.as_deref()) {
            (GraphNodeKind::File, Some(path)) => ClickAction::OpenUrl {
                url: repo.blob_url(branch, path),
            },
            _ => ClickAction::Recenter {
                x: node.x,
                y: node.y,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::data::GraphSettings;
    use crate::model::FileEntry;

    #[test]
    fn test_coordinate_round_trip() {
        let view = Viewport {
            scale: 2.0,
            translate_x: -10.0,
            translate_y: 5.0,
        };
        assert_eq!(view.world_to_screen(20.0, 15.0), (20.0, 40.0));
        assert_eq!(view.screen_to_world(20.0, 40.0), (20.0, 15.0));
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_anchor() {
        let mut view = Viewport::default();
        let anchor = view.screen_to_world(100.0, 200.0);
        view.zoom_at(100.0, 200.0, -1.0);
        assert!((view.scale - 1.1).abs() < 1e-12);
        let after = view.screen_to_world(100.0, 200.0);
        assert!((anchor.0 - after.0).abs() < 1e-9);
        assert!((anchor.1 - after.1).abs() < 1e-9);

        // zooming out from a panned view keeps the anchor too
        view.pan_by(-40.0, 25.0);
        let anchor = view.screen_to_world(300.0, 50.0);
        view.zoom_at(300.0, 50.0, 1.0);
        let after = view.screen_to_world(300.0, 50.0);
        assert!((anchor.0 - after.0).abs() < 1e-9);
        assert!((anchor.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = Viewport::default();
        for _ in 0..50 {
            view.zoom_at(0.0, 0.0, 1.0);
        }
        assert_eq!(view.scale, MIN_SCALE);
        for _ in 0..50 {
            view.zoom_at(0.0, 0.0, -1.0);
        }
        assert_eq!(view.scale, MAX_SCALE);
    }

    #[test]
    fn test_focus_centers_point() {
        let mut view = Viewport::default();
        view.focus(100.0, 50.0, 468.0, 600.0);
        assert_eq!(view.scale, FOCUS_SCALE);
        let (sx, sy) = view.world_to_screen(100.0, 50.0);
        assert!((sx - 234.0).abs() < 1e-9);
        assert!((sy - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_is_scale_aware() {
        let mut view = Viewport {
            scale: 2.0,
            ..Default::default()
        };
        view.pan_by(10.0, -4.0);
        assert_eq!((view.translate_x, view.translate_y), (5.0, -2.0));
    }

    #[test]
    fn test_tooltips_and_clicks() {
        let files = vec![
            FileEntry::new("src/app.js", 3000),
            FileEntry::new("src/util.js", 100),
        ];
        let graph = ForceGraph::build(
            &files,
            GraphSettings::default(),
            &mut fastrand::Rng::with_seed(1),
        );
        let repo = RepoId::new("octo", "demo");

        let app = graph.find("src/app.js").unwrap();
        let tip = Tooltip::for_node(&graph, app);
        assert_eq!(tip.name, "app.js");
        assert_eq!(tip.detail, "src/app.js\n3 KB");
        assert_eq!(
            ClickAction::for_node(graph.node(app), &repo, "dev"),
            ClickAction::OpenUrl {
                url: "https://github.com/octo/demo/blob/dev/src/app.js".into()
            }
        );

        let folder = graph.find("src").unwrap();
        assert_eq!(Tooltip::for_node(&graph, folder).detail, "2 files");
        assert!(matches!(
            ClickAction::for_node(graph.node(folder), &repo, "dev"),
            ClickAction::Recenter { .. }
        ));
        assert_eq!(Tooltip::for_node(&graph, graph.root()).detail, "3 items");
    }
}
