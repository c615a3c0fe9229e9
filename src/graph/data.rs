use crate::model::{FileEntry, extension, file_name};
use petgraph::Undirected;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::TAU;

pub const ROOT_RADIUS: f64 = 28.0;
pub const FOLDER_RING_RADIUS: f64 = 180.0;
pub const ROOT_COLOR: &str = "#58a6ff";
pub const FOLDER_COLOR: &str = "#238636";
pub const DEFAULT_FILE_COLOR: &str = "#8b949e";

/// Id of the root node. A top-level folder with this name merges into it.
pub const ROOT_ID: &str = "root";

const ROOT_LINK_STRENGTH: f64 = 0.3;
const FILE_LINK_STRENGTH: f64 = 0.5;

/// Canvas and size limits for one visualization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphSettings {
    pub width: f64,
    pub height: f64,
    pub max_files: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            width: 468.0,
            height: 600.0,
            max_files: 60,
        }
    }
}

impl GraphSettings {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphNodeKind {
    Root,
    Folder,
    File,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub kind: GraphNodeKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub color: &'static str,
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
}

impl GraphNode {
    fn at(id: impl Into<String>, kind: GraphNodeKind, x: f64, y: f64, radius: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            color: match kind {
                GraphNodeKind::Root => ROOT_COLOR,
                GraphNodeKind::Folder => FOLDER_COLOR,
                GraphNodeKind::File => DEFAULT_FILE_COLOR,
            },
            fixed: false,
            path: None,
            size: None,
            file_count: None,
        }
    }

    /// Whether a world-space point falls inside the node's circle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x - x).hypot(self.y - y) < self.radius
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphLink {
    pub strength: f64,
}

/// Display color for a file, keyed by extension.
pub fn file_color(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("js") => "#f1e05a",
        Some("jsx") => "#61dafb",
        Some("ts") | Some("tsx") => "#3178c6",
        Some("py") => "#3572A5",
        Some("dart") => "#00B4AB",
        Some("rs") => "#dea584",
        Some("go") => "#00ADD8",
        Some("java") => "#b07219",
        Some("html") => "#e34c26",
        Some("css") => "#563d7c",
        Some("scss") => "#c6538c",
        Some("json") => "#292929",
        Some("md") => "#083fa1",
        Some("yaml") | Some("yml") => "#cb171e",
        _ => DEFAULT_FILE_COLOR,
    }
}

/// Radius grows with the square root of the size and is capped at 10.
pub fn file_radius(size: u64) -> f64 {
    (4.0 + (size as f64 / 15000.0).sqrt()).min(10.0)
}

pub fn folder_radius(file_count: usize) -> f64 {
    18.0 + (file_count as f64 / 5.0).min(8.0)
}

/// Root, folder and file nodes with their spring links.
///
/// Edges are stored parent first, so `edge_endpoints` yields
/// `(source, target)` as built.
#[derive(Debug, Clone)]
pub struct ForceGraph {
    graph: Graph<GraphNode, GraphLink, Undirected>,
    root: NodeIndex,
    settings: GraphSettings,
}

impl ForceGraph {
    /// Lay out the first `max_files` non-empty files around their top-level
    /// folders. Files at the repository root hang off the root node.
    pub fn build(files: &[FileEntry], settings: GraphSettings, rng: &mut fastrand::Rng) -> Self {
        let (cx, cy) = settings.center();
        let mut graph = Graph::new_undirected();

        let mut root_node = GraphNode::at(ROOT_ID, GraphNodeKind::Root, cx, cy, ROOT_RADIUS);
        root_node.name = "Repository".to_string();
        let root = graph.add_node(root_node);

        let visible: Vec<&FileEntry> = files
            .iter()
            .filter(|f| f.size > 0)
            .take(settings.max_files)
            .collect();

        // Top-level folders in order of first appearance
        let mut buckets: Vec<(&str, usize)> = Vec::new();
        let mut bucket_of: HashMap<&str, usize> = HashMap::new();
        for file in &visible {
            if let Some((folder, _)) = file.path.split_once('/') {
                if folder == ROOT_ID {
                    continue;
                }
                let idx = *bucket_of.entry(folder).or_insert_with(|| {
                    buckets.push((folder, 0));
                    buckets.len() - 1
                });
                buckets[idx].1 += 1;
            }
        }

        let mut folder_nodes: HashMap<&str, NodeIndex> = HashMap::new();
        let count = buckets.len() as f64;
        for (i, (folder, file_count)) in buckets.iter().enumerate() {
            let angle = i as f64 / count * TAU;
            let mut node = GraphNode::at(
                *folder,
                GraphNodeKind::Folder,
                cx + angle.cos() * FOLDER_RING_RADIUS,
                cy + angle.sin() * FOLDER_RING_RADIUS,
                folder_radius(*file_count),
            );
            node.file_count = Some(*file_count);
            let idx = graph.add_node(node);
            graph.add_edge(
                root,
                idx,
                GraphLink {
                    strength: ROOT_LINK_STRENGTH,
                },
            );
            folder_nodes.insert(*folder, idx);
        }

        for file in visible {
            let parent = match file.path.split_once('/') {
                Some((folder, _)) => folder_nodes.get(folder).copied().unwrap_or(root),
                None => root,
            };
            let (px, py) = (graph[parent].x, graph[parent].y);
            let angle = rng.f64() * TAU;
            let distance = 60.0 + rng.f64() * 50.0;

            let mut node = GraphNode::at(
                file.path.clone(),
                GraphNodeKind::File,
                px + angle.cos() * distance,
                py + angle.sin() * distance,
                file_radius(file.size),
            );
            node.name = file_name(&file.path).to_string();
            node.vx = (rng.f64() - 0.5) * 2.0;
            node.vy = (rng.f64() - 0.5) * 2.0;
            node.color = file_color(&file.path);
            node.path = Some(file.path.clone());
            node.size = Some(file.size);

            let idx = graph.add_node(node);
            graph.add_edge(
                parent,
                idx,
                GraphLink {
                    strength: FILE_LINK_STRENGTH,
                },
            );
        }

        tracing::debug!(
            nodes = graph.node_count(),
            links = graph.edge_count(),
            "built force graph"
        );

        Self {
            graph,
            root,
            settings,
        }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut GraphNode {
        &mut self.graph[idx]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Links as `(source, target, strength)`.
    pub fn links(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, f64)> + '_ {
        self.graph.edge_indices().filter_map(move |e: EdgeIndex| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((a, b, self.graph[e].strength))
        })
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&idx| self.graph[idx].id == id)
    }

    /// First node, in build order, whose circle contains the world point.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].contains(x, y))
    }

    pub fn set_fixed(&mut self, idx: NodeIndex, fixed: bool) {
        self.graph[idx].fixed = fixed;
    }

    /// Total motion: Σ(|vx| + |vy|) over all nodes.
    pub fn kinetic_energy(&self) -> f64 {
        self.graph
            .node_weights()
            .map(|n| n.vx.abs() + n.vy.abs())
            .sum()
    }
}

/// Serializable snapshot of a layout for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<LinkData>,
    pub metadata: GraphMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub source: String,
    pub target: String,
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    pub width: f64,
    pub height: f64,
    pub total_files: usize,
    pub total_folders: usize,
    pub steps: u64,
    pub temperature: f64,
    pub kinetic_energy: f64,
}

impl GraphData {
    pub fn from_graph(graph: &ForceGraph, steps: u64, temperature: f64) -> Self {
        let nodes: Vec<GraphNode> = graph.nodes().map(|(_, n)| n.clone()).collect();
        let links = graph
            .links()
            .map(|(s, t, strength)| LinkData {
                source: graph.node(s).id.clone(),
                target: graph.node(t).id.clone(),
                strength,
            })
            .collect();

        let count = |kind| nodes.iter().filter(|n| n.kind == kind).count();
        let metadata = GraphMetadata {
            width: graph.settings().width,
            height: graph.settings().height,
            total_files: count(GraphNodeKind::File),
            total_folders: count(GraphNodeKind::Folder),
            steps,
            temperature,
            kinetic_energy: graph.kinetic_energy(),
        };

        GraphData {
            nodes,
            links,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(files: &[FileEntry]) -> ForceGraph {
        ForceGraph::build(files, GraphSettings::default(), &mut fastrand::Rng::with_seed(7))
    }

    #[test]
    fn test_root_level_files_link_to_root() {
        let files = vec![
            FileEntry::new("README.md", 2048),
            FileEntry::new("src/main.rs", 4096),
            FileEntry::new("src/lib.rs", 1024),
            FileEntry::new("docs/guide.md", 512),
        ];
        let graph = build(&files);

        // root + 2 folders + 4 files
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.link_count(), 6);

        let readme = graph.find("README.md").unwrap();
        let parent = graph
            .links()
            .find(|(_, t, _)| *t == readme)
            .map(|(s, _, strength)| (s, strength))
            .unwrap();
        assert_eq!(parent, (graph.root(), 0.5));

        let src = graph.find("src").unwrap();
        assert_eq!(graph.node(src).file_count, Some(2));
        assert!((graph.node(src).radius - 18.4).abs() < 1e-9);
    }

    #[test]
    fn test_caps_files_and_skips_empty() {
        let mut files: Vec<FileEntry> = (0..100)
            .map(|i| FileEntry::new(format!("src/f{}.js", i), 100))
            .collect();
        files.insert(0, FileEntry::new("src/empty.js", 0));
        let graph = build(&files);

        let file_nodes = graph
            .nodes()
            .filter(|(_, n)| n.kind == GraphNodeKind::File)
            .count();
        assert_eq!(file_nodes, 60);
        assert!(graph.find("src/empty.js").is_none());
        assert!(graph.find("src/f59.js").is_some());
        assert!(graph.find("src/f60.js").is_none());
    }

    #[test]
    fn test_initial_placement() {
        let graph = build(&[FileEntry::new("lib/a.py", 15000)]);
        let root = graph.node(graph.root());
        assert_eq!((root.x, root.y), (234.0, 300.0));
        assert_eq!(root.radius, ROOT_RADIUS);

        // single folder sits at angle 0 on the ring
        let lib = graph.node(graph.find("lib").unwrap());
        assert_eq!((lib.x, lib.y), (234.0 + 180.0, 300.0));

        let file = graph.node(graph.find("lib/a.py").unwrap());
        let distance = (file.x - lib.x).hypot(file.y - lib.y);
        assert!((60.0..=110.0).contains(&distance));
        assert!(file.vx.abs() <= 1.0 && file.vy.abs() <= 1.0);
        assert_eq!(file.radius, 5.0);
        assert_eq!(file.color, "#3572A5");
    }

    #[test]
    fn test_same_seed_same_layout() {
        let files = vec![FileEntry::new("a/b.rs", 10), FileEntry::new("c.go", 10)];
        let a = GraphData::from_graph(&build(&files), 0, 1.0);
        let b = GraphData::from_graph(&build(&files), 0, 1.0);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.metadata.total_files, 2);
        assert_eq!(a.metadata.total_folders, 1);
        assert_eq!(a.links[0].source, "root");
    }

    #[test]
    fn test_folder_named_root_merges_into_root_node() {
        let graph = build(&[FileEntry::new("root/a.rs", 10), FileEntry::new("b.rs", 10)]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.nodes().filter(|(_, n)| n.id == ROOT_ID).count(), 1);
        let links: Vec<(String, String)> = graph
            .links()
            .map(|(s, t, _)| (graph.node(s).id.clone(), graph.node(t).id.clone()))
            .collect();
        assert_eq!(
            links,
            vec![
                ("root".to_string(), "root/a.rs".to_string()),
                ("root".to_string(), "b.rs".to_string()),
            ]
        );
    }

    #[test]
    fn test_kinetic_energy_sums_absolute_velocities() {
        let mut graph = build(&[FileEntry::new("a.rs", 10)]);
        let root = graph.root();
        let file = graph.find("a.rs").unwrap();
        graph.node_mut(root).vx = 0.0;
        graph.node_mut(root).vy = 0.0;
        graph.node_mut(file).vx = -3.0;
        graph.node_mut(file).vy = 4.0;
        assert_eq!(graph.kinetic_energy(), 7.0);
    }

    #[test]
    fn test_colors_and_radius() {
        assert_eq!(file_color("web/App.JSX"), "#61dafb");
        assert_eq!(file_color("config.yml"), "#cb171e");
        assert_eq!(file_color("Makefile"), DEFAULT_FILE_COLOR);
        assert_eq!(file_radius(10_000_000), 10.0);
        assert_eq!(folder_radius(100), 26.0);
    }
}
