mod data;
mod engine;
mod simulation;
mod viewport;

pub use data::{
    ForceGraph, GraphData, GraphMetadata, GraphNode, GraphNodeKind, GraphSettings, LinkData,
    file_color, file_radius, folder_radius,
};
pub use engine::{EngineState, GraphEngine};
pub use simulation::Simulation;
pub use viewport::{ClickAction, Tooltip, Viewport};
