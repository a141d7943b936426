use thiserror::Error;

use super::types::NodeId;

/// Conditions that cost the minimap detail. None of them stop the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MinimapError {
	#[error("no 2d drawing context available")]
	MissingSurface,
	#[error("node {0} has no usable geometry")]
	MalformedNode(NodeId),
	#[error("group #{0} has no usable geometry")]
	MalformedGroup(usize),
	#[error("link {index} references missing node {missing}")]
	UnresolvedLink { index: usize, missing: NodeId },
}
