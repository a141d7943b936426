//! Error/bypass classification of nodes.
//!
//! Hosts report these states through a mix of flags, widget validation and
//! colors. Each signal is checked from a fixed list, strongest first; color
//! matching is only a last resort since themes are free to reuse those colors.

use super::config::ClassifierConfig;
use super::types::GraphNode;

/// Flags that mark a node as failed, in priority order.
pub const ERROR_FLAGS: &[&str] = &["has_errors", "has_error", "error", "invalid"];

/// Flags that exclude a node from execution, in priority order.
pub const BYPASS_FLAGS: &[&str] = &["bypass", "bypassed", "muted", "disabled", "skip"];

/// Independent classification results; fill precedence is the renderer's call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeClass {
	pub is_error: bool,
	pub is_bypassed: bool,
}

pub fn classify(node: &GraphNode, config: &ClassifierConfig) -> NodeClass {
	NodeClass {
		is_error: is_error(node, config),
		is_bypassed: is_bypassed(node, config),
	}
}

pub fn is_error(node: &GraphNode, config: &ClassifierConfig) -> bool {
	ERROR_FLAGS.iter().any(|f| node.flag(f))
		|| !node.widgets_invalid.is_empty()
		|| color_matches(node.color.as_deref(), &config.error_color_tokens)
}

pub fn is_bypassed(node: &GraphNode, config: &ClassifierConfig) -> bool {
	BYPASS_FLAGS.iter().any(|f| node.flag(f))
		|| node.reports_bypassed == Some(true)
		|| node.mode == config.bypass_mode
		|| color_matches(node.color.as_deref(), &config.bypass_color_tokens)
}

fn color_matches(color: Option<&str>, tokens: &[String]) -> bool {
	let Some(color) = color.and_then(normalize_color) else {
		return false;
	};
	tokens
		.iter()
		.filter_map(|t| normalize_color(t))
		.any(|t| t == color)
}

/// Lowercase, trimmed, with `#rgb` expanded to `#rrggbb`. Empty input is `None`.
fn normalize_color(raw: &str) -> Option<String> {
	let color = raw.trim().to_ascii_lowercase();
	if color.is_empty() {
		return None;
	}
	match color.strip_prefix('#') {
		Some(hex) if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
			Some(format!("#{}", hex.chars().flat_map(|c| [c, c]).collect::<String>()))
		}
		_ => Some(color),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node() -> GraphNode {
		GraphNode::new(7, [0.0, 0.0], [100.0, 60.0])
	}

	#[test]
	fn test_plain_node_is_normal() {
		assert_eq!(
			classify(&node(), &ClassifierConfig::default()),
			NodeClass::default()
		);
	}

	#[test]
	fn test_error_signals() {
		let config = ClassifierConfig::default();
		assert!(is_error(&node().with_flag("has_errors", true), &config));
		assert!(is_error(&node().with_flag("invalid", true), &config));
		assert!(!is_error(&node().with_flag("has_errors", false), &config));

		let mut widgets = node();
		widgets.widgets_invalid.push("seed".into());
		assert!(is_error(&widgets, &config));

		let mut colored = node();
		colored.color = Some(" #FF0000 ".into());
		assert!(is_error(&colored, &config));
	}

	#[test]
	fn test_bypass_signals() {
		let config = ClassifierConfig::default();
		for flag in BYPASS_FLAGS {
			assert!(is_bypassed(&node().with_flag(flag, true), &config), "{flag}");
		}

		let mut reported = node();
		reported.reports_bypassed = Some(true);
		assert!(is_bypassed(&reported, &config));
		reported.reports_bypassed = Some(false);
		assert!(!is_bypassed(&reported, &config));

		let mut mode = node();
		mode.mode = 4;
		assert!(is_bypassed(&mode, &config));

		let mut colored = node();
		colored.color = Some("#A1309B".into());
		assert!(is_bypassed(&colored, &config));
	}

	#[test]
	fn test_bypass_mode_is_configurable() {
		let config = ClassifierConfig {
			bypass_mode: 2,
			..ClassifierConfig::default()
		};
		let mut n = node();
		n.mode = 4;
		assert!(!is_bypassed(&n, &config));
		n.mode = 2;
		assert!(is_bypassed(&n, &config));
	}

	#[test]
	fn test_states_are_reported_independently() {
		let n = node()
			.with_flag("has_errors", true)
			.with_flag("muted", true);
		let class = classify(&n, &ClassifierConfig::default());
		assert!(class.is_error);
		assert!(class.is_bypassed);
	}

	#[test]
	fn test_color_tokens_match_whole_colors() {
		let config = ClassifierConfig::default();
		let mut n = node();
		for near_miss in ["#f00ba2", "#f0f8ff", "#ff0000aa", "#ff00ffee"] {
			n.color = Some(near_miss.into());
			assert!(!is_error(&n, &config), "{near_miss}");
			assert!(!is_bypassed(&n, &config), "{near_miss}");
		}
		n.color = Some("#F00".into());
		assert!(is_error(&n, &config));
		n.color = Some("#ff00ff".into());
		assert!(is_bypassed(&n, &config));
	}

	#[test]
	fn test_empty_tokens_never_match() {
		let config = ClassifierConfig {
			error_color_tokens: vec![String::new()],
			..ClassifierConfig::default()
		};
		let mut n = node();
		n.color = Some("#222".into());
		assert!(!is_error(&n, &config));
	}
}
