use std::collections::HashMap;

/// Node mode the host uses for "bypass". Not taken from an authoritative
/// enumeration, so it is configurable.
pub const DEFAULT_BYPASS_MODE: i32 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
	pub bypass_mode: i32,
	/// Hex colors that mark an error. Compared whole, ignoring case and
	/// surrounding whitespace, with `#rgb` treated as `#rrggbb`.
	pub error_color_tokens: Vec<String>,
	pub bypass_color_tokens: Vec<String>,
}

impl Default for ClassifierConfig {
	fn default() -> Self {
		Self {
			bypass_mode: DEFAULT_BYPASS_MODE,
			error_color_tokens: tokens(&["#ff0000", "#f00", "#cc0000", "#dd0000"]),
			bypass_color_tokens: tokens(&["#ff00ff", "#f0f", "#a1309b", "#9c27b0"]),
		}
	}
}

fn tokens(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub node_fallback: String,
	pub group_fallback: String,
	pub link_fallback: String,
	pub link_type_colors: HashMap<String, String>,
	pub error_fill: String,
	pub error_outline: String,
	pub bypass_fill: String,
	pub active_outline: String,
	pub viewport_outline: String,
	pub link_width: f64,
	pub error_outline_width: f64,
	pub active_outline_width: f64,
	pub viewport_outline_width: f64,
}

impl Default for Theme {
	fn default() -> Self {
		let link_type_colors = [
			("CLIP", "#FFD500"),
			("CLIP_VISION", "#A8DADC"),
			("CLIP_VISION_OUTPUT", "#ad7452"),
			("CONDITIONING", "#FFA931"),
			("CONTROL_NET", "#6EE7B7"),
			("IMAGE", "#64B5F6"),
			("LATENT", "#FF9CF9"),
			("MASK", "#81C784"),
			("MODEL", "#B39DDB"),
			("STYLE_MODEL", "#C2FFAE"),
			("VAE", "#FF6E6E"),
			("INT", "#AAA"),
			("FLOAT", "#AAA"),
			("STRING", "#AAA"),
		]
		.into_iter()
		.map(|(k, v)| (k.to_owned(), v.to_owned()))
		.collect();

		Self {
			node_fallback: "#353535".into(),
			group_fallback: "#3f789e".into(),
			link_fallback: "#9A9".into(),
			link_type_colors,
			error_fill: "rgba(255, 0, 0, 0.6)".into(),
			error_outline: "#ff0000".into(),
			bypass_fill: "rgba(128, 0, 128, 0.6)".into(),
			active_outline: "#00ff00".into(),
			viewport_outline: "rgba(255, 255, 255, 0.85)".into(),
			link_width: 1.0,
			error_outline_width: 3.0,
			active_outline_width: 1.5,
			viewport_outline_width: 1.0,
		}
	}
}

impl Theme {
	/// Link override, else the per-type default, else the generic fallback.
	pub fn link_color<'a>(&'a self, link_type: &str, explicit: Option<&'a str>) -> &'a str {
		explicit
			.filter(|c| !c.is_empty())
			.or_else(|| self.link_type_colors.get(link_type).map(String::as_str))
			.unwrap_or(self.link_fallback.as_str())
	}
}

/// Viewport corner the overlay is pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Corner {
	TopLeft,
	TopRight,
	BottomLeft,
	#[default]
	BottomRight,
}

impl Corner {
	/// `top-left`, `top-right`, `bottom-left` or `bottom-right`.
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim() {
			"top-left" => Some(Corner::TopLeft),
			"top-right" => Some(Corner::TopRight),
			"bottom-left" => Some(Corner::BottomLeft),
			"bottom-right" => Some(Corner::BottomRight),
			_ => None,
		}
	}

	pub fn css(self, margin: f64) -> String {
		let (v, h) = match self {
			Corner::TopLeft => ("top", "left"),
			Corner::TopRight => ("top", "right"),
			Corner::BottomLeft => ("bottom", "left"),
			Corner::BottomRight => ("bottom", "right"),
		};
		format!("{v}: {margin}px; {h}: {margin}px;")
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimapConfig {
	pub width: u32,
	pub height: u32,
	pub margin: f64,
	pub corner: Corner,
	pub opacity: f64,
	pub fade_delay_ms: f64,
	pub render_interval_ms: i32,
	pub fade_check_interval_ms: i32,
	/// Graph-space slack added to the bounds before fitting.
	pub padding: f64,
	/// Minimum scale at which connection terminals are dotted.
	pub terminal_dot_scale: f64,
	/// Minimum on-surface width and height before a preview is attempted.
	pub preview_min_size: f64,
	pub classifier: ClassifierConfig,
	pub theme: Theme,
}

impl Default for MinimapConfig {
	fn default() -> Self {
		Self {
			width: 300,
			height: 160,
			margin: 10.0,
			corner: Corner::default(),
			opacity: 1.0,
			fade_delay_ms: 3000.0,
			render_interval_ms: 250,
			fade_check_interval_ms: 500,
			padding: 200.0,
			terminal_dot_scale: 0.15,
			preview_min_size: 24.0,
			classifier: ClassifierConfig::default(),
			theme: Theme::default(),
		}
	}
}

impl MinimapConfig {
	pub fn with_size(mut self, width: u32, height: u32) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	pub fn with_margin(mut self, margin: f64) -> Self {
		self.margin = margin;
		self
	}

	pub fn with_corner(mut self, corner: Corner) -> Self {
		self.corner = corner;
		self
	}

	pub fn with_opacity(mut self, opacity: f64) -> Self {
		self.opacity = opacity.clamp(0.0, 1.0);
		self
	}

	pub fn with_fade_delay_ms(mut self, delay: f64) -> Self {
		self.fade_delay_ms = delay.max(0.0);
		self
	}

	pub fn with_bypass_mode(mut self, mode: i32) -> Self {
		self.classifier.bypass_mode = mode;
		self
	}
}
