//! Viewer settings and arrow tunables
//!
//! Persisted in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::DrawLayer;

/// What a variation's node count is divided by to get its weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeightBaseline {
    /// Total nodes of the whole search
    #[default]
    SearchTotal,
    /// Nodes of the rank 0 variation
    TopVariation,
}

/// Arrow selection constant sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArrowPreset {
    #[default]
    Current,
    Legacy,
}

impl ArrowPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowPreset::Current => "Current",
            ArrowPreset::Legacy => "Legacy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "current" => Some(ArrowPreset::Current),
            "legacy" | "old" => Some(ArrowPreset::Legacy),
            _ => None,
        }
    }

    /// Selector tunables for this preset
    pub fn tunables(&self) -> ArrowTunables {
        match self {
            ArrowPreset::Current => ArrowTunables::default(),
            ArrowPreset::Legacy => ArrowTunables {
                maneuver_cost: 1.0,
                response_threshold: 0.0,
                maneuver_step_decay: 1.0,
                baseline: WeightBaseline::TopVariation,
                ..ArrowTunables::default()
            },
        }
    }
}

/// Arrow selector tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowTunables {
    /// Ranks at or beyond this index are never drawn
    pub max_variations: usize,
    /// Weight below which nothing is drawn
    pub min_weight: f64,
    /// Minimum first-move weight for the reply arrow to be offered
    pub response_threshold: f64,
    /// Total cost all selected arrows may consume
    pub arrow_budget: f64,
    /// Cost of a maneuver arrow (first move and reply cost 1)
    pub maneuver_cost: f64,
    /// Reply weight relative to its first move
    pub response_factor: f64,
    /// Weight of the mover's first maneuver step (ply 2)
    pub maneuver_factor: f64,
    /// Weight of the replier's first maneuver step (ply 3)
    pub response_maneuver_factor: f64,
    /// Extra decay for every further step of a maneuver chain
    pub maneuver_step_decay: f64,
    pub baseline: WeightBaseline,
}

impl Default for ArrowTunables {
    fn default() -> Self {
        Self {
            max_variations: 9,
            min_weight: 1.0 / 25.0,
            response_threshold: 1.0 / 10.0,
            arrow_budget: 10.0,
            maneuver_cost: 0.5,
            response_factor: 1.0 / 2.0,
            maneuver_factor: 1.0 / 4.0,
            response_maneuver_factor: 1.0 / 6.0,
            maneuver_step_decay: 3.0 / 4.0,
            baseline: WeightBaseline::SearchTotal,
        }
    }
}

impl ArrowTunables {
    /// Clamp decay factors into [0, 1] so derived weights never grow, and
    /// costs to strictly positive values
    pub fn sanitized(mut self) -> Self {
        let unit = |x: f64| if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        self.response_factor = unit(self.response_factor);
        self.maneuver_factor = unit(self.maneuver_factor);
        self.response_maneuver_factor = unit(self.response_maneuver_factor);
        self.maneuver_step_decay = unit(self.maneuver_step_decay);
        if !(self.maneuver_cost > 0.0) {
            self.maneuver_cost = 1.0;
        }
        if !self.arrow_budget.is_finite() {
            self.arrow_budget = 0.0;
        }
        self
    }

    /// Budget units consumed by an arrow at `ply`
    #[inline]
    pub fn cost(&self, ply: usize) -> f64 {
        if ply >= 2 { self.maneuver_cost } else { 1.0 }
    }
}

/// Drawing parameters for one arrow depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowStyle {
    /// Added to the node-share width (`None` = fixed `width_add`)
    pub width_scale: Option<f32>,
    pub width_add: f32,
    /// Curvature angle in radians (0 = straight)
    pub angle: f32,
    pub head_length: f32,
    /// Head width added on top of the shaft width (or fixed, see `width_scale`)
    pub head_extra: f32,
    pub dash_length: f32,
    pub dash_space: f32,
    pub layer: DrawLayer,
}

impl ArrowStyle {
    /// Shaft and head width for a node-share width
    pub fn widths(&self, share_width: f32) -> (f32, f32) {
        match self.width_scale {
            Some(scale) => {
                let w = share_width * scale + self.width_add;
                (w, share_width * scale + self.head_extra)
            }
            None => (self.width_add, self.head_extra),
        }
    }
}

/// Geometry tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryTunables {
    pub square_size: f32,
    /// Lateral distance covered by a fan of sibling arrows
    pub spread: f32,
    /// Engine's immediate move
    pub first_move: ArrowStyle,
    /// Expected reply
    pub reply: ArrowStyle,
    /// Maneuver continuations
    pub maneuver: ArrowStyle,
}

impl Default for GeometryTunables {
    fn default() -> Self {
        Self {
            square_size: crate::consts::SQUARE_SIZE,
            spread: 20.0,
            first_move: ArrowStyle {
                width_scale: Some(1.0),
                width_add: 4.0,
                angle: 0.0,
                head_length: 20.0,
                head_extra: 14.0,
                dash_length: 1000.0,
                dash_space: 0.0,
                layer: DrawLayer::BeforePieces,
            },
            reply: ArrowStyle {
                width_scale: Some(0.5),
                width_add: 2.0,
                angle: std::f32::consts::FRAC_PI_3,
                head_length: 10.0,
                head_extra: 8.0,
                dash_length: 10.0,
                dash_space: 10.0,
                layer: DrawLayer::AfterPieces,
            },
            maneuver: ArrowStyle {
                width_scale: None,
                width_add: 2.0,
                angle: -std::f32::consts::FRAC_PI_4,
                head_length: 5.0,
                head_extra: 10.0,
                dash_length: 3.0,
                dash_space: 3.0,
                layer: DrawLayer::AfterPieces,
            },
        }
    }
}

impl GeometryTunables {
    pub fn style_for_ply(&self, ply: usize) -> &ArrowStyle {
        match ply {
            0 => &self.first_move,
            1 => &self.reply,
            _ => &self.maneuver,
        }
    }
}

/// Viewer settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selector constant set the `arrows` tunables were derived from
    pub preset: ArrowPreset,
    pub arrows: ArrowTunables,
    pub geometry: GeometryTunables,
    /// Board seen from black's side
    pub flipped: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: ArrowPreset::Current,
            arrows: ArrowPreset::Current.tunables(),
            geometry: GeometryTunables::default(),
            flipped: false,
        }
    }
}

impl Settings {
    /// Create settings from a preset (applies preset tunables)
    pub fn from_preset(preset: ArrowPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Switch to a preset, replacing the selector tunables
    pub fn apply_preset(&mut self, preset: ArrowPreset) {
        self.preset = preset;
        self.arrows = preset.tunables();
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "broadcast_board_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
