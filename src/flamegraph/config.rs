//! Flamegraph configuration.
//!
//! One struct carries everything a pipeline run needs: canvas geometry,
//! captions, tree and collapse options, and parallelism knobs. The
//! option structs of the individual stages are derived from it.

use super::color::ColorScheme;
use super::layout::{LayoutOptions, Orientation};
use crate::aggregator::CollapseOptions;
use crate::parser::StackParser;
use crate::tree::BuildOptions;
use crate::utils::config::{
    DEFAULT_FONT_SIZE, DEFAULT_FONT_WIDTH, DEFAULT_FRAME_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_WIDTH,
    DEFAULT_XPAD, MIN_LINES_PER_WORKER, PARALLEL_LINE_THRESHOLD,
};
use crate::utils::error::ConfigError;
use serde::Serialize;

/// Flamegraph configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlamegraphConfig {
    pub title: String,
    pub subtitle: Option<String>,

    /// Canvas width in pixels
    pub width: usize,

    /// Height of one row in pixels
    pub frame_height: usize,

    /// Left and right margin in pixels
    pub xpad: usize,

    pub font_type: String,
    pub font_size: usize,

    /// Average glyph width relative to `font_size`
    pub font_width: f64,

    /// Color scheme name
    pub colors: String,

    /// Background gradient
    pub bgcolor1: String,
    pub bgcolor2: String,

    /// Unit shown in tooltips
    pub count_name: String,

    /// Draw an icicle graph (root at top)
    pub inverted: bool,

    /// Frames narrower than this many pixels are not drawn
    pub min_width: f64,

    /// 0 = unlimited
    pub max_depth: usize,

    /// Prune ratio, 0 = no pruning
    pub min_heat_threshold: f64,

    /// Also write `<output>.collapse`
    pub write_folded: bool,

    pub parallel: bool,
    pub parallel_line_threshold: usize,
    pub min_lines_per_worker: usize,

    /// `None` = available hardware parallelism
    pub max_workers: Option<usize>,

    pub min_count: u64,
    pub exclude_patterns: Vec<String>,

    /// Parser tag: `auto`, `perf` or `generic`
    pub parser: String,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Flame Graph".to_string(),
            subtitle: None,
            width: DEFAULT_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            xpad: DEFAULT_XPAD,
            font_type: "Verdana".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_width: DEFAULT_FONT_WIDTH,
            colors: "hot".to_string(),
            bgcolor1: "#eeeeee".to_string(),
            bgcolor2: "#eeeeb0".to_string(),
            count_name: "samples".to_string(),
            inverted: false,
            min_width: DEFAULT_MIN_WIDTH,
            max_depth: 0,
            min_heat_threshold: 0.0,
            write_folded: false,
            parallel: true,
            parallel_line_threshold: PARALLEL_LINE_THRESHOLD,
            min_lines_per_worker: MIN_LINES_PER_WORKER,
            max_workers: None,
            min_count: 1,
            exclude_patterns: Vec::new(),
            parser: "auto".to_string(),
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_frame_height(mut self, frame_height: usize) -> Self {
        self.frame_height = frame_height;
        self
    }

    pub fn with_colors(mut self, colors: impl Into<String>) -> Self {
        self.colors = colors.into();
        self
    }

    pub fn with_count_name(mut self, count_name: impl Into<String>) -> Self {
        self.count_name = count_name.into();
        self
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_prune_threshold(mut self, threshold: f64) -> Self {
        self.min_heat_threshold = threshold;
        self
    }

    pub fn with_folded(mut self, write_folded: bool) -> Self {
        self.write_folded = write_folded;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_line_threshold(mut self, lines: usize) -> Self {
        self.parallel_line_threshold = lines;
        self
    }

    pub fn with_min_lines_per_worker(mut self, lines: usize) -> Self {
        self.min_lines_per_worker = lines;
        self
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    pub fn with_min_count(mut self, min_count: u64) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = parser.into();
        self
    }

    /// Check the values the pipeline depends on
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - with a message naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 2 * self.xpad {
            return Err(ConfigError::Invalid(format!(
                "width ({}) must be larger than twice the padding ({})",
                self.width, self.xpad
            )));
        }
        if self.frame_height == 0 {
            return Err(ConfigError::Invalid("frame height must be positive".to_string()));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("font size must be positive".to_string()));
        }
        if !(self.font_width > 0.0 && self.font_width <= 1.0) {
            return Err(ConfigError::Invalid(
                "font width must be between 0 and 1".to_string(),
            ));
        }
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(ConfigError::Invalid(
                "min width cannot be negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_heat_threshold) {
            return Err(ConfigError::Invalid(format!(
                "prune threshold must be between 0 and 1, got {}",
                self.min_heat_threshold
            )));
        }
        if self.min_lines_per_worker == 0 {
            return Err(ConfigError::Invalid(
                "min lines per worker must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn stack_parser(&self) -> StackParser {
        StackParser::from_tag(&self.parser)
    }

    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme::from_name(&self.colors)
    }

    pub fn orientation(&self) -> Orientation {
        if self.inverted {
            Orientation::Icicle
        } else {
            Orientation::Flamegraph
        }
    }

    /// Space above the frames: title, plus subtitle if present
    pub fn top_padding(&self) -> usize {
        let subtitle = match &self.subtitle {
            Some(text) if !text.is_empty() => self.font_size * 2,
            _ => 0,
        };
        self.font_size * 3 + subtitle
    }

    /// Space below the frames for the details line
    pub fn bottom_padding(&self) -> usize {
        self.font_size * 2 + 10
    }

    pub fn collapse_options(&self) -> CollapseOptions {
        CollapseOptions {
            min_count: self.min_count,
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            max_depth: self.max_depth,
            prune_threshold: (self.min_heat_threshold > 0.0).then_some(self.min_heat_threshold),
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            canvas_width: self.width as f64,
            margin: self.xpad as f64,
            row_height: self.frame_height as f64,
            top_padding: self.top_padding() as f64,
            bottom_padding: self.bottom_padding() as f64,
            orientation: self.orientation(),
            min_width: self.min_width,
            color_scheme: self.color_scheme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FlamegraphConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = vec![
            FlamegraphConfig::new().with_width(20),
            FlamegraphConfig::new().with_frame_height(0),
            FlamegraphConfig::new().with_min_width(-1.0),
            FlamegraphConfig::new().with_min_width(f64::NAN),
            FlamegraphConfig::new().with_prune_threshold(1.5),
            FlamegraphConfig::new().with_min_lines_per_worker(0),
            FlamegraphConfig {
                font_width: 0.0,
                ..Default::default()
            },
            FlamegraphConfig {
                font_size: 0,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_padding_grows_with_subtitle() {
        let config = FlamegraphConfig::new();
        assert_eq!(config.top_padding(), 36);
        assert_eq!(config.bottom_padding(), 34);

        let config = config.with_subtitle("release build");
        assert_eq!(config.top_padding(), 60);
    }

    #[test]
    fn test_derived_options() {
        let config = FlamegraphConfig::new()
            .with_inverted(true)
            .with_prune_threshold(0.01)
            .with_max_depth(12)
            .with_parser("generic");

        assert_eq!(config.layout_options().orientation, Orientation::Icicle);
        assert_eq!(config.build_options().prune_threshold, Some(0.01));
        assert_eq!(config.build_options().max_depth, 12);
        assert_eq!(config.stack_parser(), StackParser::Generic);

        assert_eq!(FlamegraphConfig::new().build_options().prune_threshold, None);
    }
}
