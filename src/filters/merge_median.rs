//! MergeMedian: per-pixel median of all connected inputs.

use crate::config::MergeMedianConfig;
use crate::core::context::InputContext;
use crate::core::error::{ConfigError, NodeId, RenderError, ValidationError};
use crate::core::node::{Category, NodeMetadata, Operator};
use crate::core::port::ParameterDefinition;
use crate::core::row::Row;
use crate::core::types::{span, BBox, ChannelSet, ImageInfo};
use crate::filters::bbox::{resolve_geometry, BBoxPolicy};
use crate::filters::median::{merge_channel, MedianScratch};
use log::{debug, trace};

/// Class name the operator is registered under.
pub const CLASS: &str = "MergeMedian";

/// Help text shown by the host.
pub const HELP: &str = "Returns the median of all connected inputs pixel-by-pixel.";

/// Fewest inputs the operator accepts.
pub const MINIMUM_INPUTS: usize = 2;

/// Most inputs the operator accepts.
pub const MAXIMUM_INPUTS: usize = 100;

/// Name of the bounding-box knob.
pub const BBOX_KNOB: &str = "bbox";

const BBOX_TOOLTIP: &str = "Clip one input to match the other if wanted";

/// Label of input `input` when `input_count` inputs are connected.
///
/// Input 0 is "B". Input 1 is "A" with exactly two inputs, "A1" otherwise.
/// Later inputs are "A2", "A3", and so on.
pub fn input_label(input: usize, input_count: usize) -> String {
    match input {
        0 => "B".to_string(),
        1 if input_count < 3 => "A".to_string(),
        n => format!("A{}", n),
    }
}

/// Median merge of 2 to 100 aligned inputs.
///
/// Holds only its configuration: every call is a pure function of the
/// inputs, so one instance can serve concurrent engine calls.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeMedian {
    node_id: NodeId,
    bbox: BBoxPolicy,
}

impl MergeMedian {
    /// Create an operator with the default (union) bounding box.
    pub fn new() -> Self {
        Self::with_bbox(BBoxPolicy::default())
    }

    /// Create an operator with the given bounding-box policy.
    pub fn with_bbox(bbox: BBoxPolicy) -> Self {
        Self {
            node_id: NodeId::new(),
            bbox,
        }
    }

    /// Create an operator from a loaded configuration.
    pub fn from_config(config: &MergeMedianConfig) -> Self {
        Self::with_bbox(config.bbox)
    }

    /// Current bounding-box policy.
    pub fn bbox(&self) -> BBoxPolicy {
        self.bbox
    }

    /// Change the bounding-box policy.
    pub fn set_bbox(&mut self, bbox: BBoxPolicy) {
        self.bbox = bbox;
    }

    /// Set a parameter by name from its option string.
    ///
    /// The value is checked against the parameter's declared constraints
    /// before it is applied.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let unknown_option = |reason: String| ConfigError::UnknownOption {
            parameter: name.to_string(),
            value: value.to_string(),
            reason,
        };

        let metadata = self.metadata();
        let definition = metadata
            .get_parameter(name)
            .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))?;
        definition.validate(value).map_err(unknown_option)?;

        match name {
            BBOX_KNOB => {
                self.bbox = value.parse().map_err(unknown_option)?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownParameter(name.to_string())),
        }
    }

    /// Current value of a parameter as its option string.
    pub fn parameter(&self, name: &str) -> Result<&'static str, ConfigError> {
        match name {
            BBOX_KNOB => Ok(self.bbox.name()),
            _ => Err(ConfigError::UnknownParameter(name.to_string())),
        }
    }

    fn collect_metadata(&self, inputs: &dyn InputContext) -> Result<Vec<ImageInfo>, ValidationError> {
        (0..inputs.input_count())
            .map(|input| {
                inputs.metadata(input).ok_or(ValidationError::MissingInput {
                    node_id: self.node_id,
                    input,
                })
            })
            .collect()
    }
}

impl Default for MergeMedian {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for MergeMedian {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder(CLASS)
            .help(HELP)
            .category(Category::Merge)
            .version("1.0.0")
            .author("Mark Spindler")
            .inputs(MINIMUM_INPUTS, MAXIMUM_INPUTS)
            .default_channels(ChannelSet::rgba())
            .parameter(
                ParameterDefinition::new(BBOX_KNOB, BBoxPolicy::default().name())
                    .with_display_name("set bbox to")
                    .with_tooltip(BBOX_TOOLTIP)
                    .with_options(BBoxPolicy::NAMES),
            )
            .build()
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn input_label(&self, input: usize, input_count: usize) -> String {
        input_label(input, input_count)
    }

    fn validate(&self, inputs: &dyn InputContext, for_real: bool) -> Result<ImageInfo, ValidationError> {
        self.metadata()
            .check_input_count(self.node_id, inputs.input_count())?;
        let infos = self.collect_metadata(inputs)?;
        let info = resolve_geometry(self.node_id, self.bbox, &infos)?;

        debug!(
            "{} {}: validate(for_real={}) bbox={} policy={} channels={} inputs={}",
            CLASS,
            self.node_id,
            for_real,
            info.bbox,
            self.bbox,
            info.channels,
            infos.len()
        );
        Ok(info)
    }

    fn request(
        &self,
        inputs: &dyn InputContext,
        region: BBox,
        channels: ChannelSet,
        count: u32,
    ) -> Result<(), ValidationError> {
        let input_count = inputs.input_count();
        self.metadata().check_input_count(self.node_id, input_count)?;

        for input in 0..input_count {
            inputs.request_region(input, region, channels, count);
        }
        Ok(())
    }

    fn engine(
        &self,
        inputs: &dyn InputContext,
        y: i32,
        x: i32,
        r: i32,
        channels: ChannelSet,
        out: &mut Row,
    ) -> Result<(), RenderError> {
        let input_count = inputs.input_count();
        if input_count < MINIMUM_INPUTS {
            return Err(ValidationError::TooFewInputs {
                node_id: self.node_id,
                connected: input_count,
                minimum: MINIMUM_INPUTS,
            }
            .into());
        }

        // Channels no input carries are skipped, not written as zeros.
        let present = (0..input_count)
            .filter_map(|input| inputs.metadata(input))
            .fold(ChannelSet::empty(), |acc, info| acc.union(&info.channels));
        let channels = channels.intersection(&present);

        trace!(
            "{} {}: engine y={} x={}..{} channels={} inputs={}",
            CLASS,
            self.node_id,
            y,
            x,
            r,
            channels,
            input_count
        );

        let width = span(x, r);
        if width == 0 || channels.is_empty() {
            return Ok(());
        }
        if x < out.x() || r > out.r() {
            return Err(RenderError::RowOutOfRange {
                x,
                r,
                row_x: out.x(),
                row_r: out.r(),
            });
        }
        let offset = span(out.x(), x);
        let mut scratch = MedianScratch::with_capacity(width, input_count);

        for channel in channels.iter() {
            let segment = &mut out.writable(channel)[offset..offset + width];
            merge_channel(inputs, y, x, r, channel, &mut scratch, segment)?;
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}
