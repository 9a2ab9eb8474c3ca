//! Operator trait and node metadata.
//!
//! The Operator trait is the abstraction a host compositing pipeline drives.
//! It uses a three-phase design: validation (output geometry), request
//! (which input regions will be read) and engine (producing row data).

use crate::core::context::InputContext;
use crate::core::error::{NodeId, RenderError, ValidationError};
use crate::core::port::ParameterDefinition;
use crate::core::row::Row;
use crate::core::types::{BBox, ChannelSet, ImageInfo};
use serde::{Deserialize, Serialize};

/// Category for organizing operators in a host's menus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Compositing operations
    Merge,
    /// Custom/user-defined
    #[default]
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Merge => "Merge",
            Category::Custom => "Custom",
        }
    }
}

/// Metadata describing an operator class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeMetadata {
    /// Class name the host registers the operator under (e.g., "MergeMedian")
    pub class: String,
    /// Help text
    pub help: String,
    /// Category for UI organization
    pub category: Category,
    /// Version string
    pub version: String,
    /// Author or source
    pub author: String,
    /// Minimum number of connected inputs
    pub minimum_inputs: usize,
    /// Maximum number of connected inputs
    pub maximum_inputs: usize,
    /// Channels processed when the host does not ask for others
    pub default_channels: ChannelSet,
    /// Parameter definitions
    pub parameters: Vec<ParameterDefinition>,
}

impl NodeMetadata {
    /// Create a new metadata builder.
    pub fn builder(class: impl Into<String>) -> NodeMetadataBuilder {
        NodeMetadataBuilder::new(class)
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check a connection count against the declared limits.
    pub fn check_input_count(&self, node_id: NodeId, connected: usize) -> Result<(), ValidationError> {
        if connected < self.minimum_inputs {
            return Err(ValidationError::TooFewInputs {
                node_id,
                connected,
                minimum: self.minimum_inputs,
            });
        }
        if connected > self.maximum_inputs {
            return Err(ValidationError::TooManyInputs {
                node_id,
                connected,
                maximum: self.maximum_inputs,
            });
        }
        Ok(())
    }
}

/// Builder for NodeMetadata.
pub struct NodeMetadataBuilder {
    class: String,
    help: String,
    category: Category,
    version: String,
    author: String,
    minimum_inputs: usize,
    maximum_inputs: usize,
    default_channels: ChannelSet,
    parameters: Vec<ParameterDefinition>,
}

impl NodeMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            help: String::new(),
            category: Category::Custom,
            version: "1.0.0".to_string(),
            author: String::new(),
            minimum_inputs: 1,
            maximum_inputs: 1,
            default_channels: ChannelSet::rgba(),
            parameters: Vec::new(),
        }
    }

    /// Set the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the accepted number of inputs.
    pub fn inputs(mut self, minimum: usize, maximum: usize) -> Self {
        self.minimum_inputs = minimum;
        self.maximum_inputs = maximum.max(minimum);
        self
    }

    /// Set the default channel set.
    pub fn default_channels(mut self, channels: ChannelSet) -> Self {
        self.default_channels = channels;
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Build the metadata.
    pub fn build(self) -> NodeMetadata {
        NodeMetadata {
            class: self.class,
            help: self.help,
            category: self.category,
            version: self.version,
            author: self.author,
            minimum_inputs: self.minimum_inputs,
            maximum_inputs: self.maximum_inputs,
            default_channels: self.default_channels,
            parameters: self.parameters,
        }
    }
}

/// An image operator driven by a scanline compositing host.
///
/// # Design
///
/// 1. **Validation** (`validate`): called once per processing pass. Computes
///    the output geometry from the inputs' geometry. Pure: no state is kept
///    between calls.
///
/// 2. **Request** (`request`): tells every input which region and channels
///    will be read, before any engine call.
///
/// 3. **Engine** (`engine`): fills one row segment for a set of channels.
///    Called many times, in any order, possibly from several threads at once.
///
/// # Thread Safety
///
/// `Send + Sync` bounds allow a host to call `engine` concurrently for
/// different rows, ranges or channels.
pub trait Operator: Send + Sync {
    /// Get the metadata for this operator.
    fn metadata(&self) -> NodeMetadata;

    /// Identifier of this operator instance.
    fn node_id(&self) -> NodeId;

    /// Human-readable name of input `input` when `input_count` are connected.
    fn input_label(&self, input: usize, input_count: usize) -> String;

    /// Compute the output geometry.
    ///
    /// `for_real` is false when the host only needs a quick estimate.
    fn validate(&self, inputs: &dyn InputContext, for_real: bool) -> Result<ImageInfo, ValidationError>;

    /// Forward a region request to the inputs.
    fn request(
        &self,
        inputs: &dyn InputContext,
        region: BBox,
        channels: ChannelSet,
        count: u32,
    ) -> Result<(), ValidationError>;

    /// Fill columns `x..r` of row `y` for every channel in `channels`.
    fn engine(
        &self,
        inputs: &dyn InputContext,
        y: i32,
        x: i32,
        r: i32,
        channels: ChannelSet,
        out: &mut Row,
    ) -> Result<(), RenderError>;

    /// Clone this operator into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Operator>;
}

// Allow cloning Box<dyn Operator>
impl Clone for Box<dyn Operator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let metadata = NodeMetadata::builder("TestOp")
            .category(Category::Merge)
            .help("A test operator")
            .inputs(2, 5)
            .parameter(ParameterDefinition::new("mode", "a").with_options(["a", "b"]))
            .build();

        assert_eq!(metadata.class, "TestOp");
        assert_eq!(metadata.category, Category::Merge);
        assert_eq!(metadata.minimum_inputs, 2);
        assert_eq!(metadata.maximum_inputs, 5);
        assert!(metadata.get_parameter("mode").is_some());
        assert!(metadata.get_parameter("other").is_none());
    }

    #[test]
    fn test_check_input_count() {
        let metadata = NodeMetadata::builder("TestOp").inputs(2, 3).build();
        let node_id = NodeId::new();

        assert!(metadata.check_input_count(node_id, 2).is_ok());
        assert!(metadata.check_input_count(node_id, 3).is_ok());
        assert!(matches!(
            metadata.check_input_count(node_id, 1),
            Err(ValidationError::TooFewInputs { connected: 1, minimum: 2, .. })
        ));
        assert!(matches!(
            metadata.check_input_count(node_id, 4),
            Err(ValidationError::TooManyInputs { connected: 4, maximum: 3, .. })
        ));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Merge.display_name(), "Merge");
        assert_eq!(Category::default(), Category::Custom);
    }
}
