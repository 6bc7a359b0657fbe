//! Plugins: registries of filter functions.

use std::sync::Arc;

use thiserror::Error;

use crate::core::Core;
use crate::frame::FrameRef;
use crate::map::Map;
use crate::node::{FrameSource, GetFrameError, Node};
use crate::plugins::{Filter, FilterFunction, Metadata};
use crate::video_info::VideoInfo;

/// The error type for plugin registration and invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Function {0} is already registered")]
    DuplicateFunction(String),
    #[error("No function named {0}")]
    NoSuchFunction(String),
    #[error("Function {0} didn't return a clip")]
    NoOutput(String),
}

/// A plugin and the filter functions it exports.
///
/// Plugins are populated by an explicit initialization function called once by the host, such as
/// `avs_motion::filter::plugin_init()`.
pub struct Plugin {
    metadata: Metadata,
    functions: Vec<Box<dyn FilterFunction>>,
}

impl Plugin {
    /// Creates an empty plugin.
    #[inline]
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            functions: Vec::new(),
        }
    }

    /// Returns the plugin metadata.
    #[inline]
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    /// Registers a filter function.
    pub fn register_function<F: FilterFunction + 'static>(
        &mut self,
        filter_function: F,
    ) -> Result<(), Error> {
        if self.get_plugin_function_by_name(filter_function.name()).is_some() {
            return Err(Error::DuplicateFunction(filter_function.name().to_owned()));
        }

        self.functions.push(Box::new(filter_function));
        Ok(())
    }

    /// Returns a plugin function by name.
    ///
    /// Returns `None` if no function with the given name exists.
    #[inline]
    pub fn get_plugin_function_by_name(&self, name: &str) -> Option<PluginFunction<'_>> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .map(|f| PluginFunction { function: &**f })
    }

    /// Returns all exported functions, in registration order.
    #[inline]
    pub fn functions(&self) -> impl Iterator<Item = PluginFunction<'_>> {
        self.functions
            .iter()
            .map(|f| PluginFunction { function: &**f })
    }

    /// Invokes a filter.
    ///
    /// Creates the filter from `args` and wraps it in a node whose frames are produced on `core`.
    pub fn invoke(&self, core: &Arc<dyn Core>, name: &str, args: &Map) -> anyhow::Result<Node> {
        let function = self
            .get_plugin_function_by_name(name)
            .ok_or_else(|| Error::NoSuchFunction(name.to_owned()))?;

        let filter = function
            .function
            .create(&**core, args)?
            .ok_or_else(|| Error::NoOutput(name.to_owned()))?;

        Ok(Node::new(FilterNode {
            filter,
            core: Arc::clone(core),
        }))
    }
}

/// A plugin function.
#[derive(Clone, Copy)]
pub struct PluginFunction<'a> {
    function: &'a dyn FilterFunction,
}

impl<'a> PluginFunction<'a> {
    /// Returns the name of this plugin function.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.function.name()
    }

    /// Returns the argument specification string for this plugin function.
    #[inline]
    pub fn arguments(&self) -> &'a str {
        self.function.args()
    }
}

/// A created filter, exposed to the graph as a clip.
struct FilterNode {
    filter: Box<dyn Filter>,
    core: Arc<dyn Core>,
}

impl FrameSource for FilterNode {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.filter.video_info()
    }

    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        self.filter
            .get_frame(&*self.core, n)
            .map_err(|err| GetFrameError::Filter(format!("{:#}", err)))
    }
}
