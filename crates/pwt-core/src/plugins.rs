//! Provide a "unified" way of adding plugins to a pwt project

use crate::project::error::ProjectResult;
use crate::project::Project;
use std::any::type_name;

pub mod extensions;

/// A plugin to apply to the project. All plugins must implement default.
pub trait Plugin: Default {
    fn apply(&self, project: &mut Project) -> ProjectResult;

    /// The id of the plugin. A plugin of a certain ID can only added once
    fn plugin_id(&self) -> &str {
        type_name::<Self>()
    }
}
