//! Contains the gwt plugin

use crate::extensions::PutnamiExtension;
use pwt_core::plugins::extensions::ExtensionAware;
use pwt_core::plugins::Plugin;
use pwt_core::project::error::ProjectResult;
use pwt_core::Project;

/// The name the [`PutnamiExtension`](PutnamiExtension) is registered under
pub const EXTENSION_NAME: &str = "putnami";

/// The gwt plugin
#[derive(Debug, Default)]
pub struct GwtPlugin;

impl Plugin for GwtPlugin {
    fn apply(&self, project: &mut Project) -> ProjectResult {
        let extension = PutnamiExtension::new(project.build_dir());
        project.extensions_mut().add(EXTENSION_NAME, extension)?;
        Ok(())
    }

    fn plugin_id(&self) -> &str {
        "pwt-gwt"
    }
}
