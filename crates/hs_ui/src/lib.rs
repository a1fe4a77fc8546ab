pub mod toolbar;

pub use toolbar::{Toolbar, ToolbarActions, ToolbarStats, TOOLBAR_HEIGHT};
