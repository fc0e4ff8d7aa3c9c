use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::config::types::AppConfig;
use crate::engine::EngineHandle;
use crate::params::QueryParams;
use crate::theme::ResolvedTheme;
use crate::views::dags::DagsView;

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub config: Option<&'a AppConfig>,
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub color_depth: ColorDepth,
    /// Query string the DAG list opens on.
    pub initial_location: Option<QueryParams>,
}

#[component]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let should_exit = hooks.use_state(|| false);

    // Exit handling.
    if should_exit.get() {
        system.exit();
    }

    element! {
        View(width: u32::from(width), height: u32::from(height), flex_direction: FlexDirection::Column) {
            DagsView(
                engine: props.engine,
                config: props.config,
                theme: props.theme,
                color_depth: props.color_depth,
                width,
                height,
                initial_location: props.initial_location.clone(),
                should_exit,
            )
        }
    }
}
