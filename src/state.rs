use crate::gateway::Gateway;
use crate::theme::ThemeControl;

/// Provided once by `App` and read through `use_context`.
#[derive(Clone)]
pub struct GlobalState {
    pub gateway: Gateway,
    pub theme: ThemeControl,
}
