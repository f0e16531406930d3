use crate::config::Config;
use crate::service::UserService;
use crate::templates::Templates;

pub struct AppState {
    pub service: UserService,
    /// `None` when the templates directory could not be read at startup.
    pub templates: Option<Templates>,
    pub config: Config,
}
