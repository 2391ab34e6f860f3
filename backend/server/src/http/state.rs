use std::sync::Arc;

use domain_types::cart::CartReader;

use crate::configs::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cart_reader: Arc<dyn CartReader>,
}

impl AppState {
    pub fn new(config: Arc<Config>, cart_reader: Arc<dyn CartReader>) -> Self {
        Self {
            config,
            cart_reader,
        }
    }
}
