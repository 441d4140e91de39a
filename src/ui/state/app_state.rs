use dioxus::prelude::{use_signal, Signal};

use crate::usecase::services::edit_service::Workbench;

pub struct AppState {
    pub workbench: Signal<Workbench>,
    pub editing_value: Signal<String>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            workbench: use_signal(|| Workbench::new(page_size)),
            editing_value: use_signal(String::new),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
