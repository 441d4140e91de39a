mod app;
mod config;
mod domain;
mod infra;
mod logging;
mod platform;
mod ui;
mod usecase;


use config::settings::Settings;

fn main() {
    let settings = Settings::resolve().expect("should resolve app directories");
    logging::init(&settings);

    let webview_data_dir = settings
        .ensure_webview_data_dir()
        .expect("should resolve and create WebView2 data directory");
    tracing::info!(export_dir = %settings.export_dir.display(), "starting caresheet");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Caresheet"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}
