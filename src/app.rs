use std::sync::Arc;

use dioxus::prelude::*;

use crate::config::settings::Settings;
use crate::domain::entities::edit::{CellMode, EditSession};
use crate::domain::entities::table::{CellValue, Row};
use crate::infra::codec::xlsx::XlsxCodec;
use crate::infra::download::directory::DirectorySink;
use crate::platform::desktop::dialogs::{confirm, pick_spreadsheet, show_error};
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::codec::ParseError;
use crate::usecase::services::edit_service::Workbench;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::ImportService;

const CARD_STYLE: &str =
    "border: 1px solid #ddd; border-radius: 8px; padding: 12px; background: #f7f7f8;";
const GRID_STYLE: &str =
    "display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 12px;";
const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
const ACTIVE_BUTTON_STYLE: &str =
    "border: 1px solid #2563eb; background: #2563eb; color: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";

#[component]
pub fn App() -> Element {
    let settings = match Settings::resolve() {
        Ok(settings) => settings,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to resolve app directories: {err}" }
                }
            };
        }
    };

    let AppState {
        mut workbench,
        mut editing_value,
        mut busy,
        mut status,
    } = AppState::new(settings.page_size);

    let import_service = use_hook(|| Arc::new(ImportService::new(Arc::new(XlsxCodec))));
    let export_service = use_hook({
        let settings = settings.clone();
        move || {
            Arc::new(ExportService::new(
                Arc::new(XlsxCodec),
                Arc::new(DirectorySink::new(settings.export_dir)),
                settings.export_suffix,
            ))
        }
    });

    let (rows, session, status_line, total_rows, visible_count, remaining) = {
        let bench = workbench.read();
        let rows: Vec<(usize, Arc<Row>)> = bench
            .visible_rows()
            .map(|(position, row)| (position, row.clone()))
            .collect();
        (
            rows,
            bench.session().clone(),
            bench.status_line(),
            bench.table().len(),
            bench.visible_count(),
            bench.remaining(),
        )
    };

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 24px; display: flex; flex-direction: column; gap: 16px;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                div {
                    h2 { style: "margin: 0;", "XLSX Data Viewer" }
                    p { style: "margin: 4px 0 0; color: #666;", "Upload an Excel file and view all rows" }
                }
                if total_rows > 0 {
                    div {
                        style: "display: flex; gap: 8px;",
                        button {
                            style: BUTTON_STYLE,
                            disabled: busy(),
                            onclick: move |_| {
                                let blank: Row = workbench
                                    .read()
                                    .table()
                                    .column_keys()
                                    .into_iter()
                                    .map(|key| (key, CellValue::Empty))
                                    .collect();
                                workbench.write().add_row(blank);
                                *status.write() = "Added an empty row".to_string();
                            },
                            "Add Row"
                        }
                        button {
                            style: BUTTON_STYLE,
                            disabled: busy(),
                            onclick: move |_| {
                                let (table, file_name) = {
                                    let bench = workbench.read();
                                    (
                                        bench.table().clone(),
                                        bench.file_name().unwrap_or_default().to_string(),
                                    )
                                };
                                match export_service.export_current_table(&table, &file_name) {
                                    Ok(receipt) => {
                                        tracing::info!(file = %receipt.file_name, "export finished");
                                        *status.write() = format!(
                                            "Exported {} rows to {}",
                                            receipt.row_count,
                                            receipt.path.display()
                                        );
                                    }
                                    Err(err) => {
                                        tracing::error!(error = %format!("{err:#}"), "export failed");
                                        *status.write() = format!("Export failed: {err:#}");
                                    }
                                }
                            },
                            "Export Modified Data"
                        }
                    }
                }
            }

            div {
                style: "display: flex; flex-direction: column; gap: 6px;",
                button {
                    style: BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        *busy.write() = true;
                        *status.write() = "Choosing a file".to_string();

                        let import_service = import_service.clone();
                        spawn(async move {
                            let picked = pick_spreadsheet().await;
                            match import_service.load_selection(picked.as_ref()) {
                                Ok(loaded) => {
                                    let file_name = loaded.file_name().to_string();
                                    workbench.write().replace_with(loaded);
                                    editing_value.set(String::new());
                                    *status.write() = format!("Loaded {file_name}");
                                }
                                Err(ParseError::NoFileSelected) => {
                                    *status.write() = "Import cancelled".to_string();
                                }
                                Err(err) => {
                                    *status.write() = format!("Failed to read the Excel file: {err}");
                                    show_error("Failed to read the Excel file", &err.to_string());
                                }
                            }
                            *busy.write() = false;
                        });
                    },
                    "Upload Excel File"
                }
                if let Some(line) = status_line {
                    p { style: "margin: 0; color: #555;", "{line}" }
                }
                p { style: "margin: 0; color: #888; font-size: 12px;", "{status}" }
            }

            if total_rows > 0 {
                div {
                    style: "display: flex; flex-direction: column; gap: 12px;",
                    span { "All Rows (Showing {visible_count} of {total_rows})" }
                    {rows.into_iter().map(|(position, row)| {
                        rsx!(
                            RowCard {
                                key: "{position}",
                                position,
                                row,
                                session: session.clone(),
                                workbench,
                                editing_value,
                            }
                        )
                    })}
                    if remaining > 0 {
                        div {
                            style: "display: flex; justify-content: center; padding-top: 12px;",
                            button {
                                style: BUTTON_STYLE,
                                onclick: move |_| workbench.write().load_more(),
                                "Load More ({remaining} remaining)"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RowCard(
    position: usize,
    row: Arc<Row>,
    session: EditSession,
    mut workbench: Signal<Workbench>,
    mut editing_value: Signal<String>,
) -> Element {
    let is_editing = session.is_row_editing(position);
    let toggle_style = if is_editing {
        ACTIVE_BUTTON_STYLE
    } else {
        BUTTON_STYLE
    };
    let toggle_label = if is_editing { "Exit Edit" } else { "Edit" };
    let row_number = position + 1;

    rsx! {
        div {
            style: CARD_STYLE,
            div {
                style: "display: flex; justify-content: space-between; align-items: center; padding-bottom: 8px;",
                strong { "Row {row_number}" }
                div {
                    style: "display: flex; gap: 8px;",
                    button {
                        style: toggle_style,
                        onclick: move |_| {
                            workbench.write().toggle_row_edit_mode(position);
                            editing_value.set(String::new());
                        },
                        "{toggle_label}"
                    }
                    button {
                        style: BUTTON_STYLE,
                        onclick: move |_| {
                            if confirm("Delete row", &format!("Delete row {row_number}?")) {
                                workbench.write().delete_row(position);
                            }
                        },
                        "Delete"
                    }
                }
            }
            div {
                style: GRID_STYLE,
                {row.iter().map(|(key, value)| {
                    let key = key.to_string();
                    let text = value.to_string();
                    let mode = session.cell_mode(position, &key);
                    let editable = mode != CellMode::Static;
                    if mode == CellMode::Live {
                        let key_for_blur = key.clone();
                        let key_for_enter = key.clone();
                        rsx!(
                            div {
                                key: "{key}",
                                style: "display: flex; flex-direction: column; gap: 4px;",
                                label { style: "font-size: 12px; font-weight: 600;", "{key}" }
                                input {
                                    style: "height: 32px; padding: 0 8px;",
                                    value: editing_value(),
                                    onmounted: move |event: MountedEvent| async move {
                                        if let Err(err) = event.set_focus(true).await {
                                            tracing::debug!(error = ?err, "failed to focus cell editor");
                                        }
                                    },
                                    oninput: move |event| editing_value.set(event.value()),
                                    onblur: move |_| {
                                        let raw = editing_value();
                                        workbench.write().commit_cell_edit(position, &key_for_blur, &raw);
                                    },
                                    onkeydown: move |event| {
                                        if event.key() == Key::Enter {
                                            let raw = editing_value();
                                            workbench.write().commit_cell_edit(position, &key_for_enter, &raw);
                                        } else if event.key() == Key::Escape {
                                            workbench.write().cancel_cell_edit();
                                        }
                                    }
                                }
                            }
                        )
                    } else {
                        let cell_style = if editable {
                            "font-size: 14px; color: #444; padding: 8px; border: 1px solid #ccc; border-radius: 4px; min-height: 20px; cursor: pointer; background: #fff;"
                        } else {
                            "font-size: 14px; color: #666; padding: 8px; border: 1px solid #ddd; border-radius: 4px; min-height: 20px; cursor: default;"
                        };
                        let key_for_click = key.clone();
                        let text_for_click = text.clone();
                        rsx!(
                            div {
                                key: "{key}",
                                style: "display: flex; flex-direction: column; gap: 4px;",
                                label { style: "font-size: 12px; font-weight: 600;", "{key}" }
                                div {
                                    style: cell_style,
                                    onclick: move |_| {
                                        if !editable {
                                            return;
                                        }
                                        workbench.write().begin_cell_edit(position, &key_for_click);
                                        editing_value.set(text_for_click.clone());
                                    },
                                    "{text}"
                                }
                            }
                        )
                    }
                })}
            }
        }
    }
}
