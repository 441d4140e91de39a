use rfd::{AsyncFileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::domain::entities::source::SourceFile;

pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Asks for a spreadsheet and reads it. `None` when the dialog is cancelled.
pub async fn pick_spreadsheet() -> Option<SourceFile> {
    let handle = AsyncFileDialog::new()
        .set_title("Upload Excel File")
        .add_filter("Excel", &SPREADSHEET_EXTENSIONS)
        .pick_file()
        .await?;
    let name = handle.file_name();
    let bytes = handle.read().await;
    Some(SourceFile { name, bytes })
}

/// Blocking notice for failures the user has to acknowledge.
pub fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn confirm(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}
