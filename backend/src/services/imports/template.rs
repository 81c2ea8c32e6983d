use crate::services::categories::taxonomy_names;
use crate::services::imports::{importer::TEMP_PASSWORD, REFERENCE_SHEET, WORKERS_SHEET, WORKER_COLUMNS};
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const TEMPLATE_FILENAME: &str = "workers_template.xlsx";

pub async fn process(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    // A missing taxonomy still yields a usable template, just with an empty
    // reference sheet.
    let professions = match taxonomy_names(&state).await {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Reference sheet will be empty: {}", e);
            Vec::new()
        }
    };

    match build_template(&professions) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(XLSX_MIME)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", TEMPLATE_FILENAME),
            ))
            .body(bytes),
        Err(e) => {
            HttpResponse::InternalServerError().body(format!("Error building template: {}", e))
        }
    }
}

/// The workbook the admin fills in: an editable `Workers` sheet with the
/// column headers, and a protected reference sheet naming every valid
/// profession plus the initial password imported accounts get.
fn build_template(professions: &[String]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let workers = workbook.add_worksheet();
    workers.set_name(WORKERS_SHEET)?;
    for (col, title) in WORKER_COLUMNS.iter().enumerate() {
        workers.write_with_format(0, col as u16, *title, &bold)?;
    }

    let reference = workbook.add_worksheet();
    reference.set_name(REFERENCE_SHEET)?;
    reference.write_with_format(0, 0, "Available Job Categories", &bold)?;
    for (i, name) in professions.iter().enumerate() {
        reference.write_string((i + 1) as u32, 0, name)?;
    }
    reference.write_with_format(
        0,
        2,
        format!(
            "Use exact profession names from this sheet. Default password: {}",
            TEMP_PASSWORD
        ),
        &bold,
    )?;
    reference.protect();

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_a_zip_container() {
        let bytes = build_template(&["Electrician".to_string()]).unwrap();
        // .xlsx files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
    }
}
