//! Flattened exports of the whole warehouse.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/export/json` | One record per (year, country) |
//! | `GET`  | `/export/spreadsheet` | Same records as an `.xlsx` attachment |

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use econdw_core::{store::WarehouseQuery, year::Year};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use serde::Serialize;

use crate::{
  ApiState,
  error::ApiError,
  table::{Cell, CountryYear, pivot},
};

pub const SPREADSHEET_FILENAME: &str = "economic_data.xlsx";

pub const SPREADSHEET_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SHEET_NAME: &str = "Economic Data";

pub const SPREADSHEET_HEADERS: [&str; 11] = [
  "Year",
  "Country",
  "ISO Code",
  "Inflation (%)",
  "Inflation Year",
  "GDP Growth (%)",
  "GDP Growth Year",
  "Exchange Rate (Local/USD)",
  "Exchange Rate Year",
  "CPI (Index)",
  "CPI Year",
];

const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
  pub year:               Year,
  pub country:            String,
  pub iso_code:           String,
  pub inflation:          Option<f64>,
  pub inflation_year:     Option<Year>,
  pub gdp_growth:         Option<f64>,
  pub gdp_growth_year:    Option<Year>,
  pub exchange_rate:      Option<f64>,
  pub exchange_rate_year: Option<Year>,
  pub cpi:                Option<f64>,
  pub cpi_year:           Option<Year>,
}

impl From<CountryYear> for ExportRecord {
  fn from(cy: CountryYear) -> Self {
    let value = |c: Option<Cell>| c.map(|c| c.value);
    let year = |c: Option<Cell>| c.map(|c| c.observed_year);
    let m = cy.measures;
    Self {
      year:               cy.year,
      country:            cy.country,
      iso_code:           cy.iso,
      inflation:          value(m.inflation),
      inflation_year:     year(m.inflation),
      gdp_growth:         value(m.gdp_growth),
      gdp_growth_year:    year(m.gdp_growth),
      exchange_rate:      value(m.exchange_rate),
      exchange_rate_year: year(m.exchange_rate),
      cpi:                value(m.cpi),
      cpi_year:           year(m.cpi),
    }
  }
}

impl ExportRecord {
  /// Write this record as worksheet row `row`.
  fn write_row(&self, sheet: &mut Worksheet, row: u32) -> Result<(), XlsxError> {
    sheet.write_number(row, 0, self.year.get())?;
    sheet.write_string(row, 1, self.country.as_str())?;
    sheet.write_string(row, 2, self.iso_code.as_str())?;

    let pairs = [
      (self.inflation, self.inflation_year),
      (self.gdp_growth, self.gdp_growth_year),
      (self.exchange_rate, self.exchange_rate_year),
      (self.cpi, self.cpi_year),
    ];
    for (i, (value, year)) in (0u16..).zip(pairs) {
      let col = 3 + 2 * i;
      match value {
        Some(v) => sheet.write_number(row, col, v)?,
        None => sheet.write_string(row, col, MISSING)?,
      };
      match year {
        Some(y) => sheet.write_number(row, col + 1, y.get())?,
        None => sheet.write_string(row, col + 1, MISSING)?,
      };
    }
    Ok(())
  }
}

async fn records<S: WarehouseQuery>(store: &S) -> Result<Vec<ExportRecord>, ApiError> {
  let rows = store.all_facts().await.map_err(ApiError::store)?;
  Ok(pivot(rows).into_iter().map(ExportRecord::from).collect())
}

fn header_format() -> Format {
  Format::new()
    .set_bold()
    .set_font_color(Color::White)
    .set_background_color(Color::RGB(0x4F81BD))
    .set_border(FormatBorder::Thin)
    .set_align(FormatAlign::Center)
    .set_align(FormatAlign::VerticalCenter)
}

fn build_workbook(records: &[ExportRecord]) -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name(SHEET_NAME)?;

  let header = header_format();
  for (col, title) in (0u16..).zip(SPREADSHEET_HEADERS) {
    sheet.write_string_with_format(0, col, title, &header)?;
    sheet.set_column_width(col, 18)?;
  }
  for (row, record) in (1u32..).zip(records) {
    record.write_row(sheet, row)?;
  }

  workbook.save_to_buffer()
}

/// Render `records` as an xlsx workbook: a styled header row, then one row
/// per record with `N/A` in empty cells.
pub fn to_xlsx(records: &[ExportRecord]) -> Result<Vec<u8>, ApiError> {
  build_workbook(records).map_err(|e| ApiError::Export(e.to_string()))
}

/// `GET /export/json`
pub async fn json<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<ExportRecord>>, ApiError>
where
  S: WarehouseQuery + 'static,
{
  Ok(Json(records(state.store.as_ref()).await?))
}

/// `GET /export/spreadsheet`
pub async fn spreadsheet<S>(
  State(state): State<ApiState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarehouseQuery + 'static,
{
  let records = records(state.store.as_ref()).await?;
  let body = to_xlsx(&records)?;
  tracing::debug!(records = records.len(), "exported spreadsheet");
  Ok((
    [
      (header::CONTENT_TYPE, SPREADSHEET_CONTENT_TYPE.to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{SPREADSHEET_FILENAME}\""),
      ),
    ],
    body,
  ))
}
