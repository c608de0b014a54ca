//! Spreadsheet rendering of the frequency sheet. The layout mirrors the
//! printed form: institutional header, identification block, a 31-row
//! punch grid and the signature footer.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use super::{FrequencySheet, sheet_title};
use crate::classify::DayKind;
use crate::labels;

/// First day row of the punch grid, zero-based.
const FIRST_DAY_ROW: u32 = 16;
const DAY_ROW_HEIGHT: f64 = 32.1;

const COLUMN_WIDTHS: [(u16, f64); 9] = [
    (0, 13.43),
    (1, 15.0),
    (2, 21.0),
    (3, 14.86),
    (4, 21.29),
    (5, 14.0),
    (6, 20.43),
    (7, 13.43),
    (8, 25.29),
];

/// Columns holding punch times and, beside each, the signature column.
const TIME_COLUMNS: [u16; 4] = [1, 3, 5, 7];

pub fn render(sheet: &FrequencySheet) -> Result<Vec<u8>, XlsxError> {
    render_batch(std::slice::from_ref(sheet))
}

/// One worksheet per employee, titled with the employee's name. Duplicate
/// titles abort the whole workbook.
pub fn render_batch(sheets: &[FrequencySheet]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_title(&sheet.employee.name))?;
        write_sheet(worksheet, sheet)?;
    }

    workbook.save_to_buffer()
}

fn base() -> Format {
    Format::new().set_font_name("Arial").set_font_size(12.0)
}

fn bordered() -> Format {
    base().set_border(FormatBorder::Thin)
}

fn header_label() -> Format {
    bordered().set_bold().set_align(FormatAlign::Center)
}

fn centered() -> Format {
    bordered()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn write_sheet(ws: &mut Worksheet, sheet: &FrequencySheet) -> Result<(), XlsxError> {
    for (col, width) in COLUMN_WIDTHS {
        ws.set_column_width(col, width)?;
    }

    write_heading(ws)?;
    write_identification(ws, sheet)?;
    write_grid_header(ws)?;
    write_days(ws, sheet)?;
    write_footer(ws, sheet)?;

    Ok(())
}

fn write_heading(ws: &mut Worksheet) -> Result<(), XlsxError> {
    let title = Format::new()
        .set_font_name("Times New Roman")
        .set_font_size(12.0)
        .set_bold()
        .set_align(FormatAlign::Center);

    ws.merge_range(3, 0, 3, 8, "ESTADO DO MARANHÃO", &title)?;
    ws.merge_range(
        4,
        0,
        4,
        8,
        "AGÊNCIA ESTADUAL DE DEFESA AGROPECUÁRIA DO MARANHÃO – AGED-MA",
        &title,
    )?;
    ws.merge_range(6, 0, 6, 8, "FOLHA INDIVIDUAL DE FREQÜÊNCIA", &title)?;

    Ok(())
}

fn write_identification(ws: &mut Worksheet, sheet: &FrequencySheet) -> Result<(), XlsxError> {
    let label = header_label();
    let value = centered();

    ws.merge_range(8, 0, 8, 1, "INSCRIÇÃO", &label)?;
    ws.merge_range(8, 2, 8, 5, "NOME", &label)?;
    ws.merge_range(8, 6, 8, 8, "MÊS/ANO", &label)?;

    ws.merge_range(9, 0, 10, 1, &sheet.employee.inscription, &value)?;
    ws.merge_range(9, 2, 10, 5, &sheet.employee.name, &value)?;
    ws.merge_range(9, 6, 9, 8, &sheet.period, &value)?;
    ws.merge_range(10, 6, 10, 8, "CARGO/FUNÇÃO", &label)?;

    ws.write_string_with_format(11, 0, "LOTAÇÃO:", &bordered().set_bold())?;
    ws.write_blank(11, 1, &bordered())?;
    ws.write_string_with_format(11, 2, &sheet.employee.department, &value)?;
    for col in 3..=5 {
        ws.write_blank(11, col, &bordered())?;
    }
    ws.merge_range(11, 6, 12, 8, &sheet.employee.position, &value)?;

    Ok(())
}

fn write_grid_header(ws: &mut Worksheet) -> Result<(), XlsxError> {
    let group = centered().set_bold();
    let plain = bordered().set_align(FormatAlign::Center);

    ws.merge_range(13, 0, 15, 0, "DIA", &group)?;
    ws.merge_range(13, 1, 13, 4, "MANHÃ", &group)?;
    ws.merge_range(13, 5, 13, 8, "TARDE", &group)?;

    ws.merge_range(14, 1, 14, 2, "ENTRADA", &group)?;
    ws.merge_range(14, 3, 14, 4, "SAIDA", &group)?;
    ws.merge_range(14, 5, 14, 6, "ENTRADA", &group)?;
    ws.merge_range(14, 7, 14, 8, "SAIDA", &group)?;

    for col in TIME_COLUMNS {
        ws.write_string_with_format(15, col, "HORA", &plain)?;
        ws.write_string_with_format(15, col + 1, "RUBRICA", &plain)?;
    }

    Ok(())
}

fn write_days(ws: &mut Worksheet, sheet: &FrequencySheet) -> Result<(), XlsxError> {
    let number = centered().set_bold();
    let cell = centered();
    let rubrica = centered().set_font_size(8.0);
    let empty = bordered();

    for (index, day) in sheet.days.iter().enumerate() {
        let row = FIRST_DAY_ROW + index as u32;
        ws.set_row_height(row, DAY_ROW_HEIGHT)?;
        ws.write_string_with_format(row, 0, &day.number, &number)?;

        match day.kind {
            Some(DayKind::Absent) => {
                for col in 1..=8 {
                    ws.write_string_with_format(row, col, labels::ABSENT_MARK, &cell)?;
                }
            }
            Some(DayKind::Present) => {
                let times = day.times();
                for (slot, col) in TIME_COLUMNS.into_iter().enumerate() {
                    match times[slot] {
                        Some(time) => {
                            let text = time.format("%H:%M").to_string();
                            ws.write_string_with_format(row, col, &text, &cell)?;
                            if let Some(witness) = &day.witness {
                                ws.write_string_with_format(row, col + 1, witness, &rubrica)?;
                            } else {
                                ws.write_blank(row, col + 1, &empty)?;
                            }
                        }
                        None => {
                            ws.write_blank(row, col, &cell)?;
                            ws.write_blank(row, col + 1, &empty)?;
                        }
                    }
                }
            }
            // Weekends, holidays, dispensations, future days and rows
            // beyond the month's end keep the grid but stay empty.
            _ => {
                for col in 1..=8 {
                    ws.write_blank(row, col, &empty)?;
                }
            }
        }
    }

    Ok(())
}

fn write_footer(ws: &mut Worksheet, sheet: &FrequencySheet) -> Result<(), XlsxError> {
    let bold = base().set_bold();

    ws.write_string_with_format(47, 0, "OBSERVAÇÃO", &bold.clone().set_align(FormatAlign::Center))?;

    if !sheet.observations.is_empty() {
        let wrapped = base().set_text_wrap();
        ws.merge_range(48, 0, 48, 8, &sheet.joined_observations(), &wrapped)?;
    }

    ws.write_string_with_format(49, 0, "VISTO:", &bold)?;
    ws.write_string_with_format(49, 5, "VISTO", &bold)?;

    let signature = base().set_align(FormatAlign::Center);
    ws.write_string_with_format(54, 0, "Responsável pela freqüência", &signature)?;
    ws.write_string_with_format(54, 5, "Assinatura do Chefe Imediato", &signature)?;
    ws.set_row_height(54, 30.0)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::model::employee::Employee;
    use crate::model::shift::Shift;
    use crate::report::build_sheet;

    fn employee(name: &str) -> Employee {
        Employee {
            id: 1,
            name: name.to_string(),
            inscription: "100001".to_string(),
            department: "TI".to_string(),
            position: "Analista de Sistemas".to_string(),
            organization: "AGED-MA".to_string(),
            default_shift: Shift::Morning,
            user_id: None,
        }
    }

    fn sample(name: &str) -> FrequencySheet {
        build_sheet(
            &employee(name),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        )
    }

    #[test]
    fn render_produces_a_zip_container() {
        let buffer = render(&sample("Maria Silva")).unwrap();

        assert!(buffer.len() > 1000);
        assert_eq!(&buffer[..4], b"PK\x03\x04");
    }

    #[test]
    fn batch_holds_one_worksheet_per_employee() {
        let sheets = vec![sample("Maria Silva"), sample("João Souza")];
        let buffer = render_batch(&sheets).unwrap();

        assert_eq!(&buffer[..4], b"PK\x03\x04");
    }

    #[test]
    fn duplicate_employee_names_abort_the_batch() {
        let sheets = vec![sample("Maria Silva"), sample("Maria Silva")];

        assert!(render_batch(&sheets).is_err());
    }
}
