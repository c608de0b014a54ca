//! Print rendering of the frequency sheet as a self-contained HTML
//! document sized for A4. Batches emit one page per employee.

use std::fmt::Write;

use super::FrequencySheet;
use crate::classify::DayKind;
use crate::labels;

const STYLE: &str = r#"
@page { margin: 15mm 10mm; }
body { font-family: 'Times New Roman', serif; font-size: 10px; margin: 0; }
.page-break { page-break-after: always; }
.header { text-align: center; }
.header h2 { font-size: 13px; margin: 2px 0; }
.header h3 { font-size: 11px; margin: 2px 0; }
.title { text-align: center; font-size: 12px; font-weight: bold; margin: 10px 0 6px 0; }
.info-table { width: 100%; border-collapse: collapse; margin-bottom: 6px; }
.info-table td { border: 1px solid #000; padding: 2px 4px; font-size: 9px; }
.info-label { font-weight: bold; text-align: center; background-color: #f0f0f0; }
.info-value { text-align: center; }
.freq-table { width: 100%; border-collapse: collapse; }
.freq-table th, .freq-table td { border: 1px solid #000; padding: 1px 2px; font-size: 9px; text-align: center; }
.freq-table th { font-weight: bold; background-color: #f0f0f0; }
.day-col { width: 30px; }
.falta { font-weight: bold; }
.rubrica { font-size: 7px; }
.obs-section { margin-top: 6px; }
.obs-label { font-weight: bold; border: 1px solid #000; text-align: center; padding: 2px; }
.obs-content { border: 1px solid #000; border-top: none; min-height: 20px; padding: 2px 4px; font-size: 9px; }
.signatures { width: 100%; margin-top: 10px; }
.signatures td { width: 50%; text-align: center; padding-top: 40px; }
.sig-line { border-top: 1px solid #000; width: 200px; margin: 0 auto 2px auto; }
.visto-label { font-weight: bold; text-align: left; }
"#;

pub fn render(sheet: &FrequencySheet) -> String {
    render_batch(std::slice::from_ref(sheet))
}

pub fn render_batch(sheets: &[FrequencySheet]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Folha Individual de Freqüência</title>\n");
    html.push_str("<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    for (index, sheet) in sheets.iter().enumerate() {
        let class = if index + 1 < sheets.len() {
            " class=\"page-break\""
        } else {
            ""
        };
        let _ = write!(html, "<div{class}>\n");
        push_page(&mut html, sheet);
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_page(html: &mut String, sheet: &FrequencySheet) {
    html.push_str("<div class=\"header\">\n");
    html.push_str("<h2>ESTADO DO MARANHÃO</h2>\n");
    html.push_str("<h3>AGÊNCIA ESTADUAL DE DEFESA AGROPECUÁRIA DO MARANHÃO – AGED-MA</h3>\n");
    html.push_str("</div>\n");
    html.push_str("<div class=\"title\">FOLHA INDIVIDUAL DE FREQÜÊNCIA</div>\n");

    push_identification(html, sheet);
    push_grid(html, sheet);
    push_observations(html, sheet);
    push_signatures(html);
}

fn push_identification(html: &mut String, sheet: &FrequencySheet) {
    html.push_str("<table class=\"info-table\">\n<tr>\n");
    html.push_str("<td class=\"info-label\" colspan=\"2\">INSCRIÇÃO</td>\n");
    html.push_str("<td class=\"info-label\" colspan=\"4\">NOME</td>\n");
    html.push_str("<td class=\"info-label\" colspan=\"3\">MÊS/ANO</td>\n");
    html.push_str("</tr>\n<tr>\n");
    let _ = write!(
        html,
        "<td class=\"info-value\" colspan=\"2\" rowspan=\"2\">{}</td>\n",
        escape(&sheet.employee.inscription)
    );
    let _ = write!(
        html,
        "<td class=\"info-value\" colspan=\"4\" rowspan=\"2\">{}</td>\n",
        escape(&sheet.employee.name)
    );
    let _ = write!(
        html,
        "<td class=\"info-value\" colspan=\"3\">{}</td>\n",
        escape(&sheet.period)
    );
    html.push_str("</tr>\n<tr>\n");
    html.push_str("<td class=\"info-label\" colspan=\"3\">CARGO/FUNÇÃO</td>\n");
    html.push_str("</tr>\n<tr>\n");
    html.push_str("<td class=\"info-label\" colspan=\"2\">LOTAÇÃO:</td>\n");
    let _ = write!(
        html,
        "<td class=\"info-value\" colspan=\"4\">{}</td>\n",
        escape(&sheet.employee.department)
    );
    let _ = write!(
        html,
        "<td class=\"info-value\" colspan=\"3\" rowspan=\"2\">{}</td>\n",
        escape(&sheet.employee.position)
    );
    html.push_str("</tr>\n<tr>\n<td colspan=\"6\">&nbsp;</td>\n</tr>\n");
    html.push_str("</table>\n");
}

fn push_grid(html: &mut String, sheet: &FrequencySheet) {
    html.push_str("<table class=\"freq-table\">\n<tr>\n");
    html.push_str("<th class=\"day-col\" rowspan=\"3\">DIA</th>\n");
    html.push_str("<th colspan=\"4\">MANHÃ</th>\n<th colspan=\"4\">TARDE</th>\n");
    html.push_str("</tr>\n<tr>\n");
    for _ in 0..2 {
        html.push_str("<th colspan=\"2\">ENTRADA</th>\n<th colspan=\"2\">SAIDA</th>\n");
    }
    html.push_str("</tr>\n<tr>\n");
    for _ in 0..4 {
        html.push_str("<th>HORA</th>\n<th>RUBRICA</th>\n");
    }
    html.push_str("</tr>\n");

    for day in &sheet.days {
        html.push_str("<tr>\n");
        let _ = write!(
            html,
            "<td class=\"day-col\"><strong>{}</strong></td>\n",
            day.number
        );

        match day.kind {
            Some(DayKind::Absent) => {
                for _ in 0..8 {
                    let _ = write!(html, "<td class=\"falta\">{}</td>\n", labels::ABSENT_MARK);
                }
            }
            Some(DayKind::Present) => {
                let witness = day.witness.as_deref().unwrap_or("");
                for time in day.times() {
                    match time {
                        Some(time) => {
                            let _ = write!(html, "<td>{}</td>\n", time.format("%H:%M"));
                            let _ =
                                write!(html, "<td class=\"rubrica\">{}</td>\n", escape(witness));
                        }
                        None => html.push_str("<td></td>\n<td></td>\n"),
                    }
                }
            }
            _ => {
                for _ in 0..8 {
                    html.push_str("<td></td>\n");
                }
            }
        }

        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");
}

fn push_observations(html: &mut String, sheet: &FrequencySheet) {
    html.push_str("<div class=\"obs-section\">\n");
    html.push_str("<div class=\"obs-label\">OBSERVAÇÃO</div>\n");
    if sheet.observations.is_empty() {
        html.push_str("<div class=\"obs-content\"></div>\n");
    } else {
        let _ = write!(
            html,
            "<div class=\"obs-content\">{}</div>\n",
            escape(&sheet.joined_observations())
        );
    }
    html.push_str("</div>\n");
}

fn push_signatures(html: &mut String) {
    html.push_str("<table class=\"signatures\">\n<tr>\n<td>\n");
    html.push_str("<div class=\"visto-label\">VISTO:</div>\n");
    html.push_str("<div class=\"sig-line\"></div>\n");
    html.push_str("Responsável pela freqüência\n</td>\n<td>\n");
    html.push_str("<div class=\"visto-label\">VISTO</div>\n");
    html.push_str("<div class=\"sig-line\"></div>\n");
    html.push_str("Assinatura do Chefe Imediato\n</td>\n</tr>\n</table>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::model::employee::Employee;
    use crate::model::shift::Shift;
    use crate::model::time_entry::TimeEntry;
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
        let day = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let entries = HashMap::from([(
            day,
            TimeEntry {
                id: 1,
                employee_id: 1,
                date: day,
                morning_entry: NaiveTime::from_hms_opt(8, 5, 0),
                morning_exit: None,
                afternoon_entry: None,
                afternoon_exit: None,
                shift_override: None,
            },
        )]);

        build_sheet(
            &employee(name),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            &entries,
            &[],
            &HashMap::new(),
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        )
    }

    #[test]
    fn page_carries_header_grid_and_signatures() {
        let html = render(&sample("Maria Silva"));

        assert!(html.contains("ESTADO DO MARANHÃO"));
        assert!(html.contains("FOLHA INDIVIDUAL DE FREQÜÊNCIA"));
        assert!(html.contains("<th colspan=\"4\">MANHÃ</th>"));
        assert!(html.contains("Assinatura do Chefe Imediato"));
        assert!(html.contains("<td>08:05</td>"));
        assert!(html.contains("<td class=\"rubrica\">Maria Silva</td>"));
    }

    #[test]
    fn absences_render_as_bold_marks() {
        let html = render(&sample("Maria Silva"));

        // 2026-02-03 is an absent Tuesday, eight cells wide.
        assert!(html.contains("<td class=\"falta\">FALTA</td>"));
    }

    #[test]
    fn employee_names_are_escaped() {
        let html = render(&sample("Silva & Souza <Ltda>"));

        assert!(html.contains("Silva &amp; Souza &lt;Ltda&gt;"));
        assert!(!html.contains("<Ltda>"));
    }

    #[test]
    fn page_break_applies_to_all_but_the_last_page() {
        let sheets = vec![sample("Maria Silva"), sample("João Souza"), sample("Ana Lima")];
        let html = render_batch(&sheets);

        assert_eq!(html.matches("class=\"page-break\"").count(), 2);
        assert_eq!(html.matches("FOLHA INDIVIDUAL DE FREQÜÊNCIA").count(), 4);
    }

    #[test]
    fn single_page_has_no_break() {
        let html = render(&sample("Maria Silva"));

        assert!(!html.contains("page-break\""));
    }
}
