use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use loto6_db::db::insert_draw;
use loto6_db::models::{validate_draw, Draw, PICK_COUNT, PRIZE_TIERS};
use loto6_db::rusqlite::Connection;

/// Colonnes obligatoires : n°, date, 6 numéros, bonus, 5 nombres de gagnants,
/// 5 montants, report. Le chiffre d'affaires (colonne 20) est facultatif.
pub const MIN_COLUMNS: usize = 20;
const SALES_COLUMN: usize = 20;

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y/%m/%d")
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

fn parse_field<T: FromStr>(record: &csv::StringRecord, idx: usize) -> Result<T> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("Champ manquant à l'index {}", idx))?;
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("Impossible de parser '{}' (index {})", raw, idx))
}

pub fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    if record.len() < MIN_COLUMNS {
        bail!("{} colonnes au lieu de {} minimum", record.len(), MIN_COLUMNS);
    }

    let draw_number: u32 = parse_field(record, 0)?;
    let date = parse_date(record.get(1).unwrap_or_default())?;

    let mut numbers = [0u8; PICK_COUNT];
    for (k, n) in numbers.iter_mut().enumerate() {
        *n = parse_field(record, 2 + k)?;
    }
    let bonus: u8 = parse_field(record, 8)?;

    validate_draw(&numbers, bonus)
        .with_context(|| format!("Tirage n°{} invalide", draw_number))?;

    let mut prize_counts = [0u32; PRIZE_TIERS];
    for (k, c) in prize_counts.iter_mut().enumerate() {
        *c = parse_field(record, 9 + k)?;
    }
    let mut prize_amounts = [0i64; PRIZE_TIERS];
    for (k, a) in prize_amounts.iter_mut().enumerate() {
        *a = parse_field(record, 14 + k)?;
    }
    let carryover: i64 = parse_field(record, 19)?;

    let sales: i64 = match record.get(SALES_COLUMN).map(str::trim) {
        Some(s) if !s.is_empty() => parse_field(record, SALES_COLUMN)?,
        _ => 0,
    };

    Ok(Draw {
        draw_number,
        date,
        numbers,
        bonus,
        prize_counts,
        prize_amounts,
        carryover,
        sales,
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_from_reader(conn, reader)
}

fn import_from_reader<R: std::io::Read>(
    conn: &Connection,
    mut reader: csv::Reader<R>,
) -> Result<ImportResult> {
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records;
        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "ligne illisible");
                result.errors += 1;
                continue;
            }
        };
        match parse_record(&record) {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    warn!(line, draw = draw.draw_number, error = %e, "échec de l'insertion");
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line, error = %format!("{:#}", e), "ligne rejetée");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    debug!(?result, "import terminé");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loto6_db::db::{count_draws, latest_draw, migrate};

    const HEADER: &str = "No,date,n1,n2,n3,n4,n5,n6,bonus,c1,c2,c3,c4,c5,a1,a2,a3,a4,a5,carryover,sales\n";

    fn reader(body: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes())
    }

    fn record(line: &str) -> csv::StringRecord {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes())
            .records()
            .next()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024/03/07").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(parse_date(" 2000/10/05 ").unwrap(), NaiveDate::from_ymd_opt(2000, 10, 5).unwrap());
        assert!(parse_date("07/03/2024").is_err());
    }

    #[test]
    fn test_parse_record_full() {
        let r = record("1885,2024/04/08,3,12,19,27,35,41,8,1,5,180,9000,150000,200000000,10000000,300000,6800,1000,0,1500000000");
        let draw = parse_record(&r).unwrap();
        assert_eq!(draw.draw_number, 1885);
        assert_eq!(draw.numbers, [3, 12, 19, 27, 35, 41]);
        assert_eq!(draw.bonus, 8);
        assert_eq!(draw.prize_counts, [1, 5, 180, 9000, 150000]);
        assert_eq!(draw.prize_amounts[0], 200_000_000);
        assert_eq!(draw.carryover, 0);
        assert_eq!(draw.sales, 1_500_000_000);
    }

    #[test]
    fn test_parse_record_without_sales() {
        let r = record("1,2000/10/05,2,8,10,13,27,30,39,0,3,100,5000,80000,0,15000000,500000,9000,1000,400000000");
        let draw = parse_record(&r).unwrap();
        assert_eq!(draw.sales, 0);
        assert_eq!(draw.carryover, 400_000_000);
    }

    #[test]
    fn test_parse_record_rejects_short_row() {
        let r = record("1,2000/10/05,2,8,10,13,27,30,39");
        assert!(parse_record(&r).is_err());
    }

    #[test]
    fn test_parse_record_rejects_invalid_numbers() {
        let r = record("2,2000/10/12,2,2,10,13,27,30,39,0,0,0,0,0,0,0,0,0,0,0");
        assert!(parse_record(&r).is_err());
        let r = record("3,2000/10/19,1,2,3,4,5,44,7,0,0,0,0,0,0,0,0,0,0,0");
        assert!(parse_record(&r).is_err());
    }

    #[test]
    fn test_import_counts() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let body = format!(
            "{}{}\n{}\n{}\n{}\n",
            HEADER,
            "1,2000/10/05,2,8,10,13,27,30,39,0,0,0,0,0,0,0,0,0,0,0",
            "2,2000/10/12,1,9,16,20,21,43,5,0,0,0,0,0,0,0,0,0,0,0",
            "2,2000/10/12,1,9,16,20,21,43,5,0,0,0,0,0,0,0,0,0,0,0",
            "3,2000/10/19,1,2,3",
        );
        let result = import_from_reader(&conn, reader(&body)).unwrap();
        assert_eq!(
            result,
            ImportResult { total_records: 4, inserted: 2, skipped: 1, errors: 1 }
        );
        assert_eq!(count_draws(&conn).unwrap(), 2);
        assert_eq!(latest_draw(&conn).unwrap().unwrap().draw_number, 2);
    }
}
