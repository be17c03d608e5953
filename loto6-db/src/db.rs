use anyhow::{Context, Result};
use rusqlite::{Connection, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_number    INTEGER PRIMARY KEY,
    date           TEXT NOT NULL,
    number_1       INTEGER NOT NULL,
    number_2       INTEGER NOT NULL,
    number_3       INTEGER NOT NULL,
    number_4       INTEGER NOT NULL,
    number_5       INTEGER NOT NULL,
    number_6       INTEGER NOT NULL,
    bonus          INTEGER NOT NULL,
    prize1_count   INTEGER NOT NULL DEFAULT 0,
    prize2_count   INTEGER NOT NULL DEFAULT 0,
    prize3_count   INTEGER NOT NULL DEFAULT 0,
    prize4_count   INTEGER NOT NULL DEFAULT 0,
    prize5_count   INTEGER NOT NULL DEFAULT 0,
    prize1_amount  INTEGER NOT NULL DEFAULT 0,
    prize2_amount  INTEGER NOT NULL DEFAULT 0,
    prize3_amount  INTEGER NOT NULL DEFAULT 0,
    prize4_amount  INTEGER NOT NULL DEFAULT 0,
    prize5_amount  INTEGER NOT NULL DEFAULT 0,
    carryover      INTEGER NOT NULL DEFAULT 0,
    sales          INTEGER NOT NULL DEFAULT 0
);
";

const SELECT_COLUMNS: &str = "draw_number, date, number_1, number_2, number_3, number_4, number_5, number_6, bonus,
    prize1_count, prize2_count, prize3_count, prize4_count, prize5_count,
    prize1_amount, prize2_amount, prize3_amount, prize4_amount, prize5_amount,
    carryover, sales";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto6.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage. Retourne `false` si le numéro de tirage existe déjà.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_number, date, number_1, number_2, number_3, number_4, number_5, number_6, bonus,
            prize1_count, prize2_count, prize3_count, prize4_count, prize5_count,
            prize1_amount, prize2_amount, prize3_amount, prize4_amount, prize5_amount,
            carryover, sales)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
        rusqlite::params![
            draw.draw_number,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
            draw.prize_counts[0],
            draw.prize_counts[1],
            draw.prize_counts[2],
            draw.prize_counts[3],
            draw.prize_counts[4],
            draw.prize_amounts[0],
            draw.prize_amounts[1],
            draw.prize_amounts[2],
            draw.prize_amounts[3],
            draw.prize_amounts[4],
            draw.carryover,
            draw.sales,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        draw_number: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
        prize_counts: [
            row.get(9)?,
            row.get(10)?,
            row.get(11)?,
            row.get(12)?,
            row.get(13)?,
        ],
        prize_amounts: [
            row.get(14)?,
            row.get(15)?,
            row.get(16)?,
            row.get(17)?,
            row.get(18)?,
        ],
        carryover: row.get(19)?,
        sales: row.get(20)?,
    })
}

/// Les `limit` tirages les plus récents, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws ORDER BY draw_number DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tout l'historique, du plus récent au plus ancien.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws ORDER BY draw_number DESC"
    ))?;
    let draws = stmt
        .query_map([], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn latest_draw(conn: &Connection) -> Result<Option<Draw>> {
    Ok(fetch_last_draws(conn, 1)?.into_iter().next())
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_draw(draw_number: u32, day: u32) -> Draw {
        Draw {
            draw_number,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
            prize_counts: [1, 2, 30, 400, 5000],
            prize_amounts: [200_000_000, 10_000_000, 300_000, 6_800, 1_000],
            carryover: 0,
            sales: 1_500_000_000,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, 1)).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw(1, 1)).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, 1)).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order_by_draw_number() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw(10, 1)).unwrap();
        insert_draw(&conn, &test_draw(12, 8)).unwrap();
        insert_draw(&conn, &test_draw(11, 4)).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        let numbers: Vec<u32> = draws.iter().map(|d| d.draw_number).collect();
        assert_eq!(numbers, vec![12, 11, 10]);

        let last = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].draw_number, 11);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let draw = test_draw(42, 15);
        insert_draw(&conn, &draw).unwrap();
        let loaded = latest_draw(&conn).unwrap().unwrap();
        assert_eq!(loaded, draw);
    }

    #[test]
    fn test_latest_draw_empty() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert!(latest_draw(&conn).unwrap().is_none());
    }
}
