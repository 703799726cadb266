// ==========================================
// 管材采购决策 - SQLite 合同数据源
// ==========================================
// 表: contracts(material, package, de, pn, valid_until, supplier, price)
// valid_until 以 TEXT 存储，格式同表格文件
// ==========================================

use crate::db::open_read_only;
use crate::domain::contract::{DqLevel, DqViolation, RawContractRecord};
use crate::domain::types::normalize_package;
use crate::importer::contract_importer_trait::{ContractSource, RawLoad};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::parse_contract_date;
use std::path::{Path, PathBuf};
use tracing::debug;

/// contracts 表建表语句（供初始化/测试使用）
pub const CONTRACTS_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS contracts (
    material    TEXT,
    package     TEXT,
    de          REAL,
    pn          REAL,
    valid_until TEXT,
    supplier    TEXT,
    price       REAL
)";

const SELECT_CONTRACTS: &str =
    "SELECT material, package, de, pn, valid_until, supplier, price FROM contracts ORDER BY rowid";

pub struct SqliteContractSource {
    db_path: PathBuf,
}

impl SqliteContractSource {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }
}

impl ContractSource for SqliteContractSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }

    fn load_raw(&self) -> ImportResult<RawLoad> {
        if !self.db_path.exists() {
            return Err(ImportError::FileNotFound(self.db_path.display().to_string()));
        }

        let conn = open_read_only(&self.db_path)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))?;
        let mut stmt = conn.prepare(SELECT_CONTRACTS)?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<f64>>(6)?,
            ))
        })?;

        let mut load = RawLoad::default();
        for (idx, row) in rows.enumerate() {
            let (material, package, de, pn, valid_until, supplier, price) = row?;
            let row_number = idx + 1;
            load.total_rows += 1;

            let valid_until_text = valid_until.as_deref().map(str::trim).filter(|v| !v.is_empty());
            let parsed_date = valid_until_text.and_then(parse_contract_date);
            if let (Some(text), None) = (valid_until_text, parsed_date) {
                load.violations.push(DqViolation {
                    row_number,
                    material: material.clone(),
                    level: DqLevel::Error,
                    field: "valid_until".to_string(),
                    message: format!("日期格式错误: {}", text),
                });
                continue;
            }

            load.records.push(RawContractRecord {
                material: non_blank(material),
                package: non_blank(package).map(|p| normalize_package(&p)),
                outer_diameter: de,
                nominal_pressure: pn,
                valid_until: parsed_date,
                supplier: non_blank(supplier),
                price,
                row_number,
            });
        }

        debug!(rows = load.total_rows, "SQLite 合同表读取完成");
        Ok(load)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
