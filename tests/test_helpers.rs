// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构造合同记录、写入临时 CSV / SQLite 合同表
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use pipe_procurement::db::open_sqlite_connection;
use pipe_procurement::importer::CONTRACTS_TABLE_DDL;
use pipe_procurement::{ContractCatalog, ContractRecord, ProcurementConfig};
use rusqlite::params;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};

/// 测试基准日期
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 合同记录构造器
pub struct ContractBuilder {
    record: ContractRecord,
}

impl ContractBuilder {
    pub fn new(material: &str, supplier: &str, price: f64) -> Self {
        Self {
            record: ContractRecord {
                material: material.to_string(),
                package: "barre".to_string(),
                outer_diameter: 160.0,
                nominal_pressure: 16.0,
                valid_until: date(2030, 12, 31),
                supplier: supplier.to_string(),
                price,
                row_number: 0,
            },
        }
    }

    pub fn package(mut self, package: &str) -> Self {
        self.record.package = package.to_string();
        self
    }

    pub fn de(mut self, outer_diameter: f64) -> Self {
        self.record.outer_diameter = outer_diameter;
        self
    }

    pub fn pn(mut self, nominal_pressure: f64) -> Self {
        self.record.nominal_pressure = nominal_pressure;
        self
    }

    pub fn valid_until(mut self, valid_until: NaiveDate) -> Self {
        self.record.valid_until = valid_until;
        self
    }

    pub fn build(self) -> ContractRecord {
        self.record
    }
}

/// 按插入顺序编号行号后生成目录
pub fn catalog_of(records: Vec<ContractRecord>) -> ContractCatalog {
    let records = records
        .into_iter()
        .enumerate()
        .map(|(i, mut r)| {
            r.row_number = i + 2;
            r
        })
        .collect();
    ContractCatalog::new(records)
}

/// 写入临时 CSV 合同表
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn write_csv(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// 创建临时 SQLite 合同库并写入记录
///
/// 每行: (material, package, de, pn, valid_until, supplier, price)
pub fn write_sqlite(
    rows: &[(&str, &str, f64, f64, &str, &str, f64)],
) -> Result<NamedTempFile, Box<dyn Error>> {
    let file = Builder::new().suffix(".db").tempfile()?;
    let conn = open_sqlite_connection(file.path())?;
    conn.execute(CONTRACTS_TABLE_DDL, [])?;

    for (material, package, de, pn, valid_until, supplier, price) in rows {
        conn.execute(
            "INSERT INTO contracts (material, package, de, pn, valid_until, supplier, price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![material, package, de, pn, valid_until, supplier, price],
        )?;
    }

    Ok(file)
}

/// 一行 Excel 合同: (material, package, de, pn, valid_until, supplier, price)
pub type XlsxRow<'a> = (&'a str, &'a str, f64, f64, (u16, u8, u8), &'a str, f64);

/// 创建临时 Excel 合同表
///
/// DE / PN / Price 写为数值单元格，Valid_Until 写为带日期格式的日期单元格
pub fn write_xlsx(rows: &[XlsxRow]) -> Result<NamedTempFile, Box<dyn Error>> {
    let file = Builder::new().suffix(".xlsx").tempfile()?;
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();

    let headers = ["Material", "Package", "DE", "PN", "Valid_Until", "Supplier", "Price"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, (material, package, de, pn, (y, m, d), supplier, price)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, *material)?;
        worksheet.write_string(row, 1, *package)?;
        worksheet.write_number(row, 2, *de)?;
        worksheet.write_number(row, 3, *pn)?;
        let valid_until = ExcelDateTime::from_ymd(*y, *m, *d)?;
        worksheet.write_datetime_with_format(row, 4, &valid_until, &date_format)?;
        worksheet.write_string(row, 5, *supplier)?;
        worksheet.write_number(row, 6, *price)?;
    }

    workbook.save(file.path())?;
    Ok(file)
}

/// 指向给定合同表的默认配置
pub fn config_for(path: PathBuf) -> ProcurementConfig {
    ProcurementConfig {
        catalog_path: Some(path),
        ..ProcurementConfig::default()
    }
}
