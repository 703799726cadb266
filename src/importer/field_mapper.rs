// ==========================================
// 管材采购决策 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射 + 类型转换
// 列名匹配: 忽略大小写、空格、下划线、连字符
// ==========================================

use crate::domain::contract::RawContractRecord;
use crate::domain::types::normalize_package;
use crate::importer::contract_importer_trait::FieldMapper as FieldMapperTrait;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

// ==========================================
// 标准字段与别名
// ==========================================
pub const COL_MATERIAL: &str = "Material";
pub const COL_PACKAGE: &str = "Package";
pub const COL_DE: &str = "DE";
pub const COL_PN: &str = "PN";
pub const COL_VALID_UNTIL: &str = "Valid_Until";
pub const COL_SUPPLIER: &str = "Supplier";
pub const COL_PRICE: &str = "Price";

/// 必需列（按合同表约定顺序）
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_MATERIAL,
    COL_PACKAGE,
    COL_DE,
    COL_PN,
    COL_VALID_UNTIL,
    COL_SUPPLIER,
    COL_PRICE,
];

/// 别名（已规范化）
fn aliases(column: &str) -> &'static [&'static str] {
    match column {
        COL_MATERIAL => &["material", "materiau", "matériau"],
        COL_PACKAGE => &["package", "conditionnement", "packaging"],
        COL_DE => &["de", "outerdiameter", "diametreexterieur", "diamètreextérieur"],
        COL_PN => &["pn", "nominalpressure", "pressionnominale"],
        COL_VALID_UNTIL => &["validuntil", "validite", "validité", "datefin"],
        COL_SUPPLIER => &["supplier", "fournisseur"],
        COL_PRICE => &["price", "prix", "prixml"],
        _ => &[],
    }
}

/// 列名规范化: 小写 + 去除空格/下划线/连字符
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn check_headers(&self, headers: &[&str]) -> ImportResult<()> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

        for column in REQUIRED_COLUMNS {
            let present = aliases(column)
                .iter()
                .any(|alias| normalized.iter().any(|h| h == alias));
            if !present {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    fn map_to_raw_contract(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<RawContractRecord> {
        let row = normalize_row(row);

        Ok(RawContractRecord {
            material: self.get_string(&row, COL_MATERIAL),
            package: self
                .get_string(&row, COL_PACKAGE)
                .map(|p| normalize_package(&p)),
            outer_diameter: self.parse_f64(&row, COL_DE, row_number)?,
            nominal_pressure: self.parse_f64(&row, COL_PN, row_number)?,
            valid_until: self.parse_date(&row, COL_VALID_UNTIL, row_number)?,
            supplier: self.get_string(&row, COL_SUPPLIER),
            price: self.parse_f64(&row, COL_PRICE, row_number)?,
            row_number,
        })
    }
}

fn normalize_row(row: &HashMap<String, String>) -> HashMap<String, String> {
    row.iter()
        .map(|(k, v)| (normalize_header(k), v.clone()))
        .collect()
}

impl FieldMapper {
    /// 提取字符串字段（空白视为缺失），按别名依次尝试
    fn get_string(&self, row: &HashMap<String, String>, column: &str) -> Option<String> {
        for alias in aliases(column) {
            if let Some(v) = row.get(*alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() && !is_null_marker(trimmed) {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 解析浮点数（兼容小数逗号与 € 后缀）
    fn parse_f64(
        &self,
        row: &HashMap<String, String>,
        column: &str,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.get_string(row, column) {
            None => Ok(None),
            Some(value) => parse_decimal(&value)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row_number,
                    field: column.to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
        }
    }

    /// 解析日期
    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        column: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, column) {
            None => Ok(None),
            Some(value) => parse_contract_date(&value)
                .map(Some)
                .ok_or_else(|| ImportError::DateFormatError {
                    row: row_number,
                    field: column.to_string(),
                    value,
                }),
        }
    }
}

/// 表格导出的空值标记
fn is_null_marker(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "nan" | "nat" | "null" | "none")
}

/// 数值解析: 去除 €、空格，小数逗号转点
pub fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = if cleaned.contains('.') {
        cleaned
    } else {
        cleaned.replace(',', ".")
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 合同有效期解析
///
/// 支持 YYYY-MM-DD / YYYYMMDD / DD/MM/YYYY / 带时间部分的日期时间
pub fn parse_contract_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}
