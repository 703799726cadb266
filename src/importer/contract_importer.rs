// ==========================================
// 管材采购决策 - 合同导入器
// ==========================================
// 管道: 数据源读取 → DQ 校验 → ContractCatalog + DqReport
// 加载失败（文件缺失、缺少必需列等）直接返回 Err，
// 由 SharedCatalog 记为 DataUnavailable
// ==========================================

use crate::catalog::ContractCatalog;
use crate::domain::contract::{DqLevel, DqReport, DqViolation};
use crate::importer::contract_importer_trait::{
    ContractSource, DqValidator as DqValidatorTrait, FieldMapper as FieldMapperTrait, ParsedSheet,
    RawLoad,
};
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::sqlite_source::SqliteContractSource;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

// ==========================================
// FileContractSource - 表格文件数据源
// ==========================================
pub struct FileContractSource {
    path: PathBuf,
}

impl FileContractSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContractSource for FileContractSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_raw(&self) -> ImportResult<RawLoad> {
        let ParsedSheet { headers, rows } = UniversalFileParser.parse(&self.path)?;
        let mapper = FieldMapper;

        // 表头检查（无数据行时同样执行；短行的缺失单元格留给 DQ 校验）
        let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
        mapper.check_headers(&headers)?;

        let mut load = RawLoad {
            total_rows: rows.len(),
            ..RawLoad::default()
        };

        for (idx, row) in rows.iter().enumerate() {
            // 表头占第 1 行
            let row_number = idx + 2;
            match mapper.map_to_raw_contract(row, row_number) {
                Ok(record) => load.records.push(record),
                Err(e) if e.is_row_level() => load.violations.push(DqViolation {
                    row_number,
                    material: None,
                    level: DqLevel::Error,
                    field: "row".to_string(),
                    message: e.to_string(),
                }),
                Err(e) => return Err(e),
            }
        }

        Ok(load)
    }
}

/// 按扩展名选择数据源
///
/// - .db / .sqlite / .sqlite3 → SQLite
/// - 其他 → 表格文件（.csv / .xlsx / .xls）
pub fn source_for_path(path: &Path) -> Box<dyn ContractSource> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "db" | "sqlite" | "sqlite3" => Box::new(SqliteContractSource::new(path)),
        _ => Box::new(FileContractSource::new(path)),
    }
}

// ==========================================
// ContractImporter - 合同导入器
// ==========================================
pub struct ContractImporter {
    validator: DqValidator,
}

/// 导入结果
#[derive(Debug, Clone)]
pub struct ContractLoad {
    pub catalog: ContractCatalog,
    pub report: DqReport,
}

impl ContractImporter {
    pub fn new(validator: DqValidator) -> Self {
        Self { validator }
    }

    /// 从任意数据源导入合同目录
    #[instrument(skip(self, source), fields(catalog_source = %source.describe()))]
    pub fn import(&self, source: &dyn ContractSource) -> ImportResult<ContractLoad> {
        let start = Instant::now();
        let RawLoad {
            records,
            mut violations,
            total_rows,
        } = source.load_raw()?;

        violations.extend(self.validator.validate_duplicates(&records));

        let mut blocked_rows: HashSet<usize> = violations
            .iter()
            .filter(|v| matches!(v.level, DqLevel::Error))
            .map(|v| v.row_number)
            .collect();

        let mut contracts = Vec::with_capacity(records.len());
        for record in records {
            let required = self.validator.validate_required_fields(&record);
            violations.extend(self.validator.validate_values(&record));

            if !required.is_empty() {
                blocked_rows.insert(record.row_number);
                violations.extend(required);
                continue;
            }

            // 必填校验通过后转换不会失败
            match record.into_contract() {
                Some(contract) => contracts.push(contract),
                None => {
                    return Err(ImportError::InternalError(
                        "必填字段校验与记录转换不一致".to_string(),
                    ))
                }
            }
        }

        let loaded = contracts.len();
        violations.sort_by_key(|v| v.row_number);
        let report =
            self.validator
                .generate_dq_report(source.describe(), total_rows, loaded, violations);

        if !blocked_rows.is_empty() {
            warn!(blocked = blocked_rows.len(), "部分合同行因 DQ 错误未加载");
        }
        if loaded == 0 {
            warn!("合同目录为空，所有查询将无匹配");
        }
        info!(
            total_rows,
            loaded,
            warnings = report.summary.warning,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "合同导入完成"
        );

        Ok(ContractLoad {
            catalog: ContractCatalog::new(contracts),
            report,
        })
    }

    /// 从文件路径导入（按扩展名选择数据源）
    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<ContractLoad> {
        let source = source_for_path(path.as_ref());
        self.import(source.as_ref())
    }

    /// 仅返回合同目录
    pub fn load_catalog<P: AsRef<Path>>(&self, path: P) -> ImportResult<ContractCatalog> {
        self.import_path(path).map(|load| load.catalog)
    }
}

impl Default for ContractImporter {
    fn default() -> Self {
        Self::new(DqValidator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_import_excludes_rows_missing_price_or_date() {
        let file = write_csv(&[
            "Material,Package,DE,PN,Valid_Until,Supplier,Price",
            "PEHD,barre,160,16,2030-12-31,Elydan,12.5",
            "PEHD,barre,160,16,,Centraltubi,11.0",
            "PEHD,barre,160,16,2030-12-31,Other,",
        ]);

        let load = ContractImporter::default().import_path(file.path()).unwrap();

        assert_eq!(load.catalog.len(), 1);
        assert_eq!(load.report.summary.total_rows, 3);
        assert_eq!(load.report.summary.loaded, 1);
        assert_eq!(load.report.summary.blocked, 2);
    }

    #[test]
    fn test_import_normalizes_package() {
        let file = write_csv(&[
            "Material,Package,DE,PN,Valid_Until,Supplier,Price",
            "PEHD,  TOURET ,63,10,2030-12-31,Elydan,3.2",
        ]);

        let catalog = ContractImporter::default().load_catalog(file.path()).unwrap();

        assert_eq!(catalog.records()[0].package, "touret");
    }

    #[test]
    fn test_import_bad_row_is_reported_not_fatal() {
        let file = write_csv(&[
            "Material,Package,DE,PN,Valid_Until,Supplier,Price",
            "PEHD,barre,abc,16,2030-12-31,Elydan,12.5",
            "PEHD,barre,160,16,2030-12-31,Elydan,12.5",
        ]);

        let load = ContractImporter::default().import_path(file.path()).unwrap();

        assert_eq!(load.catalog.len(), 1);
        assert!(load.report.violations.iter().any(|v| v.row_number == 2));
    }

    #[test]
    fn test_import_missing_column_is_fatal() {
        let file = write_csv(&["Material,Package,DE,PN,Supplier,Price", "PEHD,barre,160,16,Elydan,12.5"]);

        let result = ContractImporter::default().import_path(file.path());

        assert!(matches!(result, Err(ImportError::MissingColumn(_))));
    }

    #[test]
    fn test_import_short_first_row_is_blocked_not_fatal() {
        let file = write_csv(&[
            "Material,Package,DE,PN,Valid_Until,Supplier,Price",
            "PEHD,barre,160,16,2030-12-31,Elydan",
            "PEHD,barre,160,16,2030-12-31,Centraltubi,11.0",
        ]);

        let load = ContractImporter::default().import_path(file.path()).unwrap();

        assert_eq!(load.catalog.len(), 1);
        assert_eq!(load.catalog.records()[0].supplier, "Centraltubi");
        assert_eq!(load.report.summary.blocked, 1);
        assert!(load
            .report
            .violations
            .iter()
            .any(|v| v.row_number == 2 && v.level == DqLevel::Error));
    }

    #[test]
    fn test_import_header_only_missing_column_is_fatal() {
        let file = write_csv(&["Material,Package"]);

        let result = ContractImporter::default().import_path(file.path());

        assert!(matches!(result, Err(ImportError::MissingColumn(ref c)) if c == "DE"));
    }

    #[test]
    fn test_import_missing_file_is_fatal() {
        let result = ContractImporter::default().import_path("/nonexistent/contracts.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
