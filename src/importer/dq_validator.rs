// ==========================================
// 管材采购决策 - 数据质量校验器实现
// ==========================================
// 职责: 合同行 DQ 校验 + DQ 报告生成
// Error: 该行不进入合同目录（缺失有效期、价格等）
// Warning: 允许进入，但需人工关注
// ==========================================

use crate::domain::contract::{DqLevel, DqReport, DqSummary, DqViolation, RawContractRecord};
use crate::domain::types::PackageType;
use crate::importer::contract_importer_trait::DqValidator as DqValidatorTrait;
use std::collections::HashSet;

pub struct DqValidator {
    price_anomaly_threshold: f64, // 单价异常阈值（€/ml）
}

impl DqValidator {
    pub fn new(price_anomaly_threshold: f64) -> Self {
        Self {
            price_anomaly_threshold,
        }
    }

    fn violation(
        record: &RawContractRecord,
        level: DqLevel,
        field: &str,
        message: impl Into<String>,
    ) -> DqViolation {
        DqViolation {
            row_number: record.row_number,
            material: record.material.clone(),
            level,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new(10_000.0)
    }
}

impl DqValidatorTrait for DqValidator {
    /// 校验必填字段
    fn validate_required_fields(&self, record: &RawContractRecord) -> Vec<DqViolation> {
        let checks = [
            ("material", record.material.is_none(), "材料缺失"),
            ("package", record.package.is_none(), "包装形式缺失"),
            ("outer_diameter", record.outer_diameter.is_none(), "DE 缺失"),
            ("nominal_pressure", record.nominal_pressure.is_none(), "PN 缺失"),
            ("valid_until", record.valid_until.is_none(), "合同有效期缺失"),
            ("supplier", record.supplier.is_none(), "供应商缺失"),
            ("price", record.price.is_none(), "价格缺失"),
        ];

        checks
            .iter()
            .filter(|(_, missing, _)| *missing)
            .map(|(field, _, message)| Self::violation(record, DqLevel::Error, field, *message))
            .collect()
    }

    /// 校验取值
    fn validate_values(&self, record: &RawContractRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        // 包装形式不在 couronne/barre/touret 内
        if let Some(package) = &record.package {
            if PackageType::parse_normalized(package).is_none() {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "package",
                    format!("未知包装形式: {}", package),
                ));
            }
        }

        // 价格范围
        if let Some(price) = record.price {
            if price <= 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "price",
                    format!("价格 <= 0: {:.2}", price),
                ));
            } else if price > self.price_anomaly_threshold {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "price",
                    format!(
                        "价格异常 ({:.2} > {:.2} €/ml)，可能单位错误",
                        price, self.price_anomaly_threshold
                    ),
                ));
            }
        }

        // DE / PN 范围
        if let Some(de) = record.outer_diameter {
            if de <= 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "outer_diameter",
                    format!("DE <= 0: {}", de),
                ));
            } else if de.fract() != 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Info,
                    "outer_diameter",
                    format!("DE 非整数: {}，查询按整数 DE 匹配", de),
                ));
            }
        }
        if let Some(pn) = record.nominal_pressure {
            if pn <= 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    "nominal_pressure",
                    format!("PN <= 0: {}", pn),
                ));
            }
        }

        violations
    }

    /// 校验重复行
    fn validate_duplicates(&self, records: &[RawContractRecord]) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            let key = (
                record.material.clone(),
                record.package.clone(),
                record.outer_diameter.map(f64::to_bits),
                record.nominal_pressure.map(f64::to_bits),
                record.supplier.clone(),
            );
            if !seen.insert(key) {
                violations.push(Self::violation(
                    record,
                    DqLevel::Info,
                    "supplier",
                    "同一供应商重复合同行（均保留，按价格排序）",
                ));
            }
        }

        violations
    }

    /// 生成 DQ 报告
    fn generate_dq_report(
        &self,
        source: String,
        total_rows: usize,
        loaded: usize,
        violations: Vec<DqViolation>,
    ) -> DqReport {
        // ERROR 按行计数
        let blocked = violations
            .iter()
            .filter(|v| matches!(v.level, DqLevel::Error))
            .map(|v| v.row_number)
            .collect::<HashSet<_>>()
            .len();
        let warning = violations
            .iter()
            .filter(|v| matches!(v.level, DqLevel::Warning))
            .count();

        DqReport {
            source,
            summary: DqSummary {
                total_rows,
                loaded,
                blocked,
                warning,
            },
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_record(row_number: usize) -> RawContractRecord {
        RawContractRecord {
            material: Some("PEHD".to_string()),
            package: Some("barre".to_string()),
            outer_diameter: Some(160.0),
            nominal_pressure: Some(16.0),
            valid_until: NaiveDate::from_ymd_opt(2030, 12, 31),
            supplier: Some("Elydan".to_string()),
            price: Some(12.5),
            row_number,
        }
    }

    #[test]
    fn test_validate_required_fields_complete() {
        let validator = DqValidator::default();
        assert!(validator
            .validate_required_fields(&create_test_record(2))
            .is_empty());
    }

    #[test]
    fn test_validate_required_fields_missing_price_and_date() {
        let validator = DqValidator::default();
        let mut record = create_test_record(2);
        record.price = None;
        record.valid_until = None;

        let violations = validator.validate_required_fields(&record);

        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.level == DqLevel::Error));
        assert!(violations.iter().any(|v| v.field == "price"));
        assert!(violations.iter().any(|v| v.field == "valid_until"));
    }

    #[test]
    fn test_validate_values_unknown_package() {
        let validator = DqValidator::default();
        let mut record = create_test_record(3);
        record.package = Some("palette".to_string());

        let violations = validator.validate_values(&record);

        assert!(violations
            .iter()
            .any(|v| v.field == "package" && v.level == DqLevel::Warning));
    }

    #[test]
    fn test_validate_values_price_anomaly() {
        let validator = DqValidator::new(100.0);
        let mut record = create_test_record(3);
        record.price = Some(1500.0);

        let violations = validator.validate_values(&record);

        assert!(violations
            .iter()
            .any(|v| v.field == "price" && v.message.contains("价格异常")));
    }

    #[test]
    fn test_validate_duplicates() {
        let validator = DqValidator::default();
        let records = vec![create_test_record(2), create_test_record(3)];

        let violations = validator.validate_duplicates(&records);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_number, 3);
        assert_eq!(violations[0].level, DqLevel::Info);
    }

    #[test]
    fn test_generate_report_counts_blocked_rows_once() {
        let validator = DqValidator::default();
        let mut record = create_test_record(4);
        record.price = None;
        record.supplier = None;
        let violations = validator.validate_required_fields(&record);

        let report = validator.generate_dq_report("test.csv".to_string(), 5, 4, violations);

        assert_eq!(report.summary.blocked, 1);
        assert_eq!(report.summary.loaded, 4);
        assert!(report.has_errors());
    }
}
