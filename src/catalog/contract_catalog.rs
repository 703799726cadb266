// ==========================================
// 管材采购决策 - 合同目录
// ==========================================
// 职责: 持有只读合同记录，回答“哪些有效合同匹配条件（最便宜优先）”
// 红线: 加载后不可变，查询无副作用
// ==========================================

use crate::domain::contract::ContractRecord;
use crate::domain::types::PackageType;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

// ==========================================
// ContractCatalog - 合同目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ContractCatalog {
    records: Vec<ContractRecord>,
}

impl ContractCatalog {
    /// 从合同记录构造目录（保留插入顺序，用于同价排序）
    pub fn new(records: Vec<ContractRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 查询匹配的有效合同
    ///
    /// # 过滤条件
    /// - material 完全相等
    /// - valid_until >= as_of
    /// - outer_diameter / nominal_pressure 数值相等（调用方负责截断等转换）
    /// - package_filter 存在时，规范化后的包装形式相等
    ///
    /// # 排序
    /// - 按 price 升序；同价保持目录插入顺序（稳定排序）
    ///
    /// # 返回
    /// - 截断至 limit 条；无匹配时返回空列表
    pub fn find_matching(
        &self,
        material: &str,
        outer_diameter: f64,
        nominal_pressure: f64,
        as_of: NaiveDate,
        package_filter: Option<PackageType>,
        limit: Option<usize>,
    ) -> Vec<&ContractRecord> {
        let mut matches: Vec<&ContractRecord> = self
            .records
            .iter()
            .filter(|r| r.material == material)
            .filter(|r| r.valid_until >= as_of)
            .filter(|r| r.outer_diameter == outer_diameter)
            .filter(|r| r.nominal_pressure == nominal_pressure)
            .filter(|r| package_filter.map_or(true, |p| r.package == p.as_str()))
            .collect();

        // Vec::sort_by 为稳定排序
        matches.sort_by(|a, b| a.price.total_cmp(&b.price));

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        debug!(
            material,
            outer_diameter,
            nominal_pressure,
            %as_of,
            package = ?package_filter,
            matched = matches.len(),
            "合同查询完成"
        );

        matches
    }

    /// 目录中出现的材料（去重、排序）
    pub fn materials(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.material.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 目录中出现的 DE（去重、升序）
    pub fn outer_diameters(&self) -> Vec<f64> {
        sorted_unique(self.records.iter().map(|r| r.outer_diameter))
    }

    /// 目录中出现的 PN（去重、升序）
    pub fn nominal_pressures(&self) -> Vec<f64> {
        sorted_unique(self.records.iter().map(|r| r.nominal_pressure))
    }
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}
