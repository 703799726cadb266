// ==========================================
// 管材采购决策 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::contract_importer_trait::{FileParser, ParsedSheet};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 打开 CSV 文件（支持 ; 分隔的欧洲格式）
        let delimiter = sniff_delimiter(path)?;
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(ParsedSheet { headers, rows })
    }
}

/// 根据表头行判断分隔符（`;` 多于 `,` 时使用 `;`）
fn sniff_delimiter(path: &Path) -> ImportResult<u8> {
    let header = BufReader::new(File::open(path)?)
        .lines()
        .next()
        .transpose()?
        .unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）；空工作表的表头为空，由列检查报告缺列
        let mut sheet_rows = range.rows();
        let headers: Vec<String> = sheet_rows
            .next()
            .map(|header_row| {
                header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        // 读取数据行
        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell_to_string(cell));
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(ParsedSheet { headers, rows })
    }
}

/// 单元格转字符串（日期单元格输出 YYYY-MM-DD）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::Empty | Data::Error(_) => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedSheet> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_sheet(path),
            "xlsx" | "xls" => ExcelParser.parse_sheet(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file() -> tempfile::NamedTempFile {
        Builder::new().suffix(".csv").tempfile().unwrap()
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = csv_file();
        writeln!(temp_file, "Material,Package,DE,PN,Valid_Until,Supplier,Price").unwrap();
        writeln!(temp_file, "PEHD,barre,160,16,2030-12-31,Elydan,12.5").unwrap();
        writeln!(temp_file, "PEHD,touret,63,10,2030-12-31,Centraltubi,3.2").unwrap();

        let records = CsvParser.parse_sheet(temp_file.path()).unwrap().rows;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Material"), Some(&"PEHD".to_string()));
        assert_eq!(records[1].get("Supplier"), Some(&"Centraltubi".to_string()));
    }

    #[test]
    fn test_csv_parser_semicolon_delimiter() {
        let mut temp_file = csv_file();
        writeln!(temp_file, "Material;Package;DE;PN;Valid_Until;Supplier;Price").unwrap();
        writeln!(temp_file, "PEHD;barre;160;16;31/12/2030;Elydan;12,5").unwrap();

        let records = CsvParser.parse_sheet(temp_file.path()).unwrap().rows;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Price"), Some(&"12,5".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_sheet(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let mut temp_file = csv_file();
        writeln!(temp_file, "Material,Price").unwrap();
        writeln!(temp_file, "PEHD,2.5").unwrap();
        writeln!(temp_file, ",").unwrap(); // 空行
        writeln!(temp_file, "PVC,3.0").unwrap();

        let records = CsvParser.parse_sheet(temp_file.path()).unwrap().rows;

        // 应跳过空行
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_csv_parser_header_only_file() {
        let mut temp_file = csv_file();
        writeln!(temp_file, "Material,Package").unwrap();

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["Material".to_string(), "Package".to_string()]);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_csv_parser_short_row_keeps_full_header() {
        let mut temp_file = csv_file();
        writeln!(temp_file, "Material,Package,DE,PN,Valid_Until,Supplier,Price").unwrap();
        writeln!(temp_file, "PEHD,barre,160,16,2030-12-31,Elydan").unwrap();

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();

        assert_eq!(sheet.headers.len(), 7);
        assert_eq!(sheet.rows.len(), 1);
        assert!(!sheet.rows[0].contains_key("Price"));
    }

    #[test]
    fn test_csv_parser_bom_header() {
        let mut temp_file = csv_file();
        write!(temp_file, "\u{feff}Material,Price\nPEHD,2.5\n").unwrap();

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();
        assert_eq!(sheet.headers[0], "Material");
        assert_eq!(sheet.rows[0].get("Material"), Some(&"PEHD".to_string()));
    }

    #[test]
    fn test_universal_parser_unsupported_extension() {
        let result = UniversalFileParser.parse("contracts.json");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ref e)) if e == "json"));
    }
}
