//! 결과 포맷터
//!
//! 실행 결과 행을 응답 본문으로 직렬화합니다. 두 형식 모두 한 번의 순회로
//! 행을 하나씩 기록하므로 전체 결과를 메모리에 올리지 않습니다.
//!
//! ```text
//! JSON: {"0":{"col1":v,"col2":v},"1":{...}}
//! CSV:  ,col1,col2
//!       0,v,v
//! ```

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use thiserror::Error;

use crate::value::{CellValue, Row};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// 포맷 에러
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported format: {requested}; supported formats: application/json, text/csv")]
    Unsupported { requested: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 응답 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => JSON_CONTENT_TYPE,
            OutputFormat::Csv => CSV_CONTENT_TYPE,
        }
    }

    /// 미디어 타입에서 파싱 (파라미터 무시, 대소문자 무시)
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            Some(OutputFormat::Json)
        } else if essence.eq_ignore_ascii_case(CSV_CONTENT_TYPE) {
            Some(OutputFormat::Csv)
        } else {
            None
        }
    }

    /// Accept 헤더로 형식 결정
    ///
    /// 헤더가 없거나 비어 있거나 `*/*`이면 `default`를 사용합니다.
    /// 여러 항목이 있으면 앞에서부터 처음 지원되는 형식을 고릅니다.
    pub fn from_accept(accept: Option<&str>, default: OutputFormat) -> Result<Self, FormatError> {
        let Some(accept) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(default);
        };

        for entry in accept.split(',') {
            let essence = entry.split(';').next().unwrap_or("").trim();
            if essence == "*/*" {
                return Ok(default);
            }
            if let Some(format) = Self::from_media_type(essence) {
                return Ok(format);
            }
        }

        Err(FormatError::Unsupported {
            requested: accept.to_string(),
        })
    }

    /// 행 스트림 기록
    ///
    /// # Returns
    /// 기록한 행 수
    pub fn write<W, I>(&self, writer: &mut W, columns: &[String], rows: I) -> Result<u64, FormatError>
    where
        W: Write,
        I: IntoIterator<Item = Row>,
    {
        match self {
            OutputFormat::Json => write_json(writer, columns, rows),
            OutputFormat::Csv => write_csv(writer, columns, rows),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_media_type(s).ok_or_else(|| FormatError::Unsupported {
            requested: s.to_string(),
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

/// JSON 기록: 행 번호 문자열 -> (컬럼 -> 값), 컬럼 순서 유지
pub fn write_json<W, I>(writer: &mut W, columns: &[String], rows: I) -> Result<u64, FormatError>
where
    W: Write,
    I: IntoIterator<Item = Row>,
{
    let mut count = 0u64;
    writer.write_all(b"{")?;

    for row in rows {
        if count > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "\"{}\":{{", count)?;

        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                writer.write_all(b",")?;
            }
            serde_json::to_writer(&mut *writer, column)?;
            writer.write_all(b":")?;
            serde_json::to_writer(&mut *writer, row.get(column).unwrap_or(&CellValue::Null))?;
        }

        writer.write_all(b"}")?;
        count += 1;
    }

    writer.write_all(b"}")?;
    Ok(count)
}

/// CSV 기록: 첫 컬럼은 이름 없는 행 번호, 줄 끝은 `\n`
pub fn write_csv<W, I>(writer: &mut W, columns: &[String], rows: I) -> Result<u64, FormatError>
where
    W: Write,
    I: IntoIterator<Item = Row>,
{
    let mut line = Vec::with_capacity(256);

    for column in columns {
        line.push(b',');
        push_cell(&mut line, column.as_bytes());
    }
    line.push(b'\n');
    writer.write_all(&line)?;

    let mut count = 0u64;
    for row in rows {
        line.clear();
        line.extend_from_slice(count.to_string().as_bytes());

        for column in columns {
            line.push(b',');
            if let Some(value) = row.get(column) {
                push_cell(&mut line, value.to_csv_text().as_bytes());
            }
        }
        line.push(b'\n');
        writer.write_all(&line)?;
        count += 1;
    }

    Ok(count)
}

/// RFC 4180 인용: 구분자/따옴표/개행이 있을 때만 감쌈
fn push_cell(out: &mut Vec<u8>, cell: &[u8]) {
    let needs_quoting = cell
        .iter()
        .any(|&b| b == b',' || b == b'"' || b == b'\n' || b == b'\r');

    if !needs_quoting {
        out.extend_from_slice(cell);
        return;
    }

    out.push(b'"');
    for &b in cell {
        if b == b'"' {
            out.push(b'"');
        }
        out.push(b);
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["column1".to_string(), "column2".to_string()]
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|_| {
                Row::from([
                    ("column1".to_string(), CellValue::from("value1")),
                    ("column2".to_string(), CellValue::from("value2")),
                ])
            })
            .collect()
    }

    fn render(format: OutputFormat, columns: &[String], rows: Vec<Row>) -> String {
        let mut out = Vec::new();
        format.write(&mut out, columns, rows).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_output() {
        let body = render(OutputFormat::Json, &columns(), rows(3));
        assert_eq!(
            body,
            r#"{"0":{"column1":"value1","column2":"value2"},"1":{"column1":"value1","column2":"value2"},"2":{"column1":"value1","column2":"value2"}}"#
        );

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_json_preserves_column_order() {
        let columns = vec!["z".to_string(), "a".to_string(), "missing".to_string()];
        let row = Row::from([
            ("a".to_string(), CellValue::from(1i64)),
            ("z".to_string(), CellValue::from(true)),
        ]);

        let body = render(OutputFormat::Json, &columns, vec![row]);
        assert_eq!(body, r#"{"0":{"z":true,"a":1,"missing":null}}"#);
    }

    #[test]
    fn test_csv_output() {
        let body = render(OutputFormat::Csv, &columns(), rows(3));
        assert_eq!(
            body,
            ",column1,column2\n0,value1,value2\n1,value1,value2\n2,value1,value2\n"
        );
    }

    #[test]
    fn test_csv_quoting() {
        let columns = vec!["name".to_string(), "note".to_string(), "n".to_string()];
        let row = Row::from([
            ("name".to_string(), CellValue::from("Smith, J")),
            ("note".to_string(), CellValue::from("say \"hi\"\nbye")),
            ("n".to_string(), CellValue::Null),
        ]);

        let body = render(OutputFormat::Csv, &columns, vec![row]);
        assert_eq!(
            body,
            ",name,note,n\n0,\"Smith, J\",\"say \"\"hi\"\"\nbye\",\n"
        );
    }

    #[test]
    fn test_csv_header_quoting() {
        let columns = vec![
            "weight, kg".to_string(),
            "say \"hi\"".to_string(),
            "plain".to_string(),
        ];
        let row = Row::from([
            ("weight, kg".to_string(), CellValue::from(12i64)),
            ("plain".to_string(), CellValue::from("x")),
        ]);

        let body = render(OutputFormat::Csv, &columns, vec![row]);
        assert_eq!(body, ",\"weight, kg\",\"say \"\"hi\"\"\",plain\n0,12,,x\n");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(render(OutputFormat::Json, &columns(), vec![]), "{}");
        assert_eq!(render(OutputFormat::Csv, &columns(), vec![]), ",column1,column2\n");
    }

    #[test]
    fn test_streams_lazily() {
        let mut out = Vec::new();
        let lazy = (0..1000).map(|i| Row::from([("column1".to_string(), CellValue::from(i as i64))]));
        let count = OutputFormat::Csv.write(&mut out, &columns(), lazy).unwrap();
        assert_eq!(count, 1000);
    }

    #[test]
    fn test_from_accept() {
        let json = OutputFormat::Json;
        assert_eq!(OutputFormat::from_accept(None, json).unwrap(), json);
        assert_eq!(OutputFormat::from_accept(Some(""), json).unwrap(), json);
        assert_eq!(OutputFormat::from_accept(Some("*/*"), OutputFormat::Csv).unwrap(), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_accept(Some("text/csv"), json).unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::from_accept(Some("text/html, application/json;q=0.9"), OutputFormat::Csv).unwrap(),
            OutputFormat::Json
        );

        let err = OutputFormat::from_accept(Some("application/xml"), json).unwrap_err();
        assert!(err.to_string().contains("application/json, text/csv"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("TEXT/CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
