/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! In-memory tabular model for inventory sheets.
//!
//! Cells are addressed by their header label. A label that is not present in
//! a sheet reads as [`CellValue::Empty`], so a renamed column degrades to the
//! field default instead of failing the export.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value;

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the workbook already typed as a date-time (no timezone).
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Render the cell as trimmed text. Empty cells yield `None`.
    ///
    /// Integral numbers render without a fractional part so that a numeric
    /// key such as `42` joins against the text `"42"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Text(s) => parse_localized_number(s),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// The cell as a JSON scalar, keeping its original type.
    ///
    /// Whole numbers, including numeric text such as `"3"`, become JSON
    /// integers. Other text is kept as a trimmed string.
    pub fn as_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::Null,
            CellValue::Number(n) => number_value(*n),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Value::Null
                } else if let Ok(n) = trimmed.parse::<i64>() {
                    Value::from(n)
                } else {
                    Value::String(trimmed.to_string())
                }
            }
            CellValue::DateTime(_) => self.as_text().map(Value::String).unwrap_or(Value::Null),
        }
    }

    /// Integral value of the cell, if it holds a whole number.
    pub fn as_i64(&self) -> Option<i64> {
        let n = self.as_f64()?;
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            Some(n as i64)
        } else {
            None
        }
    }
}

/// Parse a number written with either `,` or `.` as the decimal separator.
///
/// When both appear, the last one is the decimal separator and the other is
/// grouping (`1.500,50`, `1,500.50`). A single separator kind used once is
/// decimal (`1500,50`); used more than once it is grouping (`1.500.000`).
fn parse_localized_number(raw: &str) -> Option<f64> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if compact.is_empty() {
        return None;
    }

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) if compact.matches(',').count() > 1 => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        (None, Some(_)) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        _ => compact,
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// A named sheet: a header row plus data rows in source order.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.into().trim().to_string())
            .collect();
        let mut columns = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            // First occurrence wins for duplicated labels.
            columns.entry(header.clone()).or_insert(idx);
        }
        Self {
            name: name.into(),
            headers,
            columns,
            rows: Vec::new(),
        }
    }

    /// An empty stand-in for a sheet that is absent from the workbook.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::<String>::new())
    }

    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(cells);
    }

    pub fn with_row(mut self, cells: Vec<CellValue>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            sheet: self,
            cells,
            index,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| Row {
            sheet: self,
            cells,
            index,
        })
    }
}

/// A borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    sheet: &'a Sheet,
    cells: &'a [CellValue],
    index: usize,
}

impl<'a> Row<'a> {
    /// Zero-based position of the row among the sheet's data rows.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, label: &str) -> &'a CellValue {
        self.sheet
            .columns
            .get(label)
            .and_then(|idx| self.cells.get(*idx))
            .unwrap_or(&EMPTY)
    }

    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label).as_text()
    }

    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).as_f64()
    }

    pub fn integer(&self, label: &str) -> Option<i64> {
        self.get(label).as_i64()
    }

    pub fn raw(&self, label: &str) -> Value {
        self.get(label).as_json()
    }
}

/// Positions of a sheet's rows grouped by the text of one key column.
///
/// Built once per child sheet; lookups return row positions in source order.
#[derive(Debug, Clone, Default)]
pub struct JoinIndex {
    positions: HashMap<String, Vec<usize>>,
}

impl JoinIndex {
    pub fn build(sheet: &Sheet, key_column: &str) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for row in sheet.rows() {
            if let Some(key) = row.text(key_column) {
                positions.entry(key).or_default().push(row.index());
            }
        }
        Self { positions }
    }

    pub fn lookup(&self, key: &str) -> &[usize] {
        self.positions.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.positions.len()
    }
}
