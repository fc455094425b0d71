//! 结果文件写出 - 服务层
//!
//! 按发现顺序一次性写出全部记录。CSV 包含六个
//! 固定列；JSON 包含完整记录，含创始人配对和
//! 补全状态。

use crate::config::{Config, OutputFormat};
use crate::error::OutputError;
use crate::models::CompanyRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

pub const CSV_HEADERS: [&str; 6] = [
    "Company Name",
    "Batch",
    "Short Description",
    "Company url",
    "Founder Name(s)",
    "Founder LinkedIn URL(s)",
];

/// 一行 csv；字段顺序必须与 `CSV_HEADERS` 一致
#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    batch: &'a str,
    description: &'a str,
    url: &'a str,
    founder_names: String,
    founder_links: String,
}

impl<'a> From<&'a CompanyRecord> for CsvRow<'a> {
    fn from(record: &'a CompanyRecord) -> Self {
        Self {
            name: &record.summary.name,
            batch: &record.summary.batch,
            description: &record.summary.description,
            url: &record.summary.url,
            founder_names: record.joined_founder_names(),
            founder_links: record.joined_founder_links(),
        }
    }
}

pub struct ResultSink {
    path: PathBuf,
    format: OutputFormat,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output_path, config.output_format)
    }

    /// 把所有记录写入输出文件，覆盖旧文件
    pub fn write(&self, records: &[CompanyRecord]) -> Result<PathBuf, OutputError> {
        let io_err = |source| OutputError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        match self.format {
            OutputFormat::Csv => write_csv(&mut writer, records)?,
            OutputFormat::Json => write_json(&mut writer, records)?,
        }
        writer.flush().map_err(io_err)?;

        debug!("wrote {} records to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

/// 即使没有记录也会写表头
pub fn write_csv<W: Write>(out: W, records: &[CompanyRecord]) -> Result<(), OutputError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_json<W: Write>(out: W, records: &[CompanyRecord]) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(out, records)?;
    Ok(())
}
