//! Upload parameters for create-project.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Importer format the server should use for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    LineBased,
    SeparatorBased,
    FixedWidth,
    PcAxis,
    Json,
    Xml,
    Excel,
    OpenDocument,
    RdfNTriples,
    RdfN3,
    RdfTurtle,
    RdfXml,
    Wikitext,
}

impl UploadFormat {
    /// The identifier sent in the `format` form field.
    pub fn value(&self) -> &'static str {
        match self {
            UploadFormat::LineBased => "text/line-based",
            UploadFormat::SeparatorBased => "text/line-based/*sv",
            UploadFormat::FixedWidth => "text/line-based/fixed-width",
            UploadFormat::PcAxis => "text/line-based/pc-axis",
            UploadFormat::Json => "text/json",
            UploadFormat::Xml => "text/xml",
            UploadFormat::Excel => "binary/text/xml/xls/xlsx",
            UploadFormat::OpenDocument => "text/xml/ods",
            UploadFormat::RdfNTriples => "text/rdf/nt",
            UploadFormat::RdfN3 => "text/rdf/n3",
            UploadFormat::RdfTurtle => "text/rdf/ttl",
            UploadFormat::RdfXml => "text/rdf/xml",
            UploadFormat::Wikitext => "text/wiki",
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Importer options, sent as JSON text.
pub trait UploadOptions {
    fn to_json(&self) -> String;
}

impl UploadOptions for Value {
    fn to_json(&self) -> String {
        self.to_string()
    }
}

/// Options for the separator-based (CSV/TSV) importer. Unset fields are left
/// to the server's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_lines: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_lines: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_data_lines: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_cell_value_types: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_quotes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_blank_cells_as_nulls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_file_sources: Option<bool>,
}

impl UploadOptions for SeparatorOptions {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
