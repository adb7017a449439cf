// Domain value objects representing core business concepts

use std::fmt;
use std::path::Path;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// Instructions that steer the assistant
    System,
    /// Message written by the end user
    User,
    /// Earlier reply from the assistant
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "system" => Some(ChatRole::System),
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tabular file format accepted for previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// Comma-separated values (.csv)
    Csv,
    /// Excel Open XML format (.xlsx)
    Xlsx,
    /// Legacy Excel format (.xls)
    Xls,
    /// Excel Open XML Macro-Enabled format (.xlsm)
    Xlsm,
    /// Excel Binary format (.xlsb)
    Xlsb,
}

impl TabularFormat {
    /// Determine the format from the filename extension, case-insensitively
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|os| os.to_str())?
            .to_lowercase();

        match ext.as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xlsx" => Some(TabularFormat::Xlsx),
            "xls" => Some(TabularFormat::Xls),
            "xlsm" => Some(TabularFormat::Xlsm),
            "xlsb" => Some(TabularFormat::Xlsb),
            _ => None,
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, TabularFormat::Csv)
    }

    pub fn all_extensions() -> &'static [&'static str] {
        &["csv", "xlsx", "xls", "xlsm", "xlsb"]
    }
}

impl fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabularFormat::Csv => write!(f, "CSV"),
            TabularFormat::Xlsx => write!(f, "Excel (xlsx)"),
            TabularFormat::Xls => write!(f, "Excel (xls)"),
            TabularFormat::Xlsm => write!(f, "Excel (xlsm)"),
            TabularFormat::Xlsb => write!(f, "Excel (xlsb)"),
        }
    }
}
