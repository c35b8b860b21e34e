//! Text extraction from uploaded documents.
//!
//! PDF and DOCX support are feature-gated (`pdf`, `docx`, both on by
//! default); plain text always works. Parsing runs on the blocking pool
//! since both formats are CPU-bound.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    /// Maps a file extension (case-insensitive, no dot) to a type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The extracted text plus the metadata the job record reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub word_count: usize,
    /// Only populated for paginated formats.
    pub page_count: Option<u32>,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read document file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse {file_type} document: {message}")]
    Parse {
        file_type: FileType,
        message: String,
    },
    #[error("Support for {0} documents is not enabled in this build")]
    Unsupported(FileType),
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Reads the file at `path` and extracts its plain text content.
pub async fn extract_text(path: &Path, file_type: FileType) -> Result<ExtractedDocument, ExtractError> {
    let document = match file_type {
        FileType::Txt => extract_txt(path).await?,
        FileType::Pdf => extract_pdf(path).await?,
        FileType::Docx => extract_docx(path).await?,
    };
    info!(
        file_type = %file_type,
        word_count = document.word_count,
        "extracted document text"
    );
    Ok(document)
}

async fn extract_txt(path: &Path) -> Result<ExtractedDocument, ExtractError> {
    let text = tokio::fs::read_to_string(path).await?;
    let word_count = count_words(&text);
    Ok(ExtractedDocument {
        text,
        word_count,
        page_count: None,
    })
}

#[cfg(feature = "pdf")]
async fn extract_pdf(path: &Path) -> Result<ExtractedDocument, ExtractError> {
    use pdf::file::FileOptions;

    let data = tokio::fs::read(path).await?;

    let result = tokio::task::spawn_blocking(move || -> Result<ExtractedDocument, ExtractError> {
        let parse_err = |e: String| ExtractError::Parse {
            file_type: FileType::Pdf,
            message: e,
        };

        let file = FileOptions::cached()
            .load(&data[..])
            .map_err(|e| parse_err(e.to_string()))?;

        let resolver = file.resolver();
        let mut full_text = String::new();
        let num_pages = file.num_pages();

        for page_num in 0..num_pages {
            let page = file
                .get_page(page_num)
                .map_err(|e| parse_err(e.to_string()))?;
            if let Some(content) = &page.contents {
                let operations = content
                    .operations(&resolver)
                    .map_err(|e| parse_err(e.to_string()))?;
                for op in operations.iter() {
                    match op {
                        pdf::content::Op::TextDraw { text } => {
                            full_text.push_str(&text.to_string_lossy());
                        }
                        pdf::content::Op::TextDrawAdjusted { array } => {
                            for item in array.iter() {
                                if let pdf::content::TextDrawAdjusted::Text(text) = item {
                                    full_text.push_str(&text.to_string_lossy());
                                }
                            }
                        }
                        _ => {}
                    }
                }
                full_text.push_str("\n\n"); // Separator between pages
            }
        }

        let word_count = count_words(&full_text);
        Ok(ExtractedDocument {
            text: full_text,
            word_count,
            page_count: Some(num_pages),
        })
    })
    .await;

    result.map_err(|e| ExtractError::Task(e.to_string()))?
}

#[cfg(not(feature = "pdf"))]
async fn extract_pdf(_path: &Path) -> Result<ExtractedDocument, ExtractError> {
    Err(ExtractError::Unsupported(FileType::Pdf))
}

#[cfg(feature = "docx")]
async fn extract_docx(path: &Path) -> Result<ExtractedDocument, ExtractError> {
    let data = tokio::fs::read(path).await?;

    let result = tokio::task::spawn_blocking(move || -> Result<ExtractedDocument, ExtractError> {
        let parse_err = |message: String| ExtractError::Parse {
            file_type: FileType::Docx,
            message,
        };

        let docx = docx_rs::read_docx(&data).map_err(|e| parse_err(e.to_string()))?;
        let json: serde_json::Value =
            serde_json::from_str(&docx.json()).map_err(|e| parse_err(e.to_string()))?;

        // The docx JSON tree is document -> paragraphs -> runs -> text nodes.
        let mut text = String::new();
        if let Some(children) = json
            .pointer("/document/children")
            .and_then(|v| v.as_array())
        {
            for paragraph in children {
                let runs = paragraph
                    .pointer("/data/children")
                    .and_then(|v| v.as_array());
                let Some(runs) = runs else { continue };
                for run in runs {
                    let Some(texts) = run.pointer("/data/children").and_then(|v| v.as_array())
                    else {
                        continue;
                    };
                    for node in texts {
                        if let Some(content) = node.pointer("/data/text").and_then(|v| v.as_str()) {
                            text.push_str(content);
                            text.push(' ');
                        }
                    }
                }
                text.push('\n');
            }
        }

        let word_count = count_words(&text);
        Ok(ExtractedDocument {
            text,
            word_count,
            page_count: None,
        })
    })
    .await;

    result.map_err(|e| ExtractError::Task(e.to_string()))?
}

#[cfg(not(feature = "docx"))]
async fn extract_docx(_path: &Path) -> Result<ExtractedDocument, ExtractError> {
    Err(ExtractError::Unsupported(FileType::Docx))
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
