//! Files attached to multipart uploads.

use bytes::Bytes;

/// Supported upload file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Jpeg,
    Png,
    Pdf,
}

impl FileType {
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Guess the type from a file extension, ignoring case and a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// A file the caller wants to upload.
pub trait UploadFile {
    /// File contents; `None` means the file part is skipped.
    fn data(&self) -> Option<&[u8]>;
    fn name(&self) -> &str;
    fn file_type(&self) -> Option<FileType>;
    fn extension(&self) -> &str;

    /// MIME type for the part header, empty when the type is unknown.
    fn mime_type(&self) -> &str {
        self.file_type().map(FileType::mime_type).unwrap_or("")
    }
}

/// In-memory [`UploadFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub extension: String,
    pub file_type: Option<FileType>,
    pub data: Option<Bytes>,
}

impl FileAttachment {
    /// Build an attachment, inferring the type from the name's extension.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        let file_type = FileType::from_extension(&extension);
        Self {
            name,
            extension,
            file_type,
            data: Some(data.into()),
        }
    }

    pub fn with_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }
}

impl UploadFile for FileAttachment {
    fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn file_type(&self) -> Option<FileType> {
        self.file_type
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}
