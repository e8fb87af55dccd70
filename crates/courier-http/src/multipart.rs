//! multipart/form-data body assembly.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::file::UploadFile;

/// Fresh boundary token for one request.
pub fn new_boundary() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a multipart/form-data body part by part.
#[derive(Debug)]
pub struct MultipartBody {
    boundary: String,
    buf: BytesMut,
}

impl MultipartBody {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: BytesMut::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Append a text field.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.open_part();
        self.buf.put_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.buf.put_slice(value.as_bytes());
        self
    }

    /// Append a file under `field_key`. Files without data are skipped.
    pub fn file(&mut self, field_key: &str, file: &dyn UploadFile) -> &mut Self {
        let Some(data) = file.data() else {
            tracing::debug!(
                target: courier_log::NETWORK,
                file = %file.name(),
                "skipping multipart file without data"
            );
            return self;
        };

        self.open_part();
        self.buf.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_key,
                file.name()
            )
            .as_bytes(),
        );
        self.buf
            .put_slice(format!("Content-Type: {}\r\n\r\n", file.mime_type()).as_bytes());
        self.buf.put_slice(data);
        self
    }

    /// Write the closing delimiter and return the body.
    pub fn finish(mut self) -> Bytes {
        self.buf
            .put_slice(format!("\r\n--{}--\r\n", self.boundary).as_bytes());
        self.buf.freeze()
    }

    fn open_part(&mut self) {
        self.buf
            .put_slice(format!("\r\n--{}\r\n", self.boundary).as_bytes());
    }
}

/// Assemble a complete body from text fields and an optional file.
///
/// Fields are written in the iterator's order.
pub fn build_multipart_body<I, K, V>(
    boundary: &str,
    text_fields: I,
    file: Option<&dyn UploadFile>,
    file_field_key: &str,
) -> Bytes
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut body = MultipartBody::new(boundary);
    for (name, value) in text_fields {
        body.text(name.as_ref(), value.as_ref());
    }
    if let Some(file) = file {
        body.file(file_field_key, file);
    }
    body.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileAttachment, FileType};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn as_text(bytes: &Bytes) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_single_text_field() {
        let body = build_multipart_body("B", [("a", "1")], None, "file");
        assert_eq!(
            as_text(&body),
            "\r\n--B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--B--\r\n"
        );
    }

    #[test]
    fn test_empty_body_is_only_closer() {
        let body = build_multipart_body("B", Vec::<(&str, &str)>::new(), None, "file");
        assert_eq!(as_text(&body), "\r\n--B--\r\n");
    }

    #[test]
    fn test_file_part() {
        let file = FileAttachment::new("photo.jpg", Bytes::from_static(b"JPEGDATA"));
        let body = build_multipart_body("B", Vec::<(&str, &str)>::new(), Some(&file), "avatar");
        assert_eq!(
            as_text(&body),
            "\r\n--B\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"photo.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--B--\r\n"
        );
    }

    #[test]
    fn test_file_without_data_is_skipped() {
        let file = FileAttachment {
            name: "missing.pdf".to_string(),
            extension: "pdf".to_string(),
            file_type: Some(FileType::Pdf),
            data: None,
        };
        let body = build_multipart_body("B", [("k", "v")], Some(&file), "doc");
        assert!(!as_text(&body).contains("filename="));
        assert!(as_text(&body).ends_with("\r\n--B--\r\n"));
    }

    #[test]
    fn test_multiple_fields_any_order() {
        let mut fields = HashMap::new();
        fields.insert("first".to_string(), "1".to_string());
        fields.insert("second".to_string(), "2".to_string());

        let text = as_text(&build_multipart_body("B", &fields, None, "file"));
        assert!(text.contains("\r\n--B\r\nContent-Disposition: form-data; name=\"first\"\r\n\r\n1"));
        assert!(text.contains("\r\n--B\r\nContent-Disposition: form-data; name=\"second\"\r\n\r\n2"));
        assert_eq!(text.matches("\r\n--B\r\n").count(), 2);
    }

    #[test]
    fn test_binary_file_bytes_untouched() {
        let raw = vec![0u8, 159, 146, 150, 255];
        let file = FileAttachment::new("blob.png", raw.clone());
        let body = build_multipart_body("B", Vec::<(&str, &str)>::new(), Some(&file), "f");
        assert!(body.windows(raw.len()).any(|w| w == raw.as_slice()));
    }

    #[test]
    fn test_boundaries_are_unique() {
        assert_ne!(new_boundary(), new_boundary());
    }
}
