//! Request payload encodings.

use crate::errors::GancioError;
use crate::request::Image;
use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};

/// Name of the empty file part attached when an event request has no image.
///
/// The server mishandles single-element array fields (`tags[]` with one tag)
/// unless the body is `multipart/form-data` with a file part, so one is always
/// present.
pub const PLACEHOLDER_PART: &str = "placeholder";

/// Name of the file part carrying an event image.
pub const IMAGE_PART: &str = "image";

/// What travels with a request besides the method and path.
#[derive(Debug)]
pub enum Payload {
    Empty,
    /// Query-string pairs; repeated keys are kept.
    Query(Vec<(&'static str, String)>),
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` body
    Form(Vec<(&'static str, String)>),
    /// `multipart/form-data` body with an image or the placeholder part
    Multipart {
        fields: Vec<(&'static str, String)>,
        image: Option<Image>,
    },
}

impl Payload {
    /// Attaches this payload to a request.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::InvalidInput`] if the image MIME type is not valid.
    pub fn apply(self, request: RequestBuilder) -> Result<RequestBuilder, GancioError> {
        Ok(match self {
            Self::Empty => request,
            Self::Query(pairs) => request.query(&pairs),
            Self::Json(body) => request.json(&body),
            Self::Form(pairs) => request.form(&pairs),
            Self::Multipart { fields, image } => request.multipart(into_multipart(fields, image)?),
        })
    }
}

/// Builds a multipart form from text fields plus one file part.
///
/// # Errors
///
/// Returns [`GancioError::InvalidInput`] if the image MIME type is not valid.
pub fn into_multipart(
    fields: Vec<(&'static str, String)>,
    image: Option<Image>,
) -> Result<Form, GancioError> {
    let mut form = fields
        .into_iter()
        .fold(Form::new(), |form, (key, value)| form.text(key, value));

    form = match image {
        Some(image) => {
            let mut part = Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(mime) = image.mime {
                part = part.mime_str(&mime).map_err(|e| {
                    GancioError::InvalidInput(format!("invalid image MIME type '{mime}': {e}"))
                })?;
            }
            form.part(IMAGE_PART, part)
        }
        None => form.part(PLACEHOLDER_PART, Part::bytes(Vec::new()).file_name("")),
    };

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mime_is_rejected() {
        let image = Image::new(vec![1, 2, 3]).with_mime("not a mime");
        let result = into_multipart(vec![], Some(image));
        match result {
            Err(GancioError::InvalidInput(msg)) => assert!(msg.contains("not a mime")),
            other => panic!("Expected InvalidInput, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_multipart_boundary_is_set() {
        let form = into_multipart(vec![("title", "E".to_string())], None).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
