//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use shelf_attachments::Upload;
use shelf_models::BookParams;
use shelf_services::BookService;

use crate::error::ApiError;

/// Multipart field carrying the cover file
pub const IMAGE_FIELD: &str = "image";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<BookService>,
}

impl AppState {
    pub fn new(books: Arc<BookService>) -> Self {
        Self { books }
    }
}

/// Book fields and an optional cover from a request body
///
/// Accepts `multipart/form-data`, `application/json` and
/// `application/x-www-form-urlencoded`. Any other or missing content type
/// yields an empty form.
#[derive(Debug, Default)]
pub struct BookForm {
    pub params: BookParams,
    pub image: Option<Upload>,
}

#[async_trait]
impl<S> FromRequest<S> for BookForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<mime::Mime>().ok());

        let Some(content_type) = content_type else {
            return Ok(BookForm::default());
        };

        let (kind, subtype) = (content_type.type_(), content_type.subtype());

        if kind == mime::MULTIPART && subtype == mime::FORM_DATA {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return read_multipart(multipart).await;
        }

        if kind == mime::APPLICATION && subtype == mime::JSON {
            let Json(params) = Json::<BookParams>::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Ok(BookForm {
                params,
                image: None,
            });
        }

        if kind == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED {
            let Form(params) = Form::<BookParams>::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Ok(BookForm {
                params,
                image: None,
            });
        }

        Ok(BookForm::default())
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<BookForm, ApiError> {
    let mut form = BookForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

            // An empty file input still sends a part with no name and no data
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            form.image = Some(Upload::new(filename, content_type.as_deref(), data));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            form.params.set(&name, value);
        }
    }

    Ok(form)
}
