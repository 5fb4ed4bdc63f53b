use crate::error::{AppError, Result};
use crate::model::ShortenForm;
use crate::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use pinhole_core::ShortKey;
use tracing::debug;

pub async fn shorten_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<ShortenForm>, FormRejection>,
) -> Result<String> {
    // An unreadable body carries no fields, so it fails as a missing URL.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable shorten form");
            ShortenForm::default()
        }
    };
    let params = form.into_params()?;
    let key = state.shortener().shorten(params).await?;

    Ok(format!("Short URL: {}", key.to_url(state.base_url())))
}

pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let key = ShortKey::new(short_key)?;
    let redirect = state.shortener().redirect(&key).await?;
    let location = HeaderValue::from_str(&redirect.original_url)
        .map_err(|_| AppError::InvalidLocation(key.into_string()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
