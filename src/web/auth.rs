//! Registration, login and logout pages
//!
//! A successful registration logs the new account straight in. Failed
//! logins re-render the form with a generic message and no hint about
//! which part of the credentials was wrong.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::services::{RegisterInput, UserServiceError};
use crate::web::flash::{self, Flash};
use crate::web::state::{self, AppState};
use crate::web::{base_context, take_flash, PageError};

/// GET /register
pub async fn register_page(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let mut headers = HeaderMap::new();
    let pending = take_flash(&request_headers, &mut headers);

    let html = render_register(&state, &RegisterForm::default(), &FieldErrors::new(), pending.as_ref())?;
    Ok((headers, html).into_response())
}

/// POST /register
pub async fn register_submit(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<RegisterForm>,
) -> Result<Response, PageError> {
    let failed = Flash::error("Registration failed");

    if let Err(errors) = form.validate() {
        return Ok(render_register(&state, &form, &errors, Some(&failed))?.into_response());
    }

    let input = RegisterInput::new(
        form.username.trim(),
        form.email.trim(),
        form.password.clone(),
    );

    let user = match state.user_service.register(input).await {
        Ok(user) => user,
        Err(UserServiceError::UsernameExists(_)) => {
            let mut errors = FieldErrors::new();
            errors.add("username", "This username is already taken");
            return Ok(render_register(&state, &form, &errors, Some(&failed))?.into_response());
        }
        Err(UserServiceError::EmailExists(_)) => {
            let mut errors = FieldErrors::new();
            errors.add("email", "This email is already registered");
            return Ok(render_register(&state, &form, &errors, Some(&failed))?.into_response());
        }
        Err(UserServiceError::ValidationError(message)) => {
            let mut errors = FieldErrors::new();
            errors.add("username", message);
            return Ok(render_register(&state, &form, &errors, Some(&failed))?.into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let session = state.user_service.start_session(&user).await?;

    let mut headers = HeaderMap::new();
    state::set_session_cookie(&mut headers, &session.id);
    flash::set(&mut headers, &Flash::success("Welcome! Your account is ready"));
    Ok((headers, Redirect::to("/")).into_response())
}

fn render_register(
    state: &AppState,
    form: &RegisterForm,
    errors: &FieldErrors,
    pending: Option<&Flash>,
) -> Result<Html<String>, PageError> {
    let mut context = base_context(None, pending);
    context.insert("title", "Register");
    context.insert("form", form);
    context.insert("errors", &errors.by_field());

    Ok(Html(state.templates.render("register.html", &context)?))
}

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let mut headers = HeaderMap::new();
    let pending = take_flash(&request_headers, &mut headers);

    let html = render_login(&state, &LoginForm::default(), false, pending.as_ref())?;
    Ok((headers, html).into_response())
}

/// POST /login
///
/// A failed attempt re-renders the form with status 200 and a generic
/// message.
pub async fn login_submit(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<Response, PageError> {
    if form.validate().is_err() {
        return Ok(render_login(&state, &form, true, None)?.into_response());
    }

    match state.user_service.login(&form.username, &form.password).await {
        Ok(session) => {
            let mut headers = HeaderMap::new();
            state::set_session_cookie(&mut headers, &session.id);
            flash::set(&mut headers, &Flash::success("Welcome back"));
            Ok((headers, Redirect::to("/")).into_response())
        }
        Err(UserServiceError::AuthenticationError) => {
            Ok(render_login(&state, &form, true, None)?.into_response())
        }
        Err(err) => Err(err.into()),
    }
}

fn render_login(
    state: &AppState,
    form: &LoginForm,
    login_failed: bool,
    pending: Option<&Flash>,
) -> Result<Html<String>, PageError> {
    let mut context = base_context(None, pending);
    context.insert("title", "Login");
    context.insert("form", form);
    context.insert("login_failed", &login_failed);

    Ok(Html(state.templates.render("login.html", &context)?))
}

/// POST /logout
///
/// Always redirects to the login page, session or not.
pub async fn logout(
    State(app): State<AppState>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    if let Some(token) = state::session_token(&request_headers) {
        app.user_service.logout(&token).await?;
    }

    let mut headers = HeaderMap::new();
    state::clear_session_cookie(&mut headers);
    Ok((headers, Redirect::to("/login")).into_response())
}
