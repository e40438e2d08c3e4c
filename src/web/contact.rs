//! Contact page
//!
//! Every render of the form embeds a fresh arithmetic challenge; the
//! submission must answer the challenge it was issued. A used token never
//! works twice, so a failed submission gets a new puzzle to solve.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::forms::{ContactForm, FieldErrors};
use crate::models::User;
use crate::web::flash::{self, Flash};
use crate::web::state::{AppState, MaybeUser};
use crate::web::{base_context, take_flash, PageError};

/// GET /contact
pub async fn contact_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let mut headers = HeaderMap::new();
    let pending = take_flash(&request_headers, &mut headers);

    let html = render_contact(
        &state,
        user.as_ref(),
        &ContactForm::default(),
        &FieldErrors::new(),
        pending.as_ref(),
    )
    .await?;
    Ok((headers, html).into_response())
}

/// POST /contact
///
/// The challenge token is consumed on this attempt whatever the outcome;
/// re-renders always carry a fresh one.
pub async fn contact_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    axum::Form(form): axum::Form<ContactForm>,
) -> Result<Response, PageError> {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors,
    };

    let captcha_ok = if form.captcha_token.trim().is_empty() {
        false
    } else {
        state
            .captcha
            .verify(&form.captcha_token, &form.captcha_answer)
            .await?
    };
    if !captcha_ok && errors.for_field("captcha_answer").is_empty() {
        errors.add("captcha_answer", "Wrong answer, try again");
    }

    if !errors.is_empty() {
        let failed = Flash::error("Validation failed");
        let html = render_contact(&state, user.as_ref(), &form, &errors, Some(&failed)).await?;
        return Ok(html.into_response());
    }

    match state.mailer.send(form.subject.trim(), &form.message_body()).await {
        Ok(()) => {
            tracing::info!("Contact message forwarded");
            let mut headers = HeaderMap::new();
            flash::set(&mut headers, &Flash::success("Your message has been sent"));
            Ok((headers, Redirect::to("/")).into_response())
        }
        Err(err) => {
            tracing::error!(error = %err, "Contact mail delivery failed");
            let delivery_failed =
                Flash::error("Could not send your message, please try again later");
            let html = render_contact(
                &state,
                user.as_ref(),
                &form,
                &FieldErrors::new(),
                Some(&delivery_failed),
            )
            .await?;
            Ok(html.into_response())
        }
    }
}

async fn render_contact(
    state: &AppState,
    user: Option<&User>,
    form: &ContactForm,
    errors: &FieldErrors,
    pending: Option<&Flash>,
) -> Result<Html<String>, PageError> {
    let challenge = state.captcha.issue().await?;

    let mut context = base_context(user, pending);
    context.insert("title", "Contact");
    context.insert("form", form);
    context.insert("errors", &errors.by_field());
    context.insert("captcha_question", &challenge.question);
    context.insert("captcha_token", &challenge.token);

    Ok(Html(state.templates.render("contact.html", &context)?))
}
