//! News pages
//!
//! Public listings (home and per-category), article detail, and the
//! authenticated submission form. Listings show published articles only;
//! the detail page additionally shows pending articles to logged-in users.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::forms::{FieldErrors, NewsForm};
use crate::models::{CreateNewsInput, News, PagedResult, User};
use crate::services::NewsServiceError;
use crate::web::flash::{self, Flash};
use crate::web::state::{AppState, AuthenticatedUser, MaybeUser};
use crate::web::{base_context, take_flash, PageError};

/// Query string for paginated listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Listing headings are rendered in uppercase.
pub fn page_heading(name: &str) -> String {
    name.to_uppercase()
}

/// GET / - published news, newest first
pub async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PageQuery>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let listing = state
        .news_service
        .list_published(query.page.unwrap_or(1))
        .await?;

    render_listing(&state, user.as_ref(), &request_headers, "News", "news", listing).await
}

/// GET /category/{id} - published news in one category
pub async fn by_category(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let (category, listing) = state
        .news_service
        .list_by_category(category_id, query.page.unwrap_or(1))
        .await?;

    render_listing(
        &state,
        user.as_ref(),
        &request_headers,
        &category.name,
        &category.name,
        listing,
    )
    .await
}

async fn render_listing(
    state: &AppState,
    user: Option<&User>,
    request_headers: &HeaderMap,
    title: &str,
    heading_name: &str,
    listing: PagedResult<News>,
) -> Result<Response, PageError> {
    let categories = state.news_service.categories().await?;

    let mut headers = HeaderMap::new();
    let pending = take_flash(request_headers, &mut headers);

    let mut context = base_context(user, pending.as_ref());
    context.insert("title", title);
    context.insert("heading", &page_heading(heading_name));
    context.insert("news", &listing.items);
    context.insert("categories", &categories);
    context.insert("page", &listing.page);
    context.insert("has_next", &listing.has_next());
    context.insert("has_prev", &listing.has_prev());

    let html = state.templates.render("list_of_news.html", &context)?;
    Ok((headers, Html(html)).into_response())
}

/// GET /news/{id} - article detail
///
/// Pending articles are visible to logged-in users only; anonymous visitors
/// get a 404, same as for an id that never existed.
pub async fn detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    request_headers: HeaderMap,
) -> Result<Response, PageError> {
    let article = state.news_service.get(id).await?;
    if !article.is_published && user.is_none() {
        return Err(PageError::NotFound);
    }

    let mut headers = HeaderMap::new();
    let pending = take_flash(&request_headers, &mut headers);

    let mut context = base_context(user.as_ref(), pending.as_ref());
    context.insert("title", &article.title);
    context.insert("news_item", &article);

    let html = state.templates.render("single.html", &context)?;
    Ok((headers, Html(html)).into_response())
}

/// GET /news/add - submission form, login required
pub async fn add_news_page(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response, PageError> {
    render_add_news(&state, &user, &NewsForm::default(), &FieldErrors::new()).await
}

/// POST /news/add - submit an article for moderation
pub async fn add_news_submit(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    axum::Form(form): axum::Form<NewsForm>,
) -> Result<Response, PageError> {
    if let Err(errors) = form.validate() {
        return render_add_news(&state, &user, &form, &errors).await;
    }

    let input = CreateNewsInput {
        title: form.title.trim().to_string(),
        content: form.content.trim().to_string(),
        category_id: form.category_id,
        author_id: user.id,
    };

    match state.news_service.create(input).await {
        Ok(article) => {
            let mut headers = HeaderMap::new();
            flash::set(
                &mut headers,
                &Flash::success("Your story was submitted for moderation"),
            );
            Ok((headers, Redirect::to(&format!("/news/{}", article.id))).into_response())
        }
        Err(NewsServiceError::NotFound(_)) => {
            let mut errors = FieldErrors::new();
            errors.add("category_id", "Choose a valid category");
            render_add_news(&state, &user, &form, &errors).await
        }
        Err(NewsServiceError::ValidationError(message)) => {
            let mut errors = FieldErrors::new();
            errors.add("title", message);
            render_add_news(&state, &user, &form, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn render_add_news(
    state: &AppState,
    user: &User,
    form: &NewsForm,
    errors: &FieldErrors,
) -> Result<Response, PageError> {
    let categories = state.news_service.categories().await?;

    let mut context = base_context(Some(user), None);
    context.insert("title", "Add news");
    context.insert("categories", &categories);
    context.insert("form", form);
    context.insert("errors", &errors.by_field());

    let html = state.templates.render("add_news.html", &context)?;
    Ok(Html(html).into_response())
}
