use api::auth::{self, hash_password, verify_password, Flash, FlashCategory};
use api::User;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use dioxus::prelude::*;
use serde::Deserialize;
use sqlx::SqlitePool;
use ui::views::{LoginForm, LoginPage, RegisterForm, RegisterPage};

use super::{local_redirect_target, page};
use crate::error::AppResult;
use crate::extract::{flash, flashes, CurrentUser, MaybeUser};
use crate::AppState;

pub(crate) const USERNAME_LEN: std::ops::RangeInclusive<usize> = 2..=20;
pub(crate) const EMAIL_MAX_LEN: usize = 120;
pub(crate) const PASSWORD_MIN_LEN: usize = 8;

/// Field checks shared by registration and the profile form.
pub(crate) fn validate_account(username: &str, email: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !USERNAME_LEN.contains(&username.chars().count()) {
        errors.push(format!(
            "Username must be between {} and {} characters long.",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        ));
    }
    let valid_email = email.len() <= EMAIL_MAX_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        errors.push("Invalid email address.".to_string());
    }
    errors
}

/// Uniqueness checks, skipping the account with id `except`.
pub(crate) async fn check_taken(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    except: Option<i64>,
) -> Result<Vec<String>, sqlx::Error> {
    let mut errors = Vec::new();
    if User::username_taken(pool, username, except).await? {
        errors.push("That username is taken. Please choose a different one.".to_string());
    }
    if User::email_taken(pool, email, except).await? {
        errors.push("That email is taken. Please choose a different one.".to_string());
    }
    Ok(errors)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterData {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
}

pub async fn register_form(viewer: MaybeUser) -> Response {
    if viewer.user.is_some() {
        return Redirect::to("/").into_response();
    }
    let flashes = flashes(&viewer.session).await;
    page(rsx! { RegisterPage { flashes: flashes, form: RegisterForm::default() } }).into_response()
}

async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let user = User::create(&mut *tx, username, email, password_hash).await?;
    tx.commit().await?;
    Ok(user)
}

pub async fn register(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Form(data): Form<RegisterData>,
) -> AppResult<Response> {
    if viewer.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let username = data.username.trim().to_string();
    let email = data.email.trim().to_string();

    let mut errors = validate_account(&username, &email);
    if data.password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters long."
        ));
    }
    if data.password != data.confirm_password {
        errors.push("Passwords must match.".to_string());
    }
    if errors.is_empty() {
        errors = check_taken(&state.pool, &username, &email, None).await?;
    }

    if !errors.is_empty() {
        let flashes = flashes(&viewer.session).await;
        let form = RegisterForm { username, email };
        return Ok(page(rsx! {
            RegisterPage { flashes: flashes, form: form, errors: errors }
        })
        .into_response());
    }

    let password = data.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    match insert_user(&state.pool, &username, &email, &password_hash).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, %username, "Account created");
            auth::login(&viewer.session, user.id, false).await?;
            flash(&viewer.session, FlashCategory::Success, "Your account has been created!").await;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::error!(%username, "Failed to create account: {}", e);
            flash(
                &viewer.session,
                FlashCategory::Danger,
                "An error occurred while creating your account. Please try again later.",
            )
            .await;
            Ok(Redirect::to("/register").into_response())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginData {
    email: String,
    password: String,
    remember: Option<String>,
    next: Option<String>,
}

pub async fn login_form(viewer: MaybeUser, Query(query): Query<NextQuery>) -> Response {
    if viewer.user.is_some() {
        return Redirect::to("/").into_response();
    }
    let flashes = flashes(&viewer.session).await;
    let form = LoginForm {
        next: local_redirect_target(query.next.as_deref()).map(str::to_string),
        ..LoginForm::default()
    };
    page(rsx! { LoginPage { flashes: flashes, form: form } }).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(query): Query<NextQuery>,
    Form(data): Form<LoginData>,
) -> AppResult<Response> {
    if viewer.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let email = data.email.trim().to_string();
    let remember = data.remember.is_some_and(|v| v != "false" && !v.is_empty());
    let next = local_redirect_target(data.next.as_deref().or(query.next.as_deref()))
        .map(str::to_string);

    let user = User::find_by_email(&state.pool, &email).await?;
    let verified = match user {
        Some(ref user) => {
            let password = data.password;
            let hash = user.password_hash.clone();
            tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??
        }
        None => false,
    };

    match user.filter(|_| verified) {
        Some(user) => {
            auth::login(&viewer.session, user.id, remember).await?;
            tracing::info!(user_id = user.id, remember, "Logged in");
            Ok(Redirect::to(next.as_deref().unwrap_or("/")).into_response())
        }
        None => {
            tracing::info!(%email, "Failed login attempt");
            let mut flashes = flashes(&viewer.session).await;
            flashes.push(Flash::new(
                FlashCategory::Danger,
                "Login failed. Please check your email and password.",
            ));
            let form = LoginForm {
                email,
                remember,
                next,
            };
            Ok(page(rsx! { LoginPage { flashes: flashes, form: form } }).into_response())
        }
    }
}

pub async fn logout(current: CurrentUser) -> AppResult<Redirect> {
    auth::logout(&current.session).await?;
    tracing::info!(user_id = current.user.id, "Logged out");
    Ok(Redirect::to("/"))
}
